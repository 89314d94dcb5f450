//! Material record (§3). Kept a small, cheaply-`Clone`-able value type so
//! that "material arrays are cloned on split" (§5) falls out of `derive`
//! rather than needing reference counting, matching the "clone-on-split"
//! design note in §9 ("make material a value type cheap to copy").

/// RGB color, stored as `f32` like the teacher's color types
/// (`fyrox-core/src/color.rs`) even though geometry elsewhere in this
/// crate is `f64` — color never participates in the split math.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl Default for WrapMode {
    fn default() -> Self {
        WrapMode::Repeat
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

impl Default for FilterMode {
    fn default() -> Self {
        FilterMode::Linear
    }
}

/// Where a texture's pixels live: on disk or already decoded in memory
/// (e.g. produced by the atlas repacker).
#[derive(Clone, Debug)]
pub enum TextureSource {
    Path(String),
    /// Raw RGBA8 pixels plus dimensions.
    InMemory {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
}

/// Normalized offset+scale of a texture within a packed atlas, applied on
/// top of a mesh's raw UVs, per §3 "optional atlas offset+scale".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasRegion {
    pub offset: (f32, f32),
    pub scale: (f32, f32),
}

#[derive(Clone, Debug)]
pub struct TextureRef {
    pub source: TextureSource,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub filter: FilterMode,
    pub atlas_region: Option<AtlasRegion>,
}

impl TextureRef {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            source: TextureSource::Path(path.into()),
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            filter: FilterMode::default(),
            atlas_region: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Material {
    pub name: String,
    pub ambient: Option<Rgb>,
    pub diffuse: Option<Rgb>,
    pub specular: Option<Rgb>,
    pub emissive: Option<Rgb>,
    pub shininess: f32,
    pub opacity: f32,
    pub refractive_index: Option<f32>,
    pub diffuse_texture: Option<TextureRef>,
    pub normal_texture: Option<TextureRef>,
    pub specular_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
    pub opacity_texture: Option<TextureRef>,
    pub metallic_texture: Option<TextureRef>,
    pub roughness_texture: Option<TextureRef>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            ..Default::default()
        }
    }

    /// Alpha mode per §4.4: OPAQUE when opacity >= 1, MASK when < 0.5, BLEND otherwise.
    pub fn alpha_mode(&self) -> AlphaMode {
        if self.opacity >= 1.0 {
            AlphaMode::Opaque
        } else if self.opacity < 0.5 {
            AlphaMode::Mask
        } else {
            AlphaMode::Blend
        }
    }

    /// Clones this material under a new name, used when the atlas packer
    /// overflows into a second atlas for the same source material (§4.3
    /// step 6: "clone the material (new name `baseName-k`)").
    pub fn clone_as(&self, new_name: impl Into<String>) -> Self {
        let mut clone = self.clone();
        clone.name = new_name.into();
        clone
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_mode_thresholds() {
        assert_eq!(Material { opacity: 1.0, ..Material::new("m") }.alpha_mode(), AlphaMode::Opaque);
        assert_eq!(Material { opacity: 0.4, ..Material::new("m") }.alpha_mode(), AlphaMode::Mask);
        assert_eq!(Material { opacity: 0.7, ..Material::new("m") }.alpha_mode(), AlphaMode::Blend);
    }

    #[test]
    fn clone_as_renames_only() {
        let base = Material::new("wood");
        let cloned = base.clone_as("wood-1");
        assert_eq!(cloned.name, "wood-1");
        assert_eq!(cloned.opacity, base.opacity);
    }
}
