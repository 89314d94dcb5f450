//! Cancellation and progress primitives shared by every long-running stage
//! of the pipeline (§5). Grounded on the lightmap generator's own
//! `CancellationToken`/`ProgressIndicator` pair, which solves the exact
//! same problem (a long CPU-bound batch job that must be abortable from
//! another thread without unwinding through panics).

use std::ops::Deref;
use std::sync::atomic::{self, AtomicBool, AtomicU32};
use std::sync::Arc;

/// Cheaply cloneable flag checked at triangle-batch boundaries in C2 and
/// chart boundaries in C3. Raising it does not stop anything by itself —
/// every long loop must poll `is_cancelled` on its own.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(atomic::Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.0.store(true, atomic::Ordering::SeqCst);
    }
}

/// Stage of the pipeline currently running, used to label progress.
#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Debug)]
#[repr(u32)]
pub enum ProgressStage {
    Splitting = 0,
    AtlasRepacking = 1,
    GlbEncoding = 2,
    TileEncoding = 3,
    TilesetAssembly = 4,
}

impl std::fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProgressStage::Splitting => "Splitting mesh",
            ProgressStage::AtlasRepacking => "Repacking UV atlas",
            ProgressStage::GlbEncoding => "Encoding glTF binary",
            ProgressStage::TileEncoding => "Encoding tile container",
            ProgressStage::TilesetAssembly => "Assembling tileset",
        };
        write!(f, "{s}")
    }
}

#[derive(Default)]
pub struct ProgressData {
    stage: AtomicU32,
    completed: AtomicU32,
    total: AtomicU32,
}

impl ProgressData {
    pub fn percent(&self) -> u32 {
        let total = self.total.load(atomic::Ordering::SeqCst);
        if total > 0 {
            self.completed.load(atomic::Ordering::SeqCst) * 100 / total
        } else {
            0
        }
    }

    pub fn stage(&self) -> ProgressStage {
        match self.stage.load(atomic::Ordering::SeqCst) {
            0 => ProgressStage::Splitting,
            1 => ProgressStage::AtlasRepacking,
            2 => ProgressStage::GlbEncoding,
            3 => ProgressStage::TileEncoding,
            _ => ProgressStage::TilesetAssembly,
        }
    }

    fn set_stage(&self, stage: ProgressStage, total: u32) {
        self.total.store(total, atomic::Ordering::SeqCst);
        self.completed.store(0, atomic::Ordering::SeqCst);
        self.stage.store(stage as u32, atomic::Ordering::SeqCst);
    }

    fn advance(&self) {
        self.completed.fetch_add(1, atomic::Ordering::SeqCst);
    }
}

/// Shared handle used by the collector (single reader) and the worker pool
/// (many writers) described in §5. Atomic progress counter is the only
/// shared mutable state besides the texture cache.
#[derive(Clone, Default)]
pub struct ProgressIndicator(Arc<ProgressData>);

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stage(&self, stage: ProgressStage, total_items: u32) {
        self.0.set_stage(stage, total_items);
    }

    pub fn advance(&self) {
        self.0.advance();
    }
}

impl Deref for ProgressIndicator {
    type Target = ProgressData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_round_trip() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn progress_percent() {
        let progress = ProgressIndicator::new();
        progress.set_stage(ProgressStage::Splitting, 4);
        assert_eq!(progress.percent(), 0);
        progress.advance();
        progress.advance();
        assert_eq!(progress.percent(), 50);
    }
}
