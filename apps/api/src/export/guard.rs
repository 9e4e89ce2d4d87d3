use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-flight latch for exports: at most one permit exists at a time.
/// Cloning shares the latch.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of one export. Releases the guard on drop,
/// including when the export fails or its future is dropped.
#[derive(Debug)]
pub struct ExportPermit {
    in_flight: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<ExportPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit {
                in_flight: self.in_flight.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
