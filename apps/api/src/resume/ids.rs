use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::models::resume::EntryId;

/// Timestamp-based id generator.
///
/// Ids are millisecond timestamps, bumped by one whenever two requests land in
/// the same millisecond, so they stay strictly increasing for the life of the
/// process. This is collision-free within one process only; it is not a
/// distributed or cryptographic uniqueness guarantee.
#[derive(Debug, Default)]
pub struct IdSource {
    last: AtomicI64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> EntryId {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}
