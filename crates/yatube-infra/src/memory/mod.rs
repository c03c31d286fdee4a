//! In-memory repositories - used when no database is configured, and by tests.
//!
//! Note: data is lost on process restart.

mod groups;
mod posts;
mod users;

use std::sync::atomic::{AtomicI64, Ordering};

pub use groups::InMemoryGroupRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;

/// Monotonic id source mirroring a `BIGSERIAL` column.
#[derive(Debug, Default)]
struct Sequence(AtomicI64);

impl Sequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}
