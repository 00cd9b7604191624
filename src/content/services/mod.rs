//! Application services for archived message content.

mod content;
mod locking;
mod retention;

pub use content::MessageContentService;
pub use locking::LockingMessageContentService;
pub use retention::{RETENTION_PERIOD, RetentionSweeper, SWEEP_INTERVAL};
