//! Cache adapter implementations.

mod disabled;
mod bounded;

pub use bounded::LruRecordCache;
pub use disabled::DisabledCache;
