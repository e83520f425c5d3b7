pub mod postgres;
pub mod traits;

#[cfg(feature = "test-utils")]
pub mod memory;
#[cfg(feature = "test-utils")]
pub mod testutil;

pub use postgres::PgStore;
pub use traits::{PostStore, StoreCounts, TopicStore};

#[cfg(feature = "test-utils")]
pub use memory::MemoryStore;
