// Service exports
pub mod cache;
pub mod feasibility;
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheKey, MatchCache};
pub use feasibility::FeasibilityService;
pub use matching::MatchingService;
pub use memory::MemoryStore;
pub use postgres::{DbMatchStatus, PostgresStore};
pub use store::{EngineStore, StoreError, StoreResult};
