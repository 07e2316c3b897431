//! Rate limiting logic and state management.

mod groups;
mod key;
mod limiter;
mod store;

pub use groups::{RouteGroup, RouteGroups};
pub use key::BucketKey;
pub use limiter::{Decision, RateLimiter};
pub use store::{HitOutcome, MemoryStore, RateLimitStore};
