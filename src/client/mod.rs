//! Client construction and request orchestration.

mod builder;
mod request_cache;

pub use builder::RequestCacheBuilder;
pub use request_cache::RequestCache;
