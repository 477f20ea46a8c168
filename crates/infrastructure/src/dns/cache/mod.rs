mod negative_ttl;
mod repository;
mod store;

pub use negative_ttl::NegativeTtlTracker;
pub use repository::CacheRepository;
pub use store::AnswerCache;
