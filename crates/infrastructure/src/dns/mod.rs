pub mod answer;
pub mod cache;
pub mod classify;
pub mod clock;
pub mod filter;
pub mod handler;
pub mod interceptor;
pub mod writer;

pub use answer::{min_answer_ttl, CachedAnswer};
pub use cache::{AnswerCache, CacheRepository, NegativeTtlTracker};
pub use classify::{classify, message_key};
pub use clock::unix_now_secs;
pub use filter::{filter_records, strip_opt};
pub use handler::Dcache;
pub use interceptor::PublishingWriter;
pub use writer::{DnsHandler, ResponseWriter};
