pub mod bus;
pub mod dns;
pub mod setup;

pub use bus::{LoopbackBus, RedisMessageBus, TOPIC};
pub use dns::{
    classify, filter_records, message_key, min_answer_ttl, strip_opt, unix_now_secs,
    AnswerCache, CacheRepository, CachedAnswer, Dcache, DnsHandler, NegativeTtlTracker,
    PublishingWriter, ResponseWriter,
};
pub use setup::{DcacheBuilder, DcacheRuntime};
