mod loopback;
mod redis_backend;

pub use loopback::LoopbackBus;
pub use redis_backend::{RedisMessageBus, TOPIC};
