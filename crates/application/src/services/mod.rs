mod metrics;
mod publish_queue;

pub use metrics::{MetricsSnapshot, PluginMetrics};
pub use publish_queue::PublishQueue;
