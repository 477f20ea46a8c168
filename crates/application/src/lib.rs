pub mod ports;
pub mod services;

pub use ports::{AnswerStore, BusSubscription, MessageBus};
pub use services::{MetricsSnapshot, PluginMetrics, PublishQueue};
