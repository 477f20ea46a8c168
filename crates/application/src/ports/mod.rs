mod answer_store;
mod message_bus;

pub use answer_store::AnswerStore;
pub use message_bus::{BusSubscription, MessageBus};
