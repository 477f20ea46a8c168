pub mod publisher;
pub mod runner;
pub mod subscriber;

pub use publisher::PublisherJob;
pub use runner::JobRunner;
pub use subscriber::SubscriberJob;
