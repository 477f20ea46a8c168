use crate::{PublisherJob, SubscriberJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(PublisherJob);
impl_spawnable_job!(SubscriberJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Spawns the node's two bus workers.
pub struct JobRunner {
    publisher: Option<PublisherJob>,
    subscriber: Option<SubscriberJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            publisher: None,
            subscriber: None,
            shutdown: None,
        }
    }

    pub fn with_publisher(mut self, job: PublisherJob) -> Self {
        self.publisher = Some(job);
        self
    }

    pub fn with_subscriber(mut self, job: SubscriberJob) -> Self {
        self.subscriber = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting bus workers");

        spawn_job(self.publisher, &self.shutdown);
        spawn_job(self.subscriber, &self.shutdown);

        info!("Bus workers started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
