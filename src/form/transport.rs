use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;

/// Field name to value pairs handed to the transport.
pub type Payload = BTreeMap<String, String>;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("submission timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("submission rejected with status {status}")]
    Rejected { status: u16 },
}

pub type BoxedSubmitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>>;

/// Delivers a serialized form somewhere: an HTTP endpoint, a hosted form
/// backend, a queue. Called at most once per submit attempt; retries are the
/// user's decision.
pub trait SubmissionTransport: Send + Sync {
    type Fut<'a>: Future<Output = Result<(), TransportError>> + Send + 'a
    where
        Self: 'a;

    fn submit<'a>(&'a self, payload: Payload) -> Self::Fut<'a>;
}

impl<F, R> SubmissionTransport for F
where
    F: Fn(Payload) -> R + Send + Sync,
    R: Future<Output = Result<(), TransportError>> + Send + 'static,
{
    type Fut<'a>
        = R
    where
        Self: 'a;

    fn submit<'a>(&'a self, payload: Payload) -> Self::Fut<'a> {
        (self)(payload)
    }
}

/// Adds a fixed latency in front of another transport.
#[derive(Clone, Debug)]
pub struct DelayedTransport<T> {
    inner: T,
    latency: Duration,
}

impl<T> DelayedTransport<T> {
    pub fn new(inner: T, latency: Duration) -> Self {
        Self { inner, latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> SubmissionTransport for DelayedTransport<T>
where
    T: SubmissionTransport,
{
    type Fut<'a>
        = BoxedSubmitFuture<'a>
    where
        Self: 'a;

    fn submit<'a>(&'a self, payload: Payload) -> Self::Fut<'a> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                Delay::new(self.latency).await;
            }
            self.inner.submit(payload).await
        })
    }
}
