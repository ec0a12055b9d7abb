use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tokio::time::Sleep;
use poc_core::error::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    #[error("no response within {after:?}")]
    Aborted { after: Duration },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Aborted { after } => Error::Timeout { after },
            FetchError::Network(e) => Error::Network(e.to_string()),
            FetchError::InvalidTimeout => Error::InvalidRequest("timeout must be greater than zero".into()),
        }
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP calls bounded by a per-request deadline.
///
/// The deadline covers connecting, the response head and the body. Each call
/// owns its own deadline; nothing is shared between calls.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: Client,
    #[cfg(test)]
    armed: Arc<AtomicUsize>,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            #[cfg(test)]
            armed: Arc::default(),
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Deadline timers currently alive. Zero whenever no call is in flight.
    #[cfg(test)]
    pub fn armed_deadlines(&self) -> usize {
        self.armed.load(Ordering::SeqCst)
    }

    pub async fn fetch(&self, request: RequestBuilder, timeout: Duration) -> Result<Fetched, FetchError> {
        if timeout.is_zero() {
            return Err(FetchError::InvalidTimeout);
        }

        let mut deadline = self.arm(timeout);

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(Fetched { status, body })
        };

        tokio::select! {
            result = exchange => Ok(result?),
            _ = &mut deadline.timer => Err(FetchError::Aborted { after: timeout }),
        }
    }

    fn arm(&self, timeout: Duration) -> Deadline {
        #[cfg(test)]
        self.armed.fetch_add(1, Ordering::SeqCst);

        Deadline {
            timer: Box::pin(tokio::time::sleep(timeout)),
            #[cfg(test)]
            armed: self.armed.clone(),
        }
    }
}

/// Owns the timer of one call; dropping it cancels the timer on every exit path.
struct Deadline {
    timer: Pin<Box<Sleep>>,
    #[cfg(test)]
    armed: Arc<AtomicUsize>,
}

#[cfg(test)]
impl Drop for Deadline {
    fn drop(&mut self) {
        self.armed.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use crate::testing::{unreachable_endpoint, StubBehavior, StubUpstream};

    #[tokio::test]
    async fn test_fetch_success_releases_deadline() {
        let upstream = StubUpstream::start(StubBehavior::default()).await;
        let fetcher = Fetcher::default();

        let fetched = fetcher
            .fetch(fetcher.get(&upstream.endpoint.heartbeat_url()), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(fetched.status, StatusCode::NO_CONTENT);
        assert_eq!(fetcher.armed_deadlines(), 0);
    }

    #[tokio::test]
    async fn test_silent_handler_aborts_at_deadline() {
        let upstream = StubUpstream::start(StubBehavior {
            heartbeat_delay: Duration::from_secs(30),
            ..StubBehavior::default()
        })
        .await;
        let fetcher = Fetcher::default();
        let timeout = Duration::from_millis(300);

        let start = Instant::now();
        let result = fetcher.fetch(fetcher.get(&upstream.endpoint.heartbeat_url()), timeout).await;
        let elapsed = start.elapsed();

        assert!(matches!(result, Err(FetchError::Aborted { after }) if after == timeout));
        assert!(elapsed >= timeout);
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        assert_eq!(fetcher.armed_deadlines(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_call_releases_deadline() {
        let upstream = StubUpstream::start(StubBehavior {
            heartbeat_delay: Duration::from_secs(30),
            ..StubBehavior::default()
        })
        .await;
        let fetcher = Fetcher::default();

        let call = fetcher.fetch(fetcher.get(&upstream.endpoint.heartbeat_url()), Duration::from_secs(20));
        let outer = tokio::time::timeout(Duration::from_millis(200), call).await;

        assert!(outer.is_err());
        assert_eq!(fetcher.armed_deadlines(), 0);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let endpoint = unreachable_endpoint().await;
        let fetcher = Fetcher::default();

        let result = fetcher.fetch(fetcher.get(&endpoint.heartbeat_url()), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
        assert_eq!(fetcher.armed_deadlines(), 0);
    }

    #[tokio::test]
    async fn test_zero_timeout_is_rejected() {
        let fetcher = Fetcher::default();
        let result = fetcher.fetch(fetcher.get("http://127.0.0.1:9/heartbeat"), Duration::ZERO).await;

        assert!(matches!(result, Err(FetchError::InvalidTimeout)));
    }

    #[test]
    fn test_error_conversion() {
        let after = Duration::from_secs(3);
        assert!(matches!(Error::from(FetchError::Aborted { after }), Error::Timeout { .. }));
    }
}
