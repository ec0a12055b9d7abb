use std::time::{Duration, Instant};
use async_trait::async_trait;
use log::{debug, info, warn};
use poc_core::error::{Error, Result};
use poc_core::{Resolution, ServiceEndpoint, ServiceTier};
use crate::config::ServiceConfig;
use crate::service::fetch::Fetcher;

/// Picks the backend a single operation should talk to
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self) -> Resolution;
}

/// Liveness check: `GET {endpoint}/heartbeat`, any 2xx is alive
pub async fn probe(fetcher: &Fetcher, endpoint: &ServiceEndpoint, timeout: Duration) -> Result<Duration> {
    let start = Instant::now();
    let fetched = fetcher.fetch(fetcher.get(&endpoint.heartbeat_url()), timeout).await?;

    if !fetched.status.is_success() {
        return Err(Error::Transport {
            status: fetched.status.as_u16(),
            body: String::from_utf8_lossy(&fetched.body).into_owned(),
        });
    }

    Ok(start.elapsed())
}

/// Two-tier sequential probe: the preferred backend with a short deadline,
/// then the fallback with a long one. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Resolver {
    fetcher: Fetcher,
    preferred: Option<ServiceEndpoint>,
    fallback: ServiceEndpoint,
    probe_timeout: Duration,
    fallback_probe_timeout: Duration,
}

impl Resolver {
    pub fn new(fetcher: Fetcher, config: &ServiceConfig) -> Self {
        Self {
            fetcher,
            preferred: config.preferred.clone(),
            fallback: config.fallback.clone(),
            probe_timeout: config.probe_timeout,
            fallback_probe_timeout: config.fallback_probe_timeout,
        }
    }

    pub fn fallback(&self) -> &ServiceEndpoint {
        &self.fallback
    }

    async fn try_tier(&self, tier: ServiceTier, endpoint: &ServiceEndpoint, timeout: Duration) -> Option<Resolution> {
        match probe(&self.fetcher, endpoint, timeout).await {
            Ok(elapsed) => {
                info!("{tier:?} service {endpoint} alive ({} ms)", elapsed.as_millis());
                Some(Resolution::Selected {
                    tier,
                    endpoint: endpoint.clone(),
                })
            }
            Err(e) => {
                warn!("{tier:?} service {endpoint} unreachable: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Resolve for Resolver {
    #[tracing::instrument(skip(self), fields(fallback = %self.fallback))]
    async fn resolve(&self) -> Resolution {
        if let Some(preferred) = &self.preferred {
            if let Some(resolution) = self.try_tier(ServiceTier::Preferred, preferred, self.probe_timeout).await {
                return resolution;
            }
        } else {
            debug!("No preferred service configured");
        }

        match self.try_tier(ServiceTier::Fallback, &self.fallback, self.fallback_probe_timeout).await {
            Some(resolution) => resolution,
            None => {
                warn!("No generation service reachable");
                Resolution::Unreachable
            }
        }
    }
}
