use std::time::Duration;
use log::{info, warn};
use poc_core::error::{Error, Result};
use poc_core::signature::{SignatureRequest, SignatureResult};
use poc_core::{Resolution, ServiceEndpoint, Statuses};
use crate::service::fetch::Fetcher;
use crate::service::resolver::{Resolve, Resolver};

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub resolution: Resolution,
    pub statuses: Statuses,
}

/// Sends validated requests to whichever backend the resolver picks.
/// One resolution and one attempt per call.
#[derive(Debug, Clone)]
pub struct SignatureClient<R = Resolver> {
    resolver: R,
    fetcher: Fetcher,
    create_timeout: Duration,
}

impl<R> SignatureClient<R> {
    pub fn new(resolver: R, fetcher: Fetcher, create_timeout: Duration) -> Self {
        Self {
            resolver,
            fetcher,
            create_timeout,
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Skips resolution. Callers own the choice of `endpoint`.
    pub async fn create_at(&self, endpoint: &ServiceEndpoint, request: &SignatureRequest) -> Result<SignatureResult> {
        let fetched = self
            .fetcher
            .fetch(self.fetcher.post(&endpoint.create_url()).json(request), self.create_timeout)
            .await?;

        if !fetched.status.is_success() {
            let body = String::from_utf8_lossy(&fetched.body).into_owned();
            warn!("Signature creation at {endpoint} failed with HTTP {}", fetched.status);
            return Err(Error::Transport {
                status: fetched.status.as_u16(),
                body,
            });
        }

        SignatureResult::from_slice(&fetched.body)
    }
}

impl<R: Resolve> SignatureClient<R> {
    #[tracing::instrument(skip_all, fields(images = request.images(), particles = request.particles().len()))]
    pub async fn create(&self, request: &SignatureRequest) -> Result<SignatureResult> {
        let resolution = self.resolver.resolve().await;
        let endpoint = resolution.endpoint().ok_or(Error::EndpointUnreachable)?;

        let result = self.create_at(endpoint, request).await?;
        info!("Received {} signatures from {endpoint}", result.signatures.len());

        Ok(result)
    }

    pub async fn status(&self) -> StatusReport {
        let resolution = self.resolver.resolve().await;
        let statuses = Statuses::from(&resolution);

        StatusReport { resolution, statuses }
    }
}
