use std::future::Future;
use std::time::{Duration, Instant};
use chrono::Local;
use log::{error, info, warn};
use tokio::time::MissedTickBehavior;
use poc_core::ServiceEndpoint;
use poc_core::signature::SignatureRequest;
use crate::service::{probe, SignatureClient};

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub heartbeat_ok: bool,
    /// Signatures returned by the warm-up request, `None` if it failed
    pub signatures: Option<usize>,
}

/// Keeps the fallback host from idling out by pinging it on a fixed interval
pub struct KeepAlive<R> {
    client: SignatureClient<R>,
    endpoint: ServiceEndpoint,
    probe_timeout: Duration,
    interval: Duration,
}

impl<R> KeepAlive<R> {
    pub fn new(client: SignatureClient<R>, endpoint: ServiceEndpoint, probe_timeout: Duration, interval: Duration) -> Self {
        Self {
            client,
            endpoint,
            probe_timeout,
            interval,
        }
    }

    pub async fn tick(&self) -> TickOutcome {
        let now = Local::now();
        info!("Keeping {} alive on {}", self.endpoint, now.format("%B %-d, %Y, %H:%M"));

        let heartbeat_ok = match probe(self.client.fetcher(), &self.endpoint, self.probe_timeout).await {
            Ok(elapsed) => {
                info!("Heartbeat received at {} ({} ms)", Local::now().format("%H:%M:%S"), elapsed.as_millis());
                true
            }
            Err(e) => {
                warn!("Heartbeat failed at {}: {e}", Local::now().format("%H:%M:%S"));
                false
            }
        };

        let start = Instant::now();
        let signatures = match self.client.create_at(&self.endpoint, &SignatureRequest::warm_up()).await {
            Ok(result) => {
                info!(
                    "Signatures received at {} ({} ms)",
                    Local::now().format("%H:%M:%S"),
                    start.elapsed().as_millis()
                );
                Some(result.signatures.len())
            }
            Err(e) => {
                error!("Warm-up request failed after {} ms: {e}", start.elapsed().as_millis());
                None
            }
        };

        TickOutcome { heartbeat_ok, signatures }
    }

    /// Ticks immediately, then every interval, until `shutdown` completes.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            // A tick can run for minutes against a cold host.
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }
        }

        info!("Keep-alive stopped");
    }
}
