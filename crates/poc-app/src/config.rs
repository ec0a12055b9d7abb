use std::env;
use std::time::Duration;
use log::debug;
use poc_core::ServiceEndpoint;
use poc_core::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub preferred: Option<ServiceEndpoint>,
    pub fallback: ServiceEndpoint,
    pub probe_timeout: Duration,
    pub fallback_probe_timeout: Duration,
    pub create_timeout: Duration,
    pub port: u16,
    pub keep_alive_interval: Duration,
}

impl ServiceConfig {
    /// Reads `.env` if one exists, then the process environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("failed to read .env: {e}"))),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let preferred = get("PREFERRED_SERVICE_URL")
            .map(|url| ServiceEndpoint::parse(&url))
            .transpose()?;

        let fallback = get("FALLBACK_SERVICE_URL")
            .ok_or_else(|| Error::Config("FALLBACK_SERVICE_URL must be set".into()))
            .and_then(|url| ServiceEndpoint::parse(&url))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a number, got '{raw}'")))?,
            None => 5000,
        };

        Ok(Self {
            preferred,
            fallback,
            probe_timeout: seconds(get("PROBE_TIMEOUT_SECS"), "PROBE_TIMEOUT_SECS", 3)?,
            fallback_probe_timeout: seconds(
                get("FALLBACK_PROBE_TIMEOUT_SECS"),
                "FALLBACK_PROBE_TIMEOUT_SECS",
                10 * 60,
            )?,
            create_timeout: seconds(get("CREATE_TIMEOUT_SECS"), "CREATE_TIMEOUT_SECS", 10 * 60)?,
            port,
            keep_alive_interval: seconds(get("KEEP_ALIVE_INTERVAL_SECS"), "KEEP_ALIVE_INTERVAL_SECS", 3 * 60)?,
        })
    }
}

fn seconds(raw: Option<String>, key: &str, default: u64) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(Error::Config(format!("{key} must be greater than 0"))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(Error::Config(format!("{key} must be a whole number of seconds, got '{raw}'"))),
    }
}
