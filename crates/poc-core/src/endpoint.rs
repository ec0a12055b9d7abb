use std::fmt;
use serde::Serialize;
use crate::error::{Error, Result};

/// Base URL of an upstream generation backend, without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceEndpoint(String);

impl ServiceEndpoint {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Config(format!("'{raw}' is not an http(s) URL")));
        }
        if trimmed.split_once("://").is_some_and(|(_, host)| host.is_empty()) {
            return Err(Error::Config(format!("'{raw}' has no host")));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `path` must start with '/'
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }

    pub fn heartbeat_url(&self) -> String {
        self.join("/heartbeat")
    }

    pub fn create_url(&self) -> String {
        self.join("/signatures/create")
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
