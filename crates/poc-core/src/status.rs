use serde::{Deserialize, Serialize};
use crate::endpoint::ServiceEndpoint;

/// Which configured backend answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTier {
    /// Low-latency backend on accelerated hardware, not always up
    Preferred,
    /// Stable backend that tolerates cold starts
    Fallback,
}

/// Outcome of one reachability resolution. Valid for the call that produced it only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Selected {
        tier: ServiceTier,
        endpoint: ServiceEndpoint,
    },
    Unreachable,
}

impl Resolution {
    pub fn endpoint(&self) -> Option<&ServiceEndpoint> {
        match self {
            Self::Selected { endpoint, .. } => Some(endpoint),
            Self::Unreachable => None,
        }
    }

    pub fn tier(&self) -> Option<ServiceTier> {
        match self {
            Self::Selected { tier, .. } => Some(*tier),
            Self::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Operational,
    /// Nothing resolved yet
    Downtime,
    Down,
}

impl ServiceStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Operational => "all systems operational",
            Self::Downtime => "experiencing downtime",
            Self::Down => "systems down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareStatus {
    Accelerated,
    Standard,
    None,
}

impl HardwareStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Accelerated => "using hardware acceleration",
            Self::Standard => "using standard hardware",
            Self::None => "no hardware available",
        }
    }
}

/// The pair shown in the status widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statuses {
    pub service: ServiceStatus,
    pub hardware: HardwareStatus,
}

impl Statuses {
    /// Before the first resolution completes
    pub fn initial() -> Self {
        Self {
            service: ServiceStatus::Downtime,
            hardware: HardwareStatus::None,
        }
    }
}

impl From<&Resolution> for Statuses {
    fn from(resolution: &Resolution) -> Self {
        let (service, hardware) = match resolution.tier() {
            Some(ServiceTier::Preferred) => (ServiceStatus::Operational, HardwareStatus::Accelerated),
            Some(ServiceTier::Fallback) => (ServiceStatus::Operational, HardwareStatus::Standard),
            None => (ServiceStatus::Down, HardwareStatus::None),
        };

        Self { service, hardware }
    }
}
