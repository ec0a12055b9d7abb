use serde::{Deserialize, Serialize};
use poc_core::{HardwareStatus, ServiceStatus};
use crate::service::StatusReport;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub service: ServiceStatus,
    pub hardware: HardwareStatus,
    pub service_label: String,
    pub hardware_label: String,
    pub endpoint: Option<String>,
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        Self {
            service: report.statuses.service,
            hardware: report.statuses.hardware,
            service_label: report.statuses.service.label().to_string(),
            hardware_label: report.statuses.hardware.label().to_string(),
            endpoint: report.resolution.endpoint().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
