pub mod endpoint;
pub mod error;
mod model_types;
pub mod signature;
pub mod status;

pub use endpoint::ServiceEndpoint;
pub use model_types::{Activation, Particle};
pub use status::{HardwareStatus, Resolution, ServiceStatus, ServiceTier, Statuses};
