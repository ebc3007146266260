mod error;
mod error_classification;
mod gateway;
mod handlers;
mod request_classification;
mod settings;
mod upstream;

pub use error::ProxyError;
pub use error_classification::{TransportFailure, classify_pingora_error};
pub use gateway::LiliumGateway;
pub use request_classification::{RequestKind, classify_request, query_param};
pub use settings::GatewaySettings;
