pub mod server;
pub mod tracing;
pub mod upstream;

pub use server::TestServer;
pub use tracing::{CapturedEvent, EventLog};
pub use upstream::ScriptedUpstream;
