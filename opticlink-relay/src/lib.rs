mod config;
mod registry;
mod server;
mod signaling;

pub use config::*;
pub use registry::*;
pub use server::*;
pub use signaling::*;
