mod envelope;
mod relay_service;
mod ws_handler;

pub use envelope::*;
pub use relay_service::*;
pub use ws_handler::*;
