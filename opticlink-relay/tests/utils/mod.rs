pub mod registry_helpers;

pub use registry_helpers::*;
pub use test_peer::*;
