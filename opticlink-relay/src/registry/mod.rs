mod role_registry;

pub use role_registry::*;
