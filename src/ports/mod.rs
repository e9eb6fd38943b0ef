mod build;
mod endpoint;
mod registry;

pub use build::{BuildPort, BuildTarget};
pub use endpoint::EndpointPort;
pub use registry::RegistryPort;
