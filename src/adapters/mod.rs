pub mod docker_command;
pub mod doctl_command;
pub mod http_endpoint;
pub mod process_runner;

pub use docker_command::DockerBuildAdapter;
pub use doctl_command::DoctlRegistryAdapter;
pub use http_endpoint::HttpEndpointAdapter;
