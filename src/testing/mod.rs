mod fake_probes;

#[allow(unused_imports)]
pub use fake_probes::{FakeBuild, FakeEndpoint, FakeRegistry};
