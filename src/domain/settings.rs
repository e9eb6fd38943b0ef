//! Settings file model (`preflight.toml`).

use std::path::PathBuf;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use super::probe::parse_duration;

pub const SETTINGS_FILE: &str = "preflight.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub probes: ProbeSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub files: FileSettings,
}

impl Settings {
    pub fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSettings {
    #[serde(default, deserialize_with = "optional_duration")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub registry: bool,
    #[serde(default)]
    pub endpoints: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    pub program: String,
    pub context: PathBuf,
    pub dockerfile: PathBuf,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            context: PathBuf::from("."),
            dockerfile: PathBuf::from("Dockerfile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    pub program: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self { program: "doctl".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    #[serde(default)]
    pub required: Vec<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

fn optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDuration>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDuration::Seconds(0)) => Err(de::Error::custom("timeout must be greater than zero")),
        Some(RawDuration::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
        Some(RawDuration::Text(text)) => parse_duration(&text).map(Some).map_err(de::Error::custom),
    }
}
