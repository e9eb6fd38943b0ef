//! Typed model of a deployment app spec document.
//!
//! Decoding is structural only: unknown keys are ignored and most scalar fields
//! default to empty so that the validator, not the decoder, reports them.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Parsed deployment configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppSpec {
    #[serde(deserialize_with = "null_as_empty")]
    pub services: Vec<ServiceSpec>,
}

/// One deployable service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceSpec {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub envs: Vec<EnvVar>,
}

/// Registry path and tag of a prebuilt image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "scalar_string")]
    pub repository: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub tag: String,
}

impl ImageRef {
    /// Last path segment of the repository, which is how registries list it.
    pub fn repository_name(&self) -> &str {
        self.repository.trim().rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

/// Environment variable declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvVar {
    #[serde(default, deserialize_with = "scalar_string")]
    pub key: String,
    #[serde(default)]
    pub value: Option<EnvValue>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: EnvKind,
}

impl EnvVar {
    /// Literal text of the value, if it is a scalar.
    pub fn literal(&self) -> Option<&str> {
        match &self.value {
            Some(EnvValue::Literal(text)) => Some(text),
            _ => None,
        }
    }
}

/// Declared kind of an environment variable (`type` in the document).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvKind {
    #[serde(alias = "GENERAL")]
    Plain,
    Secret,
    #[default]
    #[serde(skip_deserializing)]
    Unspecified,
}

/// Opaque environment value: either literal text or a reference mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Literal(String),
    Reference(Mapping),
}

impl<'de> Deserialize<'de> for EnvValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Mapping(map) => Ok(EnvValue::Reference(map)),
            other => scalar_text(other).map(EnvValue::Literal).ok_or_else(|| {
                de::Error::custom("env value must be a scalar or a secret reference mapping")
            }),
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Accept any scalar as text so that `tag: 1.0` or `name: 42` survive decoding.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| de::Error::custom("expected a scalar value"))
}

/// `type: ~` reads the same as an omitted `type`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
