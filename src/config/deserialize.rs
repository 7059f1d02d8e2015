// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates application and environment names while parsing.

use serde::Deserialize;

use crate::types::{ApplicationName, EnvironmentName};

pub fn deserialize_application_name<'de, D>(deserializer: D) -> Result<ApplicationName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ApplicationName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_environment_name<'de, D>(deserializer: D) -> Result<EnvironmentName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    EnvironmentName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_environment_name_option<'de, D>(
    deserializer: D,
) -> Result<Option<EnvironmentName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| EnvironmentName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}
