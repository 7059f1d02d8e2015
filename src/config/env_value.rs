// ABOUTME: Config strings given inline or taken from an environment variable.
// ABOUTME: CI usually exports the version label as a build number.

use crate::error::{Error, Result};
use serde::Deserialize;

/// A config string written inline (`version: "1.0"`) or read from the
/// environment (`version: { env: BUILD_NUMBER, default: dev }`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve the value of config field `field`.
    ///
    /// A blank variable counts as unset, so the default applies.
    pub fn resolve(&self, field: &'static str) -> Result<String> {
        match self {
            EnvValue::Literal(value) => Ok(value.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| default.clone())
                .ok_or_else(|| Error::UnsetEnvVar {
                    field,
                    var: var.clone(),
                }),
        }
    }
}
