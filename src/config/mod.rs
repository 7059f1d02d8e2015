// ABOUTME: Configuration types and parsing for beanpole.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, destination merging and plan validation.

mod deserialize;
mod env_value;
mod wait;

pub use env_value::EnvValue;
pub use wait::WaitConfig;

use crate::deploy::DeploymentPlan;
use crate::error::{Error, Result};
use crate::types::{ApplicationName, EnvironmentName, SourceBundle, VersionLabel};
use deserialize::{
    deserialize_application_name, deserialize_environment_name,
    deserialize_environment_name_option,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "beanpole.yml";
pub const CONFIG_FILENAME_ALT: &str = "beanpole.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".beanpole/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_application_name")]
    pub application: ApplicationName,

    #[serde(deserialize_with = "deserialize_environment_name")]
    pub environment: EnvironmentName,

    /// Version label, usually taken from the CI build number.
    pub version: EnvValue,

    pub source: SourceConfig,

    #[serde(default)]
    pub skip_existing_version: bool,

    /// Absent means the run returns as soon as the update is accepted.
    #[serde(default)]
    pub wait: Option<WaitConfig>,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

/// Bundle location as written in the file; validated by [`Config::deployment_plan`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub bucket: String,
    pub key: String,
}

/// Per-target overrides, selected with [`Config::for_destination`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_environment_name_option")]
    pub environment: Option<EnvironmentName>,

    #[serde(default)]
    pub source: Option<SourceConfig>,

    #[serde(default)]
    pub wait: Option<WaitConfig>,

    #[serde(default)]
    pub skip_existing_version: Option<bool>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref environment) = dest.environment {
            merged.environment = environment.clone();
        }

        if let Some(ref source) = dest.source {
            merged.source = source.clone();
        }

        // A destination wait block replaces the whole block
        if let Some(wait) = dest.wait {
            merged.wait = Some(wait);
        }

        if let Some(skip) = dest.skip_existing_version {
            merged.skip_existing_version = skip;
        }

        Ok(merged)
    }

    /// Resolve the version and validate everything a run needs.
    ///
    /// All problems are reported together in [`Error::Invalid`].
    pub fn deployment_plan(&self) -> Result<DeploymentPlan> {
        let mut problems = Vec::new();

        let version_label = match self.version.resolve("version") {
            Ok(raw) => VersionLabel::new(&raw)
                .map_err(|e| problems.push(format!("version: {e}")))
                .ok(),
            Err(e) => {
                problems.push(e.to_string());
                None
            }
        };

        let source_problems = [
            SourceBundle::validate_bucket(&self.source.bucket).err(),
            SourceBundle::validate_key(&self.source.key).err(),
        ];
        problems.extend(
            source_problems
                .into_iter()
                .flatten()
                .map(|e| format!("source: {e}")),
        );

        let wait = self.wait.map(|wait| {
            problems.extend(wait.problems());
            wait.settings()
        });

        let source = SourceBundle::new(&self.source.bucket, &self.source.key).ok();
        match (version_label, source) {
            (Some(version_label), Some(source)) if problems.is_empty() => {
                let plan = DeploymentPlan::new(
                    self.application.clone(),
                    self.environment.clone(),
                    version_label,
                    source,
                )
                .skip_existing_version(self.skip_existing_version);
                Ok(match wait {
                    Some(settings) => plan.wait(settings),
                    None => plan,
                })
            }
            _ => Err(Error::Invalid(problems)),
        }
    }
}
