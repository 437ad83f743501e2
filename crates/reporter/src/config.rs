//! Reporter configuration

use anyhow::{Context, Result};
use report_lib::RunConfig;
use serde::Deserialize;
use std::path::Path;

/// Environment prefix, e.g. `LOADSCOPE_RUN__ENGINE=firefox`
pub const ENV_PREFIX: &str = "LOADSCOPE";

/// Reporter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    /// Settings applied to every run
    #[serde(default)]
    pub run: RunConfig,

    /// Upper bound on runs processed at the same time
    #[serde(default = "default_max_parallel_runs")]
    pub max_parallel_runs: usize,
}

fn default_max_parallel_runs() -> usize {
    4
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            max_parallel_runs: default_max_parallel_runs(),
        }
    }
}

impl ReporterConfig {
    /// Load from an optional file, overridden by `LOADSCOPE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, environment())
    }

    fn from_sources(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(env)
            .build()
            .context("Failed to load reporter configuration")?;

        let config: ReporterConfig = config
            .try_deserialize()
            .context("Invalid reporter configuration")?;
        config.run.validate()?;
        Ok(config)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_lib::BrowserEngine;
    use std::fs;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ReporterConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config.max_parallel_runs, 4);
        assert_eq!(config.run.engine, BrowserEngine::Chromium);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ReporterConfig::from_sources(
            None,
            env(&[
                ("LOADSCOPE_RUN__ENGINE", "firefox"),
                ("LOADSCOPE_MAX_PARALLEL_RUNS", "8"),
            ]),
        )
        .unwrap();
        assert_eq!(config.run.engine, BrowserEngine::Firefox);
        assert_eq!(config.max_parallel_runs, 8);
    }

    #[test]
    fn test_file_with_interception_plan() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reporter.json");
        fs::write(
            &path,
            r#"{
                "run": {
                    "engine": "webkit",
                    "viewport": {"width": 1280, "height": 720},
                    "interception": {"policies": [
                        {"kind": "delay", "pattern": "*.js", "delay_ms": 300},
                        {"kind": "block", "pattern": "*ads*"}
                    ]}
                }
            }"#,
        )
        .unwrap();

        let config = ReporterConfig::from_sources(Some(&path), env(&[])).unwrap();
        assert_eq!(config.run.engine, BrowserEngine::Webkit);
        assert_eq!(config.run.viewport.width, 1280.0);
        assert_eq!(config.run.interception.policies.len(), 2);
    }

    #[test]
    fn test_invalid_viewport_is_rejected() {
        let result = ReporterConfig::from_sources(None, env(&[("LOADSCOPE_RUN__VIEWPORT__WIDTH", "0")]));
        assert!(result.is_err());
    }
}
