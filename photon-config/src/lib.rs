//! Shared configuration loader for the photon toolchain.
//!
//! `defaults/photon.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer a project `photon.toml`, an
//! explicit file and command line overrides on top of those defaults via [`Loader`]
//! before deserializing into [`PhotonConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/photon.default.toml");

/// Project file picked up from the working directory when present.
pub const PROJECT_FILE: &str = "photon.toml";

/// Top-level configuration consumed by photon applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotonConfig {
    pub transpile: TranspileConfig,
    pub js: JsConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranspileConfig {
    pub target: String,
    pub output_dir: String,
    pub indent_width: usize,
}

/// Options for the `js` backend.
#[derive(Debug, Clone, Deserialize)]
pub struct JsConfig {
    pub platform: JsPlatform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsPlatform {
    Node,
    Web,
}

impl JsPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsPlatform::Node => "node",
            JsPlatform::Web => "web",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub log_level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Defaults plus `photon.toml` from `dir`, if there is one.
    pub fn for_project(dir: impl AsRef<Path>) -> Self {
        Self::new().with_optional_file(dir.as_ref().join(PROJECT_FILE))
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PhotonConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PhotonConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.transpile.target, "js");
        assert_eq!(config.transpile.output_dir, "Sources");
        assert_eq!(config.transpile.indent_width, 4);
        assert_eq!(config.js.platform, JsPlatform::Node);
        assert_eq!(config.diagnostics.log_level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("js.platform", "web")
            .expect("override to apply")
            .set_override("transpile.indent_width", 2)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.js.platform, JsPlatform::Web);
        assert_eq!(config.transpile.indent_width, 2);
    }

    #[test]
    fn file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photon.toml");
        fs::write(&path, "[transpile]\ntarget = \"c\"\n").unwrap();
        let config = Loader::new().with_file(&path).build().unwrap();
        assert_eq!(config.transpile.target, "c");
        assert_eq!(config.transpile.output_dir, "Sources");
    }

    #[test]
    fn project_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "[js]\nplatform = \"web\"\n").unwrap();
        let config = Loader::for_project(dir.path()).build().unwrap();
        assert_eq!(config.js.platform, JsPlatform::Web);
    }

    #[test]
    fn optional_file_may_be_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .unwrap();
        assert_eq!(config.transpile.target, "js");
    }

    #[test]
    fn required_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = Loader::new()
            .with_file(dir.path().join("absent.toml"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_platform() {
        let result = Loader::new()
            .set_override("js.platform", "deno")
            .unwrap()
            .build();
        assert!(result.is_err());
    }
}
