//! Shared configuration loader for the orgview toolchain.
//!
//! `defaults/orgview.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`OrgviewConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use orgview_render::view::ToggleGlyphs;
use orgview_render::{RenderOptions, ViewOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/orgview.default.toml");

/// Name of the per-project file picked up from the working directory.
pub const PROJECT_FILE: &str = "orgview.toml";

/// Top-level configuration consumed by orgview applications.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgviewConfig {
    pub render: RenderConfig,
    pub view: ViewConfig,
}

/// Page output knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub standalone: bool,
    pub title: String,
    /// Stylesheet appended after the built-in one; read by the application.
    #[serde(default)]
    pub custom_css: Option<PathBuf>,
}

/// The stylesheet itself is not loaded here, callers attach it with
/// [`RenderOptions::with_custom_css`].
impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            standalone: config.standalone,
            title: config.title.clone(),
            custom_css: None,
        }
    }
}

/// Structural enhancer knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub expanded_glyph: String,
    pub collapsed_glyph: String,
    pub spy_tolerance: f64,
    pub link_file_references: bool,
    pub toc: bool,
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        ViewOptions {
            glyphs: ToggleGlyphs {
                expanded: config.expanded_glyph.clone(),
                collapsed: config.collapsed_glyph.clone(),
            },
            spy_tolerance: config.spy_tolerance,
            link_file_references: config.link_file_references,
            toc: config.toc,
        }
    }
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

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<OrgviewConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<OrgviewConfig, ConfigError> {
    Loader::new().build()
}
