//! Shared configuration loader for the ajs toolchain.
//!
//! The defaults ship inside the crate as `defaults/ajs.default.toml`, so every tool
//! starts from the same settings. [`Loader`] stacks user files, environment
//! variables and single-key overrides on top and deserializes the result into
//! [`AjsConfig`], which hands out parser settings ([`AjsConfig::parse_options`]) or
//! a ready [`UnitLoader`] ([`AjsConfig::unit_loader`]).

use ajs_parser::ajs::lexing::ScannerOptions;
use ajs_parser::{LoaderError, ParseOptions, UnitLoader};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map, ValueKind};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/ajs.default.toml");
const ENV_PREFIX: &str = "AJS";

/// Top-level configuration consumed by ajs applications.
#[derive(Debug, Clone, Deserialize)]
pub struct AjsConfig {
    pub parsing: ParsingConfig,
}

/// How unit definition files are read.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    /// WHATWG label of the byte encoding (`utf-8`, `shift_jis`, `euc-jp`).
    pub encoding: String,
    /// Escape prefix inside quoted values.
    pub escape: char,
    pub comments: CommentsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    pub skip: bool,
    pub line: String,
    pub block_start: String,
    pub block_end: String,
}

impl AjsConfig {
    /// Parser settings described by this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        let comments = &self.parsing.comments;
        let scanner = ScannerOptions::default()
            .with_comments(comments.skip)
            .with_line_comment(comments.line.clone())
            .with_block_comment(comments.block_start.clone(), comments.block_end.clone());
        ParseOptions::new(scanner).with_escape(self.parsing.escape)
    }

    /// The configured encoding, if its label is known.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        Encoding::for_label(self.parsing.encoding.trim().as_bytes())
    }

    /// A loader using the configured encoding and parser settings.
    pub fn unit_loader(&self) -> Result<UnitLoader, LoaderError> {
        UnitLoader::new()
            .with_options(self.parse_options())
            .with_encoding_label(&self.parsing.encoding)
    }
}

/// Builds an [`AjsConfig`] from the embedded defaults plus whatever layers are added.
///
/// Layers apply in the order they are added, later ones winning; explicit overrides
/// beat every layer.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Add a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), true)
    }

    /// Add a TOML file that is skipped when absent, e.g. `~/.config/ajs/ajs.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), false)
    }

    /// Read `AJS_PARSING__ENCODING`-style variables from the process environment.
    pub fn with_environment(self) -> Self {
        self.layer_environment(None)
    }

    /// Set one key, e.g. `parsing.encoding` from a command line flag.
    pub fn set_override<I>(self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        let builder = self.builder.set_override(key, value)?;
        Ok(Self { builder })
    }

    pub fn build(self) -> Result<AjsConfig, ConfigError> {
        let merged = self.builder.build()?;
        merged.try_deserialize()
    }

    fn layer_file(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }

    fn layer_environment(mut self, vars: Option<Map<String, String>>) -> Self {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(vars);
        self.builder = self.builder.add_source(environment);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<AjsConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8};

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parsing.escape, '#');
        assert!(config.parsing.comments.skip);
        assert_eq!(config.encoding(), Some(UTF_8));
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parsing.encoding", "Shift_JIS")
            .expect("override to apply")
            .set_override("parsing.comments.skip", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.encoding(), Some(SHIFT_JIS));
        assert!(!config.parse_options().scanner.skip_comments);
        assert_eq!(config.unit_loader().expect("known encoding").encoding(), SHIFT_JIS);
    }

    #[test]
    fn layers_user_files() {
        let path = std::env::temp_dir().join(format!("ajs-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[parsing]\nescape = \"\\\\\"\n").expect("write user config");
        let config = Loader::new().with_file(&path).build().expect("config to build");
        std::fs::remove_file(&path).expect("remove user config");

        assert_eq!(config.parsing.escape, '\\');
        assert_eq!(config.parsing.comments.line, "//");
        let tree = ajs_parser::parse_with("unit=A,,,;{ty=j;cm=\"a\\\"b\";}", &config.parse_options())
            .expect("parse with backslash escapes");
        let cm = tree.root().and_then(|unit| unit.parameter("cm")).expect("cm parameter");
        assert_eq!(cm.first_value().as_str(), "a\"b");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/ajs.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.parsing.encoding, "utf-8");
        assert!(Loader::new().with_file("/nonexistent/ajs.toml").build().is_err());
    }

    #[test]
    fn reads_environment_variables() {
        let vars = Map::from([
            ("AJS_PARSING__ENCODING".to_string(), "euc-jp".to_string()),
            ("AJS_PARSING__COMMENTS__SKIP".to_string(), "false".to_string()),
            ("OTHER_PARSING__ESCAPE".to_string(), "\\".to_string()),
        ]);
        let config = Loader::new()
            .layer_environment(Some(vars))
            .build()
            .expect("config to build");
        assert_eq!(config.encoding(), Some(encoding_rs::EUC_JP));
        assert!(!config.parsing.comments.skip);
        assert_eq!(config.parsing.escape, '#');
    }

    #[test]
    fn rejects_unusable_encodings() {
        let config = Loader::new()
            .set_override("parsing.encoding", "utf-16le")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(matches!(config.unit_loader(), Err(LoaderError::Encoding(_))));
    }
}
