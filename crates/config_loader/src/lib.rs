//! # Config Loader
//!
//! Configuration document reading and writing.
//!
//! Responsibilities:
//! - Parse TOML/JSON committer documents into a `ConfigFragment` tree
//! - Validate the tree structure
//! - Render a `ConfigFragment` tree back to TOML/JSON
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let root = ConfigLoader::load_from_path(Path::new("committers.toml")).unwrap();
//! println!("Root class: {}", root.class);
//! ```

mod parser;
mod validator;

pub use contracts::ConfigFragment;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files, readers or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ConfigFragment, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from any reader
    pub fn load_from_reader<R: Read>(
        mut reader: R,
        format: ConfigFormat,
    ) -> Result<ConfigFragment, ContractError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConfigFragment, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize a fragment tree to TOML string
    pub fn to_toml(fragment: &ConfigFragment) -> Result<String, ContractError> {
        parser::render(fragment, ConfigFormat::Toml)
    }

    /// Serialize a fragment tree to JSON string
    pub fn to_json(fragment: &ConfigFragment) -> Result<String, ContractError> {
        parser::render(fragment, ConfigFormat::Json)
    }

    /// Write a fragment tree to any writer
    pub fn write_to<W: Write>(
        mut writer: W,
        fragment: &ConfigFragment,
        format: ConfigFormat,
    ) -> Result<(), ContractError> {
        let rendered = parser::render(fragment, format)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write a fragment tree to a file, format picked from the extension
    pub fn save_to_path(path: &Path, fragment: &ConfigFragment) -> Result<(), ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        Self::write_to(file, fragment, format)?;
        debug!(path = %path.display(), ?format, "configuration written");
        Ok(())
    }
}

impl ConfigLoader {
    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConfigFragment, ContractError> {
        let root = parser::parse(content, format)?;
        validator::validate(&root)?;
        Ok(root)
    }
}
