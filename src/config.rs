//! This module provides functionality for loading and handling the application's configuration.
//!
//! It defines the `StoreConfig` struct, which holds the configuration parameters,
//! and a `load_config` function to load the configuration from a file.
//!
//! # Examples
//!
//! Loading the configuration from a file:
//!
//! ```no_run
//! use bookwyrm::config::{StoreConfig, load_config};
//!
//! let config_file_path = "/path/to/config.yaml";
//! let config: StoreConfig = load_config(config_file_path).unwrap();
//! println!("{:?}", config);
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{error::Error, fs};

/// Represents the storefront configuration.
///
/// This struct holds the tuning knobs for search and recommendation, plus the
/// location of the offline-produced artifacts. It can be constructed by
/// loading a YAML configuration file using the `load_config` function; every
/// knob has a default so a minimal (even empty) config file is valid.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct StoreConfig {
    /// Where the catalog, rating matrix, and index artifacts live.
    /// `None` means "resolve via the usual locations" (see
    /// [`crate::resolve_artifacts_dir`]).
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,

    /// Maximum number of fuzzy-search suggestions shown for a query.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Minimum similarity score (0.0–1.0) for a fuzzy match to be presented.
    #[serde(default = "default_score_cutoff")]
    pub score_cutoff: f64,

    // Neighbors fetched per cart item when aggregating "also bought".
    #[serde(default = "default_neighbors_per_item")]
    pub neighbors_per_item: usize,

    // Flat price per book, in whole currency units.
    #[serde(default = "default_unit_price")]
    pub unit_price: u32,
}

fn default_suggestion_limit() -> usize {
    10
}

fn default_score_cutoff() -> f64 {
    0.4
}

fn default_neighbors_per_item() -> usize {
    3
}

fn default_unit_price() -> u32 {
    1
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: None,
            suggestion_limit: default_suggestion_limit(),
            score_cutoff: default_score_cutoff(),
            neighbors_per_item: default_neighbors_per_item(),
            unit_price: default_unit_price(),
        }
    }
}

/// Loads the storefront configuration from a YAML file.
///
/// This function reads the file at the given path, parses it as YAML, and
/// constructs a `StoreConfig` struct from it. Missing knobs fall back to
/// their defaults.
///
/// # Parameters
///
/// - `file`: The path to the YAML configuration file.
///
/// # Returns
///
/// - `Ok(StoreConfig)`: The loaded configuration.
/// - `Err(Box<dyn Error>)`: An error occurred while reading the file or parsing the YAML.
///
/// # Examples
///
/// ```no_run
/// use bookwyrm::config::load_config;
///
/// let config_file_path = "/path/to/config.yaml";
/// match load_config(config_file_path) {
///     Ok(config) => println!("{:?}", config),
///     Err(err) => eprintln!("Error loading config: {}", err),
/// }
/// ```
pub fn load_config(file: &str) -> Result<StoreConfig, Box<dyn Error>> {
    let content = fs::read_to_string(file)?;
    let config: StoreConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_valid_file() {
        // Create a temporary file with a valid configuration.
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
artifacts_dir: "/srv/bookwyrm/artifacts"
suggestion_limit: 5
score_cutoff: 0.55
neighbors_per_item: 4
unit_price: 2
"#
        )
        .unwrap();

        // Load the configuration from the temporary file.
        let config = load_config(temp_file.path().to_str().unwrap());

        // Assert that the configuration was loaded successfully and has the expected values.
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(
            config.artifacts_dir,
            Some(PathBuf::from("/srv/bookwyrm/artifacts"))
        );
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.score_cutoff, 0.55);
        assert_eq!(config.neighbors_per_item, 4);
        assert_eq!(config.unit_price, 2);
    }

    #[test]
    fn test_load_config_defaults() {
        // A config that only pins the artifacts dir gets defaults for the rest.
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"artifacts_dir: "/srv/bookwyrm/artifacts""#).unwrap();

        let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.suggestion_limit, 10);
        assert_eq!(config.score_cutoff, 0.4);
        assert_eq!(config.neighbors_per_item, 3);
        assert_eq!(config.unit_price, 1);
    }

    #[test]
    fn test_load_config_invalid_file() {
        // Try to load a configuration from a non-existent file path.
        let config = load_config("non/existent/path");

        // Assert that an error occurred.
        assert!(config.is_err());
    }

    #[test]
    fn test_load_config_invalid_format() {
        // Create a temporary file with an invalid configuration format.
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"invalid: config: format"#).unwrap();

        // Try to load the configuration from the temporary file.
        let config = load_config(temp_file.path().to_str().unwrap());

        // Assert that an error occurred due to the invalid format.
        assert!(config.is_err());
    }
}
