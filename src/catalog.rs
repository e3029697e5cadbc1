//! # Catalog Store
//!
//! Read-only, in-memory holder of the storefront's title list and per-title
//! metadata. Both are produced by an offline pipeline and loaded once at
//! process start; after that the catalog is never mutated, so it can be
//! shared freely across sessions.
//!
//! Display titles are **not** guaranteed unique in the source data. Lookups
//! return the first matching row, which is the defined (if arbitrary) policy
//! for duplicates.
//!
//! ## Quick Example
//! ```no_run
//! use bookwyrm::catalog::Catalog;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load(std::path::Path::new("artifacts"))?;
//! if let Some(entry) = catalog.entry("Dune") {
//!     println!("{} — {:?}", entry.title, entry.image_url);
//! }
//! # Ok(()) }
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;

/// File name of the serialized title list inside the artifacts directory.
pub const TITLES_FILE: &str = "titles.json";

/// File name of the serialized metadata table inside the artifacts directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// One row of the per-title metadata table.
///
/// Fields beyond `title` are display material; any of them may be missing for
/// a given book, and consumers must fall back gracefully (e.g., render a
/// "no image" placeholder instead of failing).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Display title; the join key across all storefront data.
    pub title: String,
    /// Author name, when known.
    #[serde(default)]
    pub author: Option<String>,
    /// Cover image URL, when known.
    #[serde(default)]
    pub image_url: Option<String>,
    /// How many ratings this title received in the source data.
    #[serde(default)]
    pub rating_count: u32,
    /// Mean rating across those ratings.
    #[serde(default)]
    pub avg_rating: Option<f32>,
}

/// The read-only catalog: every known title plus its metadata row.
///
/// `titles` is the authoritative list fed to the fuzzy matcher; `entries` is
/// the metadata table consulted for display. The two are loaded from separate
/// artifacts and are allowed to disagree — a title with no metadata row simply
/// renders without extras.
#[derive(Debug)]
pub struct Catalog {
    titles: Vec<String>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Construct a catalog from already-deserialized parts. Mostly useful in
    /// tests; production code goes through [`Catalog::load`].
    pub fn new(titles: Vec<String>, entries: Vec<CatalogEntry>) -> Self {
        Self { titles, entries }
    }

    /// Load the title list and metadata table from `artifacts_dir`.
    ///
    /// Reads `titles.json` and `catalog.json`, both plain serde_json
    /// artifacts.
    ///
    /// # Errors
    /// - Either file is missing or unreadable.
    /// - Either file fails to parse as its expected shape.
    pub fn load(artifacts_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let titles_path = artifacts_dir.join(TITLES_FILE);
        let catalog_path = artifacts_dir.join(CATALOG_FILE);

        let titles: Vec<String> = serde_json::from_str(&fs::read_to_string(&titles_path)?)?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&fs::read_to_string(&catalog_path)?)?;

        info!(
            "Catalog loaded: {} titles, {} metadata rows",
            titles.len(),
            entries.len()
        );

        Ok(Self { titles, entries })
    }

    /// The full title list, in artifact order.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of known titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True when the catalog holds no titles.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Whether `title` appears in the title list (exact match).
    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    /// Look up the metadata row for `title`.
    ///
    /// Returns the **first** matching row, or `None` when the title has no
    /// metadata. Duplicate titles are legal in the source data; first match
    /// wins.
    pub fn entry(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    /// Convenience accessor: the cover image URL for `title`, if any.
    ///
    /// `None` covers both "title unknown" and "no image on file"; callers
    /// render a placeholder either way.
    pub fn image_url(&self, title: &str) -> Option<&str> {
        self.entry(title).and_then(|e| e.image_url.as_deref())
    }
}
