//! # Bookwyrm (library root)
//!
//! This crate provides the core plumbing for the **Bookwyrm** storefront CLI
//! and library:
//! - Catalog loading & metadata lookup (`catalog`).
//! - Fuzzy title search (`matcher`).
//! - Nearest-neighbor recommendations over a rating matrix (`pivot`, `neighbors`).
//! - Per-session cart state & checkout (`cart`).
//! - The storefront facade tying it all together (`store`).
//! - CLI parsing & configuration (`commands`, `config`).
//!
//! The recommendation model itself is trained offline: an external pipeline
//! produces the catalog tables and the pivoted rating matrix this crate loads
//! at startup. Bookwyrm only *queries* that data — it never mutates it.
//!
//! ## Artifact layout & discovery
//! By default, artifacts are expected under your per-platform config directory,
//! e.g.:
//!
//! - macOS: `~/Library/Application Support/com.awful-sec.bw/artifacts`
//! - Linux (XDG): `~/.config/bw/artifacts`
//! - Windows: `C:\Users\<you>\AppData\Roaming\bw\artifacts`
//!
//! The directory holds:
//!
//! ```text
//! titles.json            # Vec<String>: every catalog title
//! catalog.json           # Vec<CatalogEntry>: per-title metadata
//! ratings.bin            # RatingMatrix: title x user ratings (bincode)
//! neighbor_index.bin     # optional: dumped HNSW index
//! neighbor_index.yaml    # optional: index metadata (row titles, dimension)
//! ```
//!
//! When the index dump is absent it is rebuilt from `ratings.bin` at startup;
//! see [`store::Storefront::load`].
//!
//! ## Modules
//! - [`cart`], [`catalog`], [`commands`], [`config`], [`matcher`],
//!   [`neighbors`], [`pivot`], [`store`]

use directories::ProjectDirs;
use std::error::Error;

pub mod cart;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod matcher;
pub mod neighbors;
pub mod pivot;
pub mod store;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Return the per-platform configuration directory used by Bookwyrm.
///
/// This uses [`directories::ProjectDirs`] with the application triple
/// `("com", "awful-sec", "bw")`, so you get the right place on each OS
/// (e.g., `~/Library/Application Support/com.awful-sec.bw` on macOS).
///
/// The directory is **not** created by this function; callers that need it
/// should create it with `fs::create_dir_all`.
///
/// # Errors
/// Returns an error if the platform configuration directory cannot be
/// determined (rare but possible in heavily sandboxed environments).
///
/// # Examples
/// ```rust
/// let cfg = bookwyrm::config_dir().expect("has a config dir");
/// println!("config at {}", cfg.display());
/// ```
pub fn config_dir() -> Result<std::path::PathBuf, Box<dyn Error>> {
    let proj_dirs = ProjectDirs::from("com", "awful-sec", "bw")
        .ok_or("Unable to determine config directory")?;
    let config_dir = proj_dirs.config_dir().to_path_buf();

    Ok(config_dir)
}

/// Internal: the **default** on-disk location for storefront artifacts.
///
/// This is `config_dir()/artifacts`. The directory may or may not exist.
fn default_artifacts_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(crate::config_dir()?.join("artifacts"))
}

/// Internal: the artifacts directory a CWD-based deployment would use.
///
/// This is `./artifacts` under the current working directory.
fn cwd_artifacts_dir() -> io::Result<PathBuf> {
    Ok(std::env::current_dir()?.join("artifacts"))
}

/// Internal: does `p` look like a **non-empty directory**?
fn exists_nonempty_dir(p: &Path) -> bool {
    p.is_dir()
        && fs::read_dir(p)
            .map(|mut it| it.next().is_some())
            .unwrap_or(false)
}

/// Resolve a usable artifacts directory **without creating anything**.
///
/// This function picks an artifacts directory from (in priority order):
/// 1. An explicit override path (`cli_override`) — typically from a CLI flag
///    or the config file.
/// 2. A **CWD** entry at `./artifacts`.
/// 3. The default location under the app config dir: `config_dir()/artifacts`.
///
/// # Parameters
/// - `cli_override`: Optional explicit artifacts directory to use.
///
/// # Returns
/// The directory where the artifacts live.
///
/// # Errors
/// - The override path was provided but does not exist or is empty.
/// - No valid artifacts directory could be found in the known locations.
///
/// # Examples
/// ```no_run
/// let dir = bookwyrm::resolve_artifacts_dir(None).expect("artifacts present");
/// println!("artifacts at {}", dir.display());
/// ```
pub fn resolve_artifacts_dir(
    cli_override: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // 1) If caller provided a path (flag or config), prefer it
    if let Some(dir) = cli_override {
        if !exists_nonempty_dir(&dir) {
            return Err(format!(
                "--artifacts points to a non-existent/empty directory: {}",
                dir.display()
            )
            .into());
        }
        return Ok(dir);
    }

    // 2) If CWD has the folder, use it as-is
    let cwd_dir = cwd_artifacts_dir()?;
    if exists_nonempty_dir(&cwd_dir) {
        return Ok(cwd_dir);
    }

    // 3) Fallback to config_dir()/artifacts
    let cfg_dir = default_artifacts_dir()?;
    if exists_nonempty_dir(&cfg_dir) {
        return Ok(cfg_dir);
    }

    // 4) Nothing found — instruct caller how to provide it
    Err(format!(
        "Could not locate storefront artifacts. Provide them via:\n\
         - --artifacts /path/to/artifacts, or\n\
         - place them in {}, or\n\
         - put them under {}",
        cwd_dir.display(),
        cfg_dir.display()
    )
    .into())
}
