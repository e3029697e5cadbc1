//! This module defines the command-line interface for the application using `clap`.
//!
//! It provides a `Cli` struct that represents the parsed command-line arguments,
//! and a `Commands` enum that represents the available subcommands and their
//! options.
//!
//! # Examples
//!
//! ```sh
//! bw shop                       # interactive storefront session
//! bw search "dunne"             # one-shot fuzzy search
//! bw recommend "Dune" -k 5      # one-shot neighbor query
//! bw init                       # write a default config.yaml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Represents the parsed command-line arguments.
///
/// This struct is constructed by parsing the command-line arguments using `clap`.
/// It contains a `command` field that holds the parsed subcommand and its options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true, color = clap::ColorChoice::Always)]
pub struct Cli {
    /// The parsed subcommand and its options.
    #[command(subcommand)]
    pub command: Commands,

    /// Override the artifacts directory for any subcommand that loads the
    /// storefront.
    #[arg(long = "artifacts", global = true, env = "BOOKWYRM_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,
}

/// Represents the available subcommands and their options.
///
/// Each variant of this enum corresponds to a subcommand that the user can invoke
/// from the command line, along with any options specific to that subcommand.
#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum Commands {
    /// The 'shop' subcommand: an interactive storefront session with search,
    /// cart, recommendations, and checkout.
    ///
    /// This subcommand can be invoked with either 's' or 'shop'.
    #[clap(name = "shop", alias = "s")]
    Shop,

    /// The 'search' subcommand: fuzzy-match a query against the catalog and
    /// print the suggestions.
    #[clap(name = "search", alias = "q")]
    Search {
        /// Free-text title query.
        query: String,
    },

    /// The 'recommend' subcommand: print the nearest-neighbor titles for one
    /// known title.
    #[clap(name = "recommend", alias = "r")]
    Recommend {
        /// The exact catalog title to query.
        title: String,

        /// How many neighbors to return.
        #[arg(name = "count", short = 'k', default_value_t = 3)]
        count: usize,
    },

    /// The 'init' subcommand, which takes no arguments and is used for initialization.
    ///
    /// When invoked, this subcommand performs setup tasks: creating the config
    /// directory, a default `config.yaml`, and an empty artifacts directory.
    Init,
}
