//! Main module for the Bookwyrm CLI application (bw).
//!
//! This module provides the main function and auxiliary functionalities for
//! the CLI application. It handles command parsing, configuration loading, and
//! initialization, as well as invoking the appropriate functionalities based on
//! the provided command-line arguments.
//!
//! # Examples
//!
//! Running an interactive shopping session:
//!
//! ```sh
//! cargo run -- shop
//! bw shop
//! ```
//!
//! Initializing the application's configuration:
//!
//! ```sh
//! cargo run -- init
//! bw init
//! ```

use bookwyrm::cart::AddOutcome;
use bookwyrm::commands::{Cli, Commands};
use bookwyrm::config::{self, StoreConfig};
use bookwyrm::config_dir;
use bookwyrm::store::{StoreSession, Storefront};
use clap::Parser;
use once_cell::sync::OnceCell;
use std::io::{self, BufRead, Write};
use std::{env, error::Error, fs};
use tracing::{debug, info};

static TRACING: OnceCell<()> = OnceCell::new();

fn main() -> Result<(), Box<dyn Error>> {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt::init();
    });
    run()
}

/// Main function of the Bookwyrm CLI application.
///
/// Loads configuration, parses command-line arguments, and executes the
/// appropriate command.
///
/// # Errors
///
/// Returns an error if there is an issue loading the configuration or the
/// storefront artifacts, or executing the specified command.
fn run() -> Result<(), Box<dyn Error>> {
    let config_path = if env::var("IN_TEST_ENVIRONMENT").is_ok() {
        // If we're in a test environment, load the config from the project directory
        env::current_dir()?.join("config.yaml")
    } else {
        // Otherwise, load the config from the user's config directory
        config_dir()?.join("config.yaml")
    };

    debug!("Loading config from: {}", config_path.display());
    let mut store_config = if config_path.is_file() {
        config::load_config(config_path.to_str().ok_or("non-UTF8 config path")?)?
    } else {
        debug!("No config file found; using defaults");
        StoreConfig::default()
    };
    debug!("Config loaded: {:?}", store_config);

    let cli = Cli::parse();
    if cli.artifacts.is_some() {
        store_config.artifacts_dir = cli.artifacts;
    }

    match cli.command {
        Commands::Shop => {
            let store = Storefront::load(store_config)?;
            shop(&store)?;
        }
        Commands::Search { query } => {
            let store = Storefront::load(store_config)?;
            let hits = store.search(&query);
            if hits.is_empty() {
                println!("❌ No suggestions found.");
            } else {
                for (i, title) in hits.iter().enumerate() {
                    println!("{}. {title}", i + 1);
                }
            }
        }
        Commands::Recommend { title, count } => {
            let store = Storefront::load(store_config)?;
            let recs = store.recommend(&title, count);
            if recs.is_empty() {
                println!("No recommendations for {title:?}.");
            } else {
                for rec in recs {
                    println!("{rec}");
                }
            }
        }
        Commands::Init => {
            debug!("Initializing configuration");
            init()?;
        }
    }

    Ok(())
}

/// Initializes the application's configuration.
///
/// Creates the config directory, writes a default `config.yaml`, and creates
/// an empty artifacts directory for the offline pipeline to fill.
///
/// # Errors
///
/// Returns an error if there is an issue creating the directories or files,
/// or serializing the configuration to YAML.
fn init() -> Result<(), Box<dyn Error>> {
    let config_dir = config_dir()?;
    info!("Creating config directory: {}", config_dir.display());
    fs::create_dir_all(&config_dir)?;

    let artifacts_dir = config_dir.join("artifacts");
    info!("Creating artifacts directory: {}", artifacts_dir.display());
    fs::create_dir_all(&artifacts_dir)?;

    let config_path = config_dir.join("config.yaml");
    info!("Creating config file: {}", config_path.display());
    let config = StoreConfig {
        artifacts_dir: Some(artifacts_dir),
        ..StoreConfig::default()
    };
    let config_yaml = serde_yaml::to_string(&config)?;
    fs::write(config_path, config_yaml)?;

    println!("Initialized. Drop your catalog artifacts into the artifacts directory and run `bw shop`.");
    Ok(())
}

const SHOP_HELP: &str = "\
Commands:
  search <text>     fuzzy-search the catalog
  add <title>       add a title to your cart
  rm <title>        remove a title from your cart
  cart              show your cart
  recs              show 'users also bought' suggestions
  recs-add all      add every current suggestion (combo)
  recs-add <n>...   add suggestions by number
  checkout          ring it up and clear the cart
  help              this text
  quit              leave the shop";

/// Run one interactive shopping session against `store`.
///
/// Reads commands from stdin line by line; every action recomputes cart and
/// suggestion state before the next prompt. Ends on `quit` or EOF, discarding
/// any un-checked-out cart.
fn shop(store: &Storefront) -> Result<(), Box<dyn Error>> {
    let mut session = StoreSession::new(store);
    let stdin = io::stdin();

    println!("📚 Welcome to Bookwyrm ({} titles).", store.catalog().len());
    println!("{SHOP_HELP}");

    loop {
        print!("bw> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "search" => {
                let hits = session.search(rest);
                if hits.is_empty() {
                    println!("❌ No suggestions found.");
                } else {
                    println!("Did you mean?");
                    for (i, title) in hits.iter().enumerate() {
                        println!("  {}. {title}", i + 1);
                    }
                }
            }
            "add" => match session.add_to_cart(rest) {
                AddOutcome::Added => {
                    match store.catalog().image_url(rest) {
                        Some(url) => println!("✅ '{rest}' added to cart! [{url}]"),
                        None => println!("✅ '{rest}' added to cart! [no image]"),
                    };
                }
                AddOutcome::AlreadyInCart => {
                    println!("⚠️  '{rest}' is already in your cart.");
                }
            },
            "rm" => {
                if session.remove_from_cart(rest) {
                    println!("Removed '{rest}'.");
                } else {
                    println!("'{rest}' is not in your cart.");
                }
            }
            "cart" => {
                if session.cart().is_empty() {
                    println!("Your cart is empty.");
                } else {
                    println!("🛒 Your cart:");
                    for title in session.cart().items() {
                        match store.catalog().image_url(title) {
                            Some(url) => println!("  {title} [{url}]"),
                            None => println!("  {title} [no image]"),
                        }
                    }
                }
            }
            "recs" => {
                let suggestions = session.suggestions();
                if suggestions.is_empty() {
                    println!("Add books to your cart to get recommendations.");
                } else {
                    println!("🛍️  Users also bought:");
                    for (i, title) in suggestions.iter().enumerate() {
                        println!("  {}. {title}", i + 1);
                    }
                }
            }
            "recs-add" => {
                let suggestions = session.suggestions();
                if suggestions.is_empty() {
                    println!("Nothing to add — your suggestion list is empty.");
                } else if rest == "all" {
                    let count = session.add_recommended(&suggestions);
                    let price = count as u32 * store.config().unit_price;
                    println!("Combo added: {count} books for ${price}.");
                } else {
                    let picked: Vec<&String> = rest
                        .split_whitespace()
                        .filter_map(|tok| tok.parse::<usize>().ok())
                        .filter_map(|n| n.checked_sub(1))
                        .filter_map(|i| suggestions.get(i))
                        .collect();
                    if picked.is_empty() {
                        println!("Usage: recs-add all | recs-add <n> [<n>...]");
                    } else {
                        let count = session.add_recommended(picked);
                        println!("Added {count} recommended books to your cart.");
                    }
                }
            }
            "checkout" => {
                if session.cart().is_empty() {
                    println!("Add some books to your cart to proceed to checkout.");
                } else {
                    let receipt = session.checkout();
                    println!(
                        "💳 Thank you for your purchase of {} books! Total: ${}",
                        receipt.item_count, receipt.total_price
                    );
                }
            }
            "help" => println!("{SHOP_HELP}"),
            "quit" | "exit" => break,
            _ => println!("Unknown command '{cmd}'. Try 'help'."),
        }
    }

    Ok(())
}
