//! # Storefront facade & session context
//!
//! [`Storefront`] bundles the read-only halves of the system — catalog,
//! neighbor index, configuration — loaded once at startup and shared by every
//! session. [`StoreSession`] is the per-user half: it borrows a storefront
//! and owns a [`Cart`], so session state is an explicit, injected object
//! rather than ambient global state, and the whole thing is testable without
//! a hosting runtime.
//!
//! The "users also bought" aggregation lives here too: union the neighbor
//! results for every cart item, dedupe, and drop anything already in the
//! cart.
//!
//! ## Quick start
//! ```no_run
//! use bookwyrm::config::StoreConfig;
//! use bookwyrm::store::{StoreSession, Storefront};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Storefront::load(StoreConfig::default())?;
//! let mut session = StoreSession::new(&store);
//!
//! for hit in session.search("dune") {
//!     println!("did you mean {hit}?");
//! }
//! session.add_to_cart("Dune");
//! println!("also bought: {:?}", session.suggestions());
//! let receipt = session.checkout();
//! println!("{} books, {} total", receipt.item_count, receipt.total_price);
//! # Ok(()) }
//! ```

use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, info, warn};

use crate::cart::{AddOutcome, Cart, Receipt};
use crate::catalog::Catalog;
use crate::config::StoreConfig;
use crate::matcher;
use crate::neighbors::NeighborIndex;
use crate::pivot::RatingMatrix;

/// The immutable, process-wide half of the storefront.
///
/// Loaded once from artifacts; after that nothing here mutates, so a single
/// `Storefront` can back any number of concurrent sessions without
/// synchronization.
pub struct Storefront {
    catalog: Catalog,
    index: NeighborIndex,
    config: StoreConfig,
}

impl Storefront {
    /// Assemble a storefront from already-loaded parts. Mostly useful in
    /// tests; production code goes through [`Storefront::load`].
    pub fn new(catalog: Catalog, index: NeighborIndex, config: StoreConfig) -> Self {
        Self {
            catalog,
            index,
            config,
        }
    }

    /// Load every artifact and stand up the storefront.
    ///
    /// Resolves the artifacts directory (explicit config path, then
    /// `./artifacts`, then the per-platform config dir), loads the catalog
    /// tables and the rating matrix, and either rehydrates a dumped neighbor
    /// index or builds one from the matrix.
    ///
    /// This is the only fatal-error path in the crate; it runs before any
    /// session exists.
    ///
    /// # Errors
    /// - No artifacts directory could be resolved.
    /// - Any artifact is missing, unreadable, malformed, or inconsistent
    ///   with the others.
    pub fn load(config: StoreConfig) -> Result<Self, Box<dyn Error>> {
        let dir = crate::resolve_artifacts_dir(config.artifacts_dir.clone())?;
        info!("Loading storefront artifacts from {}", dir.display());

        let catalog = Catalog::load(&dir)?;
        let matrix = RatingMatrix::load(&dir)?;

        let index = if NeighborIndex::dump_exists(&dir) {
            NeighborIndex::load(&dir, &matrix)?
        } else {
            debug!("No index dump found; building from the rating matrix");
            NeighborIndex::build(&matrix)?
        };

        Ok(Self::new(catalog, index, config))
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Fuzzy-match `query` against the catalog, using the configured
    /// suggestion limit and score cutoff.
    pub fn search(&self, query: &str) -> Vec<String> {
        matcher::suggest(
            query,
            self.catalog.titles(),
            self.config.suggestion_limit,
            self.config.score_cutoff,
        )
    }

    /// The k nearest other titles for `title`; empty when the title has no
    /// row in the index.
    pub fn recommend(&self, title: &str, k: usize) -> Vec<String> {
        self.index.recommend(title, k)
    }

    /// Aggregate "users also bought" suggestions for a whole cart.
    ///
    /// Unions the neighbor results for each cart item (`k_per_item` apiece),
    /// keeping each suggestion once in first-seen order, and drops any title
    /// already in the cart. An empty cart yields an empty list — "no
    /// recommendations yet", not an error.
    pub fn also_bought(&self, cart: &Cart, k_per_item: usize) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut suggestions = Vec::new();

        for item in cart.items() {
            for rec in self.index.recommend(item, k_per_item) {
                if cart.contains(&rec) || !seen.insert(rec.clone()) {
                    continue;
                }
                suggestions.push(rec);
            }
        }

        suggestions
    }
}

/// One user's interactive session: a borrowed storefront plus an owned cart.
///
/// Sessions are cheap to create and die with the interaction; nothing in
/// them is persisted. The storefront reference must outlive the session.
pub struct StoreSession<'a> {
    store: &'a Storefront,
    cart: Cart,
}

impl<'a> StoreSession<'a> {
    /// Start a fresh session against `store` with an empty cart.
    pub fn new(store: &'a Storefront) -> Self {
        Self {
            store,
            cart: Cart::new(),
        }
    }

    /// Fuzzy-search the catalog. See [`Storefront::search`].
    pub fn search(&self, query: &str) -> Vec<String> {
        self.store.search(query)
    }

    /// Add `title` to the cart.
    ///
    /// Membership in the catalog is checked best-effort: an unknown title is
    /// still accepted (it may simply lack metadata), but gets a warning log
    /// since it can never produce recommendations.
    pub fn add_to_cart(&mut self, title: &str) -> AddOutcome {
        if !self.store.catalog.contains(title) {
            warn!("Adding {title:?} to cart, but it is not in the catalog");
        }
        self.cart.add(title)
    }

    /// Batch-add titles (the "add selected recommendations" / combo action).
    /// Returns how many were new.
    pub fn add_recommended<I, S>(&mut self, titles: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cart.add_all(titles)
    }

    /// Remove `title` from the cart; `false` if it wasn't there.
    pub fn remove_from_cart(&mut self, title: &str) -> bool {
        self.cart.remove(title)
    }

    /// The current cart contents.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Recompute "users also bought" suggestions for the current cart.
    ///
    /// Derived on demand from cart state; never cached, never persisted.
    pub fn suggestions(&self) -> Vec<String> {
        self.store
            .also_bought(&self.cart, self.store.config.neighbors_per_item)
    }

    /// Check out at the configured unit price, clearing the cart.
    pub fn checkout(&mut self) -> Receipt {
        self.cart.checkout(self.store.config.unit_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    /// Three well-separated books plus a close companion for "Dune", so
    /// neighbor queries come back in a known order.
    fn sample_store() -> Storefront {
        let titles = vec![
            "Dune".to_string(),
            "Dune Messiah".to_string(),
            "Foundation".to_string(),
            "Neuromancer".to_string(),
        ];
        let entries = vec![CatalogEntry {
            title: "Dune".into(),
            author: Some("Frank Herbert".into()),
            image_url: Some("http://img/dune.jpg".into()),
            rating_count: 42,
            avg_rating: Some(4.5),
        }];
        let matrix = RatingMatrix::new(
            titles.clone(),
            vec![1, 2, 3],
            vec![
                vec![5.0, 0.0, 0.0],
                vec![4.5, 0.5, 0.0],
                vec![0.0, 5.0, 0.0],
                vec![0.0, 0.0, 5.0],
            ],
        )
        .unwrap();
        let index = NeighborIndex::build(&matrix).unwrap();

        Storefront::new(Catalog::new(titles, entries), index, StoreConfig::default())
    }

    #[test]
    fn test_empty_cart_has_no_suggestions() {
        let store = sample_store();
        let session = StoreSession::new(&store);
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn test_suggestions_disjoint_from_cart() {
        let store = sample_store();
        let mut session = StoreSession::new(&store);

        session.add_to_cart("Dune");
        let recs = store.recommend("Dune", 2);
        assert!(recs.len() <= 2);
        assert!(!recs.contains(&"Dune".to_string()));

        // Add one of Dune's own recommendations; neither cart member may
        // reappear as a suggestion, however often the model recommends them.
        session.add_to_cart("Foundation");
        let suggestions = session.suggestions();
        for item in session.cart().items() {
            assert!(!suggestions.contains(item));
        }
    }

    #[test]
    fn test_suggestions_deduplicated() {
        let store = sample_store();
        let mut session = StoreSession::new(&store);
        session.add_to_cart("Foundation");
        session.add_to_cart("Neuromancer");

        let suggestions = session.suggestions();
        let unique: HashSet<&String> = suggestions.iter().collect();
        assert_eq!(unique.len(), suggestions.len());
    }

    #[test]
    fn test_unknown_title_tolerated_in_cart() {
        let store = sample_store();
        let mut session = StoreSession::new(&store);

        assert_eq!(session.add_to_cart("Snow Crash"), AddOutcome::Added);
        // The unknown title contributes nothing, and nothing blows up.
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn test_checkout_clears_cart_and_counts() {
        let store = sample_store();
        let mut session = StoreSession::new(&store);
        session.add_to_cart("Dune");
        session.add_to_cart("Foundation");

        let receipt = session.checkout();
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.total_price, 2);
        assert!(session.cart().is_empty());
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn test_search_uses_configured_cutoff() {
        let store = sample_store();
        let session = StoreSession::new(&store);

        assert_eq!(
            session.search("dune").first().map(String::as_str),
            Some("Dune")
        );
        assert!(session.search("qqqqqqqqqq").is_empty());
    }

    #[test]
    fn test_add_recommended_batch() {
        let store = sample_store();
        let mut session = StoreSession::new(&store);
        session.add_to_cart("Dune");

        let suggestions = session.suggestions();
        assert!(!suggestions.is_empty());
        let added = session.add_recommended(&suggestions);
        assert_eq!(added, suggestions.len());

        // Everything suggested is now in the cart and out of the pool.
        for title in &suggestions {
            assert!(session.cart().contains(title));
        }
    }

    #[test]
    fn test_load_from_artifacts_dir() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let titles = vec!["Dune".to_string(), "Foundation".to_string()];
        let entries: Vec<CatalogEntry> = vec![];
        std::fs::write(
            dir.path().join(crate::catalog::TITLES_FILE),
            serde_json::to_string(&titles)?,
        )?;
        std::fs::write(
            dir.path().join(crate::catalog::CATALOG_FILE),
            serde_json::to_string(&entries)?,
        )?;
        let matrix = RatingMatrix::new(
            titles,
            vec![1, 2],
            vec![vec![5.0, 0.0], vec![0.0, 5.0]],
        )?;
        matrix.save(dir.path())?;

        let config = StoreConfig {
            artifacts_dir: Some(dir.path().to_path_buf()),
            ..StoreConfig::default()
        };
        let store = Storefront::load(config)?;
        assert_eq!(store.catalog().len(), 2);
        assert_eq!(store.recommend("Dune", 1), vec!["Foundation".to_string()]);
        Ok(())
    }
}
