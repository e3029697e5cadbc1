//! # Neighbor Index
//!
//! "Users also bought" queries for Bookwyrm.
//!
//! This module wraps a [HNSW](https://arxiv.org/abs/1603.09320) approximate
//! nearest-neighbor index (`hora` crate) built over the rows of the pivoted
//! rating matrix: each book is a point in rater-space, and books whose rating
//! vectors sit close together get recommended for one another.
//!
//! ## Responsibilities
//! - **Indexing**: Maintains a HNSW index over one vector per catalog title.
//! - **Querying**: Returns the k nearest other titles for a known title,
//!   excluding the title itself.
//! - **Persistence**: Dumps the index to a binary file and metadata to YAML,
//!   so deployments can skip the build step at startup.
//!
//! The distance metric (Euclidean) and any tie-break order are properties of
//! the built index; callers treat the index as opaque.
//!
//! Query failures never escape as errors: an unknown title yields an empty
//! recommendation list, full stop.
//!
//! ## Quick Example
//! ```no_run
//! use bookwyrm::neighbors::NeighborIndex;
//! use bookwyrm::pivot::RatingMatrix;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = RatingMatrix::load(std::path::Path::new("artifacts"))?;
//! let index = NeighborIndex::build(&matrix)?;
//! let also_bought = index.recommend("Dune", 3);
//! println!("{also_bought:?}");
//! # Ok(()) }
//! ```

use hora::core::ann_index::{ANNIndex, SerializableIndex};
use hora::core::metrics::Metric;
use hora::index::hnsw_idx::HNSWIndex;
use hora::index::hnsw_params::HNSWParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// File name of the dumped HNSW index inside the artifacts directory.
pub const INDEX_FILE: &str = "neighbor_index.bin";

/// File name of the index metadata (row labels, dimension) alongside the dump.
pub const INDEX_META_FILE: &str = "neighbor_index.yaml";

/// Sidecar metadata persisted next to the binary index dump.
///
/// The dump itself only knows about integer row ids; this records which title
/// each row belongs to and the vector dimensionality, so a loaded index can be
/// checked against the rating matrix it is supposed to describe.
#[derive(Debug, Serialize, Deserialize)]
struct IndexMetadata {
    dimension: usize,
    titles: Vec<String>,
}

/// Nearest-neighbor index over book rating vectors.
///
/// Internally holds a HNSW index keyed by row id, the row-id → title labels,
/// and a copy of each row's rating vector for use as the query point.
/// Read-only after [`build`](NeighborIndex::build) or
/// [`load`](NeighborIndex::load); safe to share across sessions.
pub struct NeighborIndex {
    /// ANN index for similarity search.
    index: HNSWIndex<f32, usize>,
    /// Row id → title, in matrix order.
    titles: Vec<String>,
    /// Title → row id; first occurrence wins for duplicate titles.
    title_to_row: HashMap<String, usize>,
    /// Query vectors, one per row.
    vectors: Vec<Vec<f32>>,
    /// Dimensionality of the vectors (number of rating columns).
    dimension: usize,
}

impl NeighborIndex {
    /// Build a fresh index from every row of `matrix`.
    ///
    /// Inserts each rating vector under its row id, then finalizes the index
    /// with the Euclidean metric. For catalogs in the low tens of thousands
    /// this takes well under a second; deployments that care can
    /// [`save`](NeighborIndex::save) the result and [`load`](NeighborIndex::load)
    /// it at the next startup instead.
    ///
    /// # Errors
    /// Returns an error if the HNSW index rejects an insert or fails to
    /// finalize (rare).
    pub fn build(matrix: &crate::pivot::RatingMatrix) -> Result<Self, Box<dyn Error>> {
        let dimension = matrix.dimension();
        let mut index = HNSWIndex::new(dimension, &HNSWParams::default());

        for (row, vector) in matrix.rows.iter().enumerate() {
            index.add(vector, row).map_err(|_| "add failed")?;
        }
        index.build(Metric::Euclidean).map_err(|_| "build failed")?;

        info!(
            "Neighbor index built: {} titles, dimension {}",
            matrix.titles.len(),
            dimension
        );

        Ok(Self {
            index,
            titles: matrix.titles.clone(),
            title_to_row: Self::label_rows(&matrix.titles),
            vectors: matrix.rows.clone(),
            dimension,
        })
    }

    /// Dump the index to `artifacts_dir/neighbor_index.bin` and its metadata
    /// to `artifacts_dir/neighbor_index.yaml`.
    ///
    /// # Errors
    /// - I/O failures while writing either file.
    /// - The index fails to serialize itself (rare).
    pub fn save(&mut self, artifacts_dir: &Path) -> Result<(), Box<dyn Error>> {
        let index_path = artifacts_dir.join(INDEX_FILE);
        self.index
            .dump(index_path.to_str().ok_or("non-UTF8 artifacts path")?)?;

        let meta = IndexMetadata {
            dimension: self.dimension,
            titles: self.titles.clone(),
        };
        let yaml = serde_yaml::to_string(&meta)?;
        fs::write(artifacts_dir.join(INDEX_META_FILE), yaml)?;
        Ok(())
    }

    /// Reconstruct an index from a previous [`save`](NeighborIndex::save).
    ///
    /// The binary dump carries the HNSW graph; row labels come from the YAML
    /// sidecar and query vectors from `matrix`. The metadata must agree with
    /// the matrix — a dump built against different data is refused rather
    /// than silently serving wrong neighbors.
    ///
    /// # Errors
    /// - Either file is missing or fails to parse/load.
    /// - The metadata's titles or dimension disagree with `matrix`.
    pub fn load(
        artifacts_dir: &Path,
        matrix: &crate::pivot::RatingMatrix,
    ) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(artifacts_dir.join(INDEX_META_FILE))?;
        let meta: IndexMetadata = serde_yaml::from_str(&yaml)?;

        if meta.titles != matrix.titles || meta.dimension != matrix.dimension() {
            return Err("neighbor index artifact does not match the rating matrix".into());
        }

        let index_path = artifacts_dir.join(INDEX_FILE);
        let index = HNSWIndex::load(index_path.to_str().ok_or("non-UTF8 artifacts path")?)?;

        info!(
            "Neighbor index loaded from dump: {} titles, dimension {}",
            meta.titles.len(),
            meta.dimension
        );

        Ok(Self {
            index,
            title_to_row: Self::label_rows(&meta.titles),
            titles: meta.titles,
            vectors: matrix.rows.clone(),
            dimension: meta.dimension,
        })
    }

    /// Whether a dump exists under `artifacts_dir`.
    pub fn dump_exists(artifacts_dir: &Path) -> bool {
        artifacts_dir.join(INDEX_FILE).is_file() && artifacts_dir.join(INDEX_META_FILE).is_file()
    }

    fn label_rows(titles: &[String]) -> HashMap<String, usize> {
        let mut map = HashMap::new();
        for (row, title) in titles.iter().enumerate() {
            // First occurrence wins, matching catalog lookup policy.
            map.entry(title.clone()).or_insert(row);
        }
        map
    }

    /// Number of indexed titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True when the index holds no titles.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Whether `title` has a row in the index.
    pub fn contains(&self, title: &str) -> bool {
        self.title_to_row.contains_key(title)
    }

    /// The k nearest other titles for `title`, or `None` if the title has no
    /// row in the index.
    ///
    /// Queries `k + 1` neighbors and drops the query title itself from the
    /// result — the model reliably returns a point as its own nearest
    /// neighbor — then truncates to `k`. Neighbor order (nearest first) and
    /// tie-breaks are whatever the index produces.
    ///
    /// `None` distinguishes "title unknown" from "known title with an empty
    /// neighborhood"; callers that don't care use
    /// [`recommend`](NeighborIndex::recommend).
    pub fn neighbors(&self, title: &str, k: usize) -> Option<Vec<String>> {
        let row = *self.title_to_row.get(title)?;

        let mut result: Vec<String> = self
            .index
            .search(&self.vectors[row], k + 1)
            .into_iter()
            .map(|id| self.titles[id].clone())
            .filter(|neighbor| neighbor.as_str() != title)
            .collect();
        result.truncate(k);

        Some(result)
    }

    /// Soft-failure form of [`neighbors`](NeighborIndex::neighbors): an
    /// unknown title yields an empty list instead of `None`.
    ///
    /// This is the contract the storefront session path relies on — nothing
    /// a user does can turn a recommendation query into a fatal error.
    pub fn recommend(&self, title: &str, k: usize) -> Vec<String> {
        match self.neighbors(title, k) {
            Some(recs) => recs,
            None => {
                debug!("No index row for {title:?}; recommending nothing");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::RatingMatrix;

    /// Four books in a 3-d rater space: two "Dune" cluster points and two
    /// far-off singletons. Distances are unambiguous so HNSW is exact here.
    fn sample_matrix() -> RatingMatrix {
        RatingMatrix::new(
            vec![
                "Dune".into(),
                "Dune Messiah".into(),
                "Foundation".into(),
                "Neuromancer".into(),
            ],
            vec![1, 2, 3],
            vec![
                vec![5.0, 0.0, 0.0],
                vec![4.5, 0.5, 0.0],
                vec![0.0, 5.0, 0.0],
                vec![0.0, 0.0, 5.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_recommend_excludes_self_and_respects_k() {
        let index = NeighborIndex::build(&sample_matrix()).unwrap();

        let recs = index.recommend("Dune", 2);
        assert!(recs.len() <= 2);
        assert!(!recs.contains(&"Dune".to_string()));
        assert_eq!(recs.first().map(String::as_str), Some("Dune Messiah"));
    }

    #[test]
    fn test_unknown_title_recommends_nothing() {
        let index = NeighborIndex::build(&sample_matrix()).unwrap();

        assert!(index.neighbors("Snow Crash", 3).is_none());
        assert!(index.recommend("Snow Crash", 3).is_empty());
    }

    #[test]
    fn test_known_title_with_zero_k() {
        let index = NeighborIndex::build(&sample_matrix()).unwrap();
        assert_eq!(index.neighbors("Dune", 0), Some(vec![]));
    }

    #[test]
    fn test_contains() {
        let index = NeighborIndex::build(&sample_matrix()).unwrap();
        assert!(index.contains("Foundation"));
        assert!(!index.contains("Snow Crash"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let matrix = sample_matrix();
        let mut index = NeighborIndex::build(&matrix).unwrap();

        let dir = tempfile::tempdir().unwrap();
        index.save(dir.path()).unwrap();
        assert!(NeighborIndex::dump_exists(dir.path()));

        let loaded = NeighborIndex::load(dir.path(), &matrix).unwrap();
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.recommend("Dune", 2), index.recommend("Dune", 2));
    }

    #[test]
    fn test_load_refuses_mismatched_matrix() {
        let matrix = sample_matrix();
        let mut index = NeighborIndex::build(&matrix).unwrap();

        let dir = tempfile::tempdir().unwrap();
        index.save(dir.path()).unwrap();

        let other = RatingMatrix::new(
            vec!["Hyperion".into()],
            vec![1, 2, 3],
            vec![vec![1.0, 2.0, 3.0]],
        )
        .unwrap();
        assert!(NeighborIndex::load(dir.path(), &other).is_err());
    }
}
