//! # Pivoted rating matrix
//!
//! The feature space for neighbor queries: one row per book title, one column
//! per rater, `f32` ratings at the intersections. An offline pipeline pivots
//! the raw rating table into this shape and serializes it with `bincode`;
//! this module only loads and reads it.
//!
//! Row lookup by title follows the catalog policy for duplicate titles: the
//! first matching row wins.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;

/// File name of the serialized rating matrix inside the artifacts directory.
pub const RATINGS_FILE: &str = "ratings.bin";

/// A dense title × user rating matrix.
///
/// `rows[i]` holds the ratings for `titles[i]`, one `f32` per entry of
/// `user_ids` (zero where the user never rated the book). Every row must have
/// exactly `user_ids.len()` entries; [`RatingMatrix::load`] rejects ragged
/// artifacts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RatingMatrix {
    /// Row labels: one title per matrix row, in artifact order.
    pub titles: Vec<String>,
    /// Column labels: the rater ids the offline pivot kept.
    pub user_ids: Vec<u32>,
    /// Rating vectors, one per title.
    pub rows: Vec<Vec<f32>>,
}

impl RatingMatrix {
    /// Construct a matrix from its parts, validating shape.
    ///
    /// # Errors
    /// - `titles.len() != rows.len()`.
    /// - Any row whose length differs from `user_ids.len()`.
    pub fn new(
        titles: Vec<String>,
        user_ids: Vec<u32>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, Box<dyn Error>> {
        let matrix = Self {
            titles,
            user_ids,
            rows,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Load a matrix from `artifacts_dir/ratings.bin`.
    ///
    /// # Errors
    /// - The file is missing or unreadable.
    /// - The bytes fail to decode.
    /// - The decoded matrix is ragged or mislabeled (see [`RatingMatrix::new`]).
    pub fn load(artifacts_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let path = artifacts_dir.join(RATINGS_FILE);
        let bytes = fs::read(&path)?;
        let (matrix, _): (RatingMatrix, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        matrix.validate()?;

        info!(
            "Rating matrix loaded: {} titles x {} users",
            matrix.titles.len(),
            matrix.user_ids.len()
        );

        Ok(matrix)
    }

    /// Serialize this matrix to `artifacts_dir/ratings.bin`.
    ///
    /// # Errors
    /// Propagates encoding and I/O failures.
    pub fn save(&self, artifacts_dir: &Path) -> Result<(), Box<dyn Error>> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        fs::write(artifacts_dir.join(RATINGS_FILE), bytes)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.titles.len() != self.rows.len() {
            return Err(format!(
                "rating matrix has {} titles but {} rows",
                self.titles.len(),
                self.rows.len()
            )
            .into());
        }
        let width = self.user_ids.len();
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "rating matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    width
                )
                .into());
            }
        }
        Ok(())
    }

    /// Number of title rows.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True when the matrix holds no rows.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Vector dimensionality: the number of rating columns.
    pub fn dimension(&self) -> usize {
        self.user_ids.len()
    }

    /// The rating vector for `title`, first matching row wins.
    pub fn row(&self, title: &str) -> Option<&[f32]> {
        self.titles
            .iter()
            .position(|t| t == title)
            .map(|i| self.rows[i].as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RatingMatrix {
        RatingMatrix::new(
            vec!["Dune".into(), "Foundation".into()],
            vec![1, 2, 3],
            vec![vec![5.0, 0.0, 3.0], vec![4.0, 4.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_row_lookup() {
        let m = sample();
        assert_eq!(m.row("Dune"), Some(&[5.0, 0.0, 3.0][..]));
        assert_eq!(m.row("Neuromancer"), None);
        assert_eq!(m.dimension(), 3);
    }

    #[test]
    fn test_duplicate_title_first_row_wins() {
        let m = RatingMatrix::new(
            vec!["Dune".into(), "Dune".into()],
            vec![1],
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap();
        assert_eq!(m.row("Dune"), Some(&[1.0][..]));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let ragged = RatingMatrix::new(
            vec!["Dune".into()],
            vec![1, 2],
            vec![vec![1.0]], // one entry, two users
        );
        assert!(ragged.is_err());

        let mislabeled = RatingMatrix::new(vec!["Dune".into()], vec![1], vec![]);
        assert!(mislabeled.is_err());
    }

    #[test]
    fn test_save_load_round_trip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let m = sample();
        m.save(dir.path())?;

        let loaded = RatingMatrix::load(dir.path())?;
        assert_eq!(loaded, m);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RatingMatrix::load(dir.path()).is_err());
    }
}
