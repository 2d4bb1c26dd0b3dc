//! CSV readers for the catalog, training and test tables
//!
//! Each table starts with a header row. Columns are matched by name
//! (`movieId`, `title`, `userId`, `rating`) and extra columns such as
//! `genres` or `timestamp` are ignored.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::RatingsError;
use crate::store::RatingStore;
use crate::types::{CatalogRecord, RatingRecord};

/// Errors raised while loading tabular input
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid ratings data: {0}")]
    Store(#[from] RatingsError),
}

fn read_records<T, R>(reader: R) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize()
        .map(|record| record.map_err(LoadError::from))
        .collect()
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, LoadError> {
    read_records(reader)
}

pub fn read_ratings<R: Read>(reader: R) -> Result<Vec<RatingRecord>, LoadError> {
    read_records(reader)
}

pub fn read_catalog_file(path: impl AsRef<Path>) -> Result<Vec<CatalogRecord>, LoadError> {
    read_catalog(File::open(path)?)
}

pub fn read_ratings_file(path: impl AsRef<Path>) -> Result<Vec<RatingRecord>, LoadError> {
    read_ratings(File::open(path)?)
}

/// Build a [`RatingStore`] from a catalog file and a training ratings file
pub fn load_store(
    catalog_path: impl AsRef<Path>,
    training_path: impl AsRef<Path>,
) -> Result<RatingStore, LoadError> {
    let catalog = read_catalog_file(catalog_path.as_ref())?;
    let ratings = read_ratings_file(training_path.as_ref())?;

    info!(
        catalog_rows = catalog.len(),
        rating_rows = ratings.len(),
        "Loaded ratings tables"
    );

    Ok(RatingStore::from_records(catalog, ratings)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_catalog_with_quoted_titles() {
        let data = "movieId,title,genres\n\
                    1,Toy Story (1995),Adventure|Animation\n\
                    11,\"American President, The (1995)\",Comedy|Drama|Romance\n";

        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(
            catalog,
            vec![
                CatalogRecord::new(1, "Toy Story (1995)"),
                CatalogRecord::new(11, "American President, The (1995)"),
            ]
        );
    }

    #[test]
    fn test_read_ratings_ignores_timestamp() {
        let data = "userId,movieId,rating,timestamp\n\
                    1,31,2.5,1260759144\n\
                    1,1029,3.0,1260759179\n";

        let ratings = read_ratings(data.as_bytes()).unwrap();
        assert_eq!(
            ratings,
            vec![RatingRecord::new(1, 31, 2.5), RatingRecord::new(1, 1029, 3.0)]
        );
    }

    #[test]
    fn test_malformed_row_fails() {
        let data = "userId,movieId,rating\n1,abc,2.5\n";
        assert!(matches!(read_ratings(data.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_empty_table() {
        let ratings = read_ratings("userId,movieId,rating\n".as_bytes()).unwrap();
        assert!(ratings.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_catalog_file("/nonexistent/movies.csv"),
            Err(LoadError::Io(_))
        ));
    }
}
