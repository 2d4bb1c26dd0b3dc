//! Integration tests for the item-based prediction pipeline
//!
//! Exercises the public surface end to end: CSV tables on disk, store
//! construction, batch prediction and correlation.

use media_gateway_ratings::{
    correlation, loader, CatalogRecord, EvaluationReport, PredictionEngine, RatingRecord,
    RatingStore, RatingsError,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_table(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn reference_store() -> RatingStore {
    RatingStore::from_records(
        vec![
            CatalogRecord::new(1, "A"),
            CatalogRecord::new(2, "B"),
            CatalogRecord::new(3, "C"),
        ],
        vec![
            RatingRecord::new(1, 1, 5.0),
            RatingRecord::new(1, 2, 1.0),
            RatingRecord::new(2, 1, 4.0),
            RatingRecord::new(2, 2, 2.0),
            RatingRecord::new(2, 3, 3.0),
        ],
    )
    .unwrap()
}

#[test]
fn test_reference_example() {
    let engine = PredictionEngine::new(reference_store());

    let predicted = engine.predict_rating(1, 3).unwrap();
    assert!((predicted - 3.0).abs() < 1e-9);

    assert_eq!(engine.predict_rating(999, 1), Err(RatingsError::UnknownUser(999)));
    assert_eq!(engine.predict_rating(1, 999), Err(RatingsError::UnknownItem(999)));
}

#[test]
fn test_similarity_symmetry_across_all_pairs() {
    let engine = PredictionEngine::new(reference_store());

    for a in 1..=3 {
        for b in 1..=3 {
            if a != b {
                assert_eq!(engine.similarity(a, b), engine.similarity(b, a));
            }
        }
    }
    // Three unordered pairs, each computed once
    assert_eq!(engine.cache_stats().entries, 3);
    assert_eq!(engine.cache_stats().misses, 3);
}

#[test]
fn test_memoized_lookup_leaves_other_pairs_untouched() {
    let engine = PredictionEngine::new(reference_store());

    let first = engine.similarity(1, 2).unwrap();
    let second = engine.similarity(1, 2).unwrap();
    assert_eq!(first, second);

    assert_eq!(engine.cached_neighbors(1).unwrap(), vec![(2, first)]);
    assert!(engine.cached_neighbors(3).unwrap().is_empty());
}

#[test]
fn test_pipeline_from_csv_files() {
    let movies = write_table(
        "movieId,title,genres\n\
         1,A,Drama\n\
         2,B,Comedy\n\
         3,C,Horror\n",
    );
    let training = write_table(
        "userId,movieId,rating,timestamp\n\
         1,1,5.0,0\n\
         1,2,1.0,0\n\
         2,1,4.0,0\n\
         2,2,2.0,0\n\
         2,3,3.0,0\n\
         3,1,2.0,0\n\
         3,3,4.5,0\n",
    );
    let test = write_table(
        "userId,movieId,rating,timestamp\n\
         1,3,3.0,0\n\
         3,2,1.5,0\n\
         2,1,4.0,0\n",
    );

    let store = loader::load_store(movies.path(), training.path()).unwrap();
    assert_eq!(store.num_items(), 3);
    assert_eq!(store.num_users(), 3);
    assert_eq!(store.num_ratings(), 7);

    let queries = loader::read_ratings_file(test.path()).unwrap();
    let engine = PredictionEngine::new(store);
    let predictions = engine.predict_batch(&queries).unwrap();

    let titles: Vec<&str> = predictions.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
    // Observed training rating passes through
    assert_eq!(predictions[2].predicted, 4.0);

    let predicted: Vec<f64> = predictions.iter().map(|p| p.predicted).collect();
    let actual: Vec<f64> = predictions.iter().map(|p| p.actual).collect();
    let r = correlation(&predicted, &actual).unwrap();
    assert!((-1.0..=1.0).contains(&r));

    let report = EvaluationReport::from_predictions(&predictions).unwrap();
    assert_eq!(report.count, 3);
    assert_eq!(report.correlation, r);
}

#[test]
fn test_unknown_item_in_training_table() {
    let movies = write_table("movieId,title\n1,A\n");
    let training = write_table("userId,movieId,rating\n1,2,3.0\n");

    let err = loader::load_store(movies.path(), training.path()).unwrap_err();
    assert!(matches!(
        err,
        loader::LoadError::Store(RatingsError::UnknownItem(2))
    ));
}

#[test]
fn test_correlation_length_mismatch() {
    assert_eq!(
        correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
        Err(RatingsError::LengthMismatch {
            predicted: 3,
            actual: 2
        })
    );
}
