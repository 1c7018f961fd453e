use super::*;

fn axis(dim: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[index] = 1.0;
    v
}

#[test]
fn finds_exact_match_with_full_similarity() {
    let entries = vec![(0, axis(4, 0)), (1, axis(4, 1)), (2, axis(4, 2))];
    let index = ChunkIndex::build(entries).expect("index should build");

    let results = index.search(&axis(4, 1), 1).expect("search should succeed");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk_id, 1);
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn results_are_ordered_by_similarity() {
    let entries = vec![
        (10, vec![1.0, 0.0]),
        (20, vec![0.8, 0.6]),
        (30, vec![0.0, 1.0]),
    ];
    let index = ChunkIndex::build(entries).expect("index should build");

    let results = index.search(&[1.0, 0.0], 3).expect("search should succeed");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk_id, 10);
    assert_eq!(results[1].chunk_id, 20);
    assert_eq!(results[2].chunk_id, 30);
    assert!(results[0].score > results[1].score);
    assert!(results[1].score > results[2].score);
}

#[test]
fn opposite_vectors_score_negative() {
    let entries = vec![(0, vec![1.0, 0.0]), (1, vec![-1.0, 0.0])];
    let index = ChunkIndex::build(entries).expect("index should build");

    let results = index.search(&[1.0, 0.0], 2).expect("search should succeed");
    let opposite = results
        .iter()
        .find(|r| r.chunk_id == 1)
        .expect("opposite vector should be returned");
    assert!((opposite.score + 1.0).abs() < 1e-5);
}

#[test]
fn magnitude_does_not_affect_similarity() {
    let entries = vec![(0, vec![0.1, 0.0]), (1, vec![0.0, 100.0])];
    let index = ChunkIndex::build(entries).expect("index should build");

    let results = index.search(&[5.0, 0.0], 1).expect("search should succeed");
    assert_eq!(results[0].chunk_id, 0);
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn k_caps_result_count() {
    let entries: Vec<(usize, Vec<f32>)> = (0..10).map(|i| (i, vec![i as f32 + 1.0, 1.0])).collect();
    let index = ChunkIndex::build(entries).expect("index should build");

    let results = index.search(&[1.0, 1.0], 5).expect("search should succeed");
    assert_eq!(results.len(), 5);
    assert_eq!(index.dimension(), 2);
}

#[test]
fn build_rejects_bad_input() {
    assert!(ChunkIndex::build(Vec::new()).is_err());
    assert!(ChunkIndex::build(vec![(0, vec![])]).is_err());
    assert!(ChunkIndex::build(vec![(0, vec![0.0, 0.0])]).is_err());
    assert!(ChunkIndex::build(vec![(0, vec![1.0, 0.0]), (1, vec![1.0])]).is_err());
}

#[test]
fn search_rejects_dimension_mismatch() {
    let index = ChunkIndex::build(vec![(0, vec![1.0, 0.0])]).expect("index should build");
    assert!(index.search(&[1.0, 0.0, 0.0], 1).is_err());
    assert!(index.search(&[0.0, 0.0], 1).is_err());
}
