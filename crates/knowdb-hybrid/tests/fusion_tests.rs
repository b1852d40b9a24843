use knowdb_core::types::{Chunk, ScoredChunk, SourceKind};
use knowdb_core::Error;
use knowdb_hybrid::{fuse, RrfFuser};

fn chunk(text: &str) -> Chunk { Chunk::from_text(text) }

fn scored(text: &str, score: f32) -> ScoredChunk { ScoredChunk { chunk: chunk(text), score } }

fn contents(chunks: &[Chunk]) -> Vec<&str> { chunks.iter().map(Chunk::content).collect() }

#[test]
fn equal_weights_mirror_ranks_tie_and_keep_first_seen_order() {
    // A: 0.5/(60+1) + 0.5/(60+2); B: 0.5/(60+2) + 0.5/(60+1); C: 0.5/(60+3).
    // A and B are exactly equal, so first-seen order (A from the semantic list) wins.
    let semantic = [chunk("A"), chunk("B"), chunk("C")];
    let lexical = [scored("B", 5.0), scored("A", 3.0)];

    let fuser = RrfFuser::new(0.5, 0.5, 60).unwrap();
    let fused = fuser.fuse_scored(&semantic, &lexical, 3);

    let expected_ab = 0.5 / 61.0 + 0.5 / 62.0;
    assert_eq!(fused[0].chunk.content(), "A");
    assert_eq!(fused[1].chunk.content(), "B");
    assert_eq!(fused[2].chunk.content(), "C");
    assert!((fused[0].score - expected_ab).abs() < 1e-15);
    assert_eq!(fused[0].score, fused[1].score);
    assert!((fused[2].score - 0.5 / 63.0).abs() < 1e-15);
    assert_eq!(fused[2].sources, vec![SourceKind::Vector]);
    assert_eq!(fused[0].sources, vec![SourceKind::Vector, SourceKind::Text]);
}

#[test]
fn heavier_lexical_weight_promotes_lexical_leader() {
    // B: 0.4/62 + 0.6/61 = 0.016288...; A: 0.4/61 + 0.6/62 = 0.016235...
    let semantic = [chunk("A"), chunk("B"), chunk("C")];
    let lexical = [scored("B", 5.0), scored("A", 3.0)];

    let fused = fuse(&semantic, &lexical, 3, 0.4, 0.6, 60).unwrap();
    assert_eq!(contents(&fused), vec!["B", "A", "C"]);
}

#[test]
fn default_weights_favor_semantic_leader() {
    let semantic = [chunk("A"), chunk("B"), chunk("C")];
    let lexical = [scored("B", 5.0), scored("A", 3.0)];

    let fused = RrfFuser::default().fuse(&semantic, &lexical, 3);
    assert_eq!(contents(&fused), vec!["A", "B", "C"]);
}

#[test]
fn lexical_only_documents_are_included_and_truncated_to_k() {
    let semantic = [chunk("A"), chunk("B")];
    let lexical = [scored("D", 9.0), scored("E", 8.0), scored("A", 1.0)];

    let fuser = RrfFuser::new(0.6, 0.4, 60).unwrap();
    let all = fuser.fuse(&semantic, &lexical, 10);
    // A = 0.6/61 + 0.4/63, B = 0.6/62, D = 0.4/61, E = 0.4/62
    assert_eq!(contents(&all), vec!["A", "B", "D", "E"]);

    let top = fuser.fuse(&semantic, &lexical, 2);
    assert_eq!(contents(&top), vec!["A", "B"]);
    assert!(fuser.fuse(&semantic, &lexical, 0).is_empty());
}

#[test]
fn identical_content_merges_across_lists() {
    let with_meta = Chunk::new("A", [("source".to_string(), serde_json::json!("lexical copy"))].into());
    let semantic = [chunk("A")];
    let lexical = [ScoredChunk { chunk: with_meta, score: 1.0 }];

    let fused = RrfFuser::new(1.0, 1.0, 0).unwrap().fuse_scored(&semantic, &lexical, 5);
    assert_eq!(fused.len(), 1);
    assert!((fused[0].score - 2.0).abs() < 1e-15, "rank 1 with constant 0 contributes 1 per list");
    assert!(fused[0].chunk.metadata().is_empty(), "first-seen chunk is the one returned");
}

#[test]
fn empty_inputs_fuse_to_empty() {
    let fuser = RrfFuser::default();
    assert!(fuser.fuse(&[], &[], 5).is_empty());
    let only_semantic = fuser.fuse(&[chunk("A"), chunk("B")], &[], 5);
    assert_eq!(contents(&only_semantic), vec!["A", "B"]);
}

#[test]
fn negative_rrf_constant_fails_fast() {
    let err = RrfFuser::new(0.5, 0.5, -1).expect_err("negative constant");
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(matches!(fuse(&[], &[], 3, 0.5, 0.5, -60), Err(Error::InvalidArgument(_))));
}

#[test]
fn non_finite_weights_are_rejected() {
    assert!(matches!(RrfFuser::new(f64::NAN, 0.5, 60), Err(Error::InvalidArgument(_))));
    assert!(matches!(RrfFuser::new(0.5, -0.1, 60), Err(Error::InvalidArgument(_))));
}
