use giztoy_reid::{
    Config, Matcher, Metric, ReidError, Seed, SharedMatcher, Snapshot, Thresholds,
};

/// Deterministic pseudo-random unit vector.
fn unit_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    let mut v: Vec<f32> = (0..dim)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 32) as f32) / (u32::MAX as f32) - 0.5
        })
        .collect();
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in &mut v {
        *x /= norm;
    }
    v
}

/// `base` nudged by a small amount of noise, still far above the
/// default normal threshold.
fn jitter(base: &[f32], seed: u64) -> Vec<f32> {
    let noise = unit_vec(base.len(), seed);
    base.iter().zip(&noise).map(|(b, n)| b + 0.05 * n).collect()
}

#[test]
fn stream_of_two_subjects() {
    let dim = 128;
    let alice = unit_vec(dim, 1);
    let bob = unit_vec(dim, 2);
    assert!(giztoy_reid::cosine_similarity(&alice, &bob) < 0.7);

    let mut m = Matcher::empty(Config {
        dim: Some(dim),
        ..Default::default()
    })
    .unwrap();

    let mut got = Vec::new();
    for frame in 0..20u64 {
        let base = if frame % 3 == 0 { &bob } else { &alice };
        got.push(m.identify(&jitter(base, 100 + frame), true).unwrap());
    }

    // frame 0 is bob, frame 1 is alice.
    for (frame, &label) in got.iter().enumerate() {
        let want = if frame % 3 == 0 { 0 } else { 1 };
        assert_eq!(label, want, "frame {frame}");
    }
    assert_eq!(m.len(), 20);
    assert_eq!(m.labels().len(), m.len());
    assert_eq!(m.next_id(), 2);
}

#[test]
fn length_invariant_holds_across_errors() {
    let mut m = Matcher::empty(Config::default()).unwrap();
    for i in 0..10u64 {
        let _ = m.identify(&unit_vec(16, i), true);
        let _ = m.identify(&unit_vec(8, i), true);
        assert_eq!(m.labels().len(), m.store().rows().len());
    }
    assert_eq!(m.len(), 10);
}

#[test]
fn dimension_mismatch_is_reported() {
    let mut m = Matcher::empty(Config::default()).unwrap();
    m.identify(&unit_vec(16, 1), true).unwrap();
    match m.identify(&unit_vec(15, 1), false) {
        Err(ReidError::DimensionMismatch { expected, got }) => {
            assert_eq!((expected, got), (16, 15));
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn threshold_boundary_with_custom_normal() {
    let cfg = Config {
        thresholds: Thresholds {
            normal: 0.6,
            extreme: 0.9,
        },
        ..Default::default()
    };
    let mut m = Matcher::empty(cfg).unwrap();
    m.identify(&[1.0, 0.0], true).unwrap();

    // cos = 0.6 exactly (3-4-5 triangle): new identity.
    let d = m.identify_detailed(&[3.0, 4.0], false).unwrap();
    assert_eq!(d.score, Some(0.6));
    assert!(d.is_new);
    assert_eq!(d.label, 1);

    // Just above: reuse.
    let d = m.identify_detailed(&[3.0, 3.9], false).unwrap();
    assert!(!d.is_new);
    assert_eq!(d.label, 0);
    assert!(!m.thresholds().is_extreme(Metric::Cosine, d.score.unwrap()));
}

#[test]
fn seeded_matcher_continues_numbering() {
    let a = unit_vec(32, 10);
    let b = unit_vec(32, 11);
    let mut m = Matcher::new(
        Config::default(),
        Seed::From {
            embeddings: vec![a.clone(), b.clone()],
            labels: vec![5, 9],
        },
    )
    .unwrap();

    assert_eq!(m.identify(&jitter(&b, 1), true).unwrap(), 9);
    assert_eq!(m.identify(&unit_vec(32, 12), true).unwrap(), 10);
    assert_eq!(m.next_id(), 11);
}

#[test]
fn snapshot_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let shared = SharedMatcher::new(Matcher::empty(Config::default()).unwrap());
    for i in 0..6u64 {
        shared.identify(&unit_vec(64, i % 3), true).unwrap();
    }
    shared.snapshot().save(&path).unwrap();

    let snap = Snapshot::load(&path).unwrap();
    assert_eq!(snap.labels, vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(snap.next_id, 3);

    let restored = SharedMatcher::new(Matcher::from_snapshot(Config::default(), snap).unwrap());
    for i in 0..5u64 {
        let q = unit_vec(64, 50 + i);
        assert_eq!(
            restored.identify(&q, false).unwrap(),
            shared.identify(&q, false).unwrap()
        );
    }
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Snapshot::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ReidError::Io(_)));
}
