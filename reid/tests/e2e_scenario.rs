use giztoy_reid::{Config, Matcher, SharedMatcher};
use serde_json::json;

#[test]
fn t_e2e_reid_three_frames() {
    let expected = json!({
        "labels": [0, 0, 1],
        "returned": [0, 0, 1],
        "next_id": 2,
        "preview": 2,
        "stored_after_preview": 3,
    });

    let shared = SharedMatcher::new(Matcher::empty(Config::default()).expect("matcher"));

    let a = [1.0, 0.0, 0.0, 0.0];
    let b = [0.99, 0.141, 0.0, 0.0];
    let c = [0.1, 0.0, 0.995, 0.0];
    let unseen = [0.0, 0.0, 0.0, 1.0];

    let returned: Vec<u64> = [&a[..], &b[..], &c[..]]
        .iter()
        .map(|emb| shared.identify(emb, true).expect("identify"))
        .collect();
    let preview = shared.identify(&unseen, false).expect("preview");

    let snap = shared.snapshot();
    let got = json!({
        "labels": snap.labels,
        "returned": returned,
        "next_id": snap.next_id,
        "preview": preview,
        "stored_after_preview": shared.len(),
    });

    assert_eq!(got, expected);
}
