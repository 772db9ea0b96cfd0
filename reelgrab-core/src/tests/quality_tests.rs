use super::*;

fn candidate(label: &str, uri: &str) -> Candidate {
    Candidate {
        quality: Quality::from_label(label),
        resource_uri: uri.to_string(),
        size: None,
    }
}

#[test]
fn aliases_resolve_correctly() {
    let cases = [
        ("2160p", Quality::Uhd2160),
        ("4K", Quality::Uhd2160),
        ("1080P", Quality::Fhd1080),
        ("720p", Quality::Hd720),
        ("sd", Quality::Sd480),
        ("3D", Quality::ThreeD),
    ];
    for (input, expected) in cases {
        let parsed: Quality = input.parse().unwrap();
        assert_eq!(parsed, expected, "failed for {input:?}");
    }
}

#[test]
fn unknown_label_is_kept_lowercase() {
    assert_eq!(
        Quality::from_label("1080p.X265"),
        Quality::Other("1080p.x265".to_string())
    );
}

#[test]
fn empty_label_is_rejected() {
    let err = "  ".parse::<Quality>().unwrap_err();
    assert_eq!(err.to_string(), "invalid quality: '  '");
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert!(boxed.source().is_none());
}

#[test]
fn prefers_highest_tier() {
    let candidates = vec![
        candidate("720p", "a"),
        candidate("1080p", "b"),
        candidate("2160p", "c"),
    ];
    let best = QualityPreference::default().select(&candidates).unwrap();
    assert_eq!(best.resource_uri, "c");
}

#[test]
fn falls_back_to_next_tier() {
    let candidates = vec![candidate("720p", "a"), candidate("1080p", "b")];
    let best = QualityPreference::default().select(&candidates).unwrap();
    assert_eq!(best.quality, Quality::Fhd1080);
}

#[test]
fn no_preferred_tier_selects_nothing() {
    let candidates = vec![candidate("720p", "a"), candidate("3D", "b")];
    assert!(QualityPreference::default().select(&candidates).is_none());
}

#[test]
fn empty_candidates_select_nothing() {
    assert!(QualityPreference::default().select(&[]).is_none());
}

#[test]
fn custom_list_extends_fallback() {
    let pref =
        QualityPreference::from_names(&["1080p".to_string(), "720p".to_string()]).unwrap();
    let candidates = vec![candidate("480p", "a"), candidate("720p", "b")];
    assert_eq!(pref.select(&candidates).unwrap().resource_uri, "b");
    assert_eq!(pref.to_string(), "1080p, 720p");
}

#[test]
fn first_candidate_wins_within_tier() {
    let candidates = vec![candidate("1080p", "web"), candidate("1080p", "bluray")];
    let best = QualityPreference::default().select(&candidates).unwrap();
    assert_eq!(best.resource_uri, "web");
}
