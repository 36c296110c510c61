use std::collections::HashSet;
use std::io::Write;

use tempfile::{Builder, NamedTempFile};
use vibematch::{
    AssignmentTable, Catalog, FactorKind, VibeConfig, assign_catalog, build_matcher,
    demo_catalog, recommend, rescore_table,
};

#[test]
fn files_on_disk_to_explained_assignment() {
    let catalog = demo_catalog().unwrap();
    let mut catalog_file = Builder::new().suffix(".json").tempfile().unwrap();
    catalog_file
        .write_all(serde_json::to_string(&catalog).unwrap().as_bytes())
        .unwrap();

    let yaml = format!(
        r#"version: "1.0"
catalog: "{}"
matcher:
  range_policy: reject
  penalty_floor: -0.15
"#,
        catalog_file.path().display()
    );
    let mut config_file = NamedTempFile::new().unwrap();
    config_file.write_all(yaml.as_bytes()).unwrap();

    let config = VibeConfig::from_file(config_file.path()).unwrap();
    let path = config.catalog.clone().expect("catalog path set");
    let loaded = Catalog::from_file(path).unwrap();
    assert_eq!(loaded, catalog);

    let matcher = build_matcher(&config).unwrap();
    let assignment = assign_catalog(&loaded, &matcher).unwrap();

    assert_eq!(assignment.len(), loaded.books.len().min(loaded.songs.len()));
    let songs: HashSet<_> = assignment.song_ids().into_iter().collect();
    assert_eq!(songs.len(), assignment.len());

    for (_, result) in &assignment {
        assert!(result.factors.len() <= 3);
        assert!(result.penalty_score >= -0.15);
        let expected = result.tag_score * 0.55 + result.vector_score * 0.35 + result.penalty_score;
        assert!((result.score - expected).abs() < 1e-12);
        let magnitudes: Vec<f64> = result.factors.iter().map(|f| f.contribution.abs()).collect();
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn stored_table_round_trips_through_json() {
    let catalog = demo_catalog().unwrap();
    let matcher = build_matcher(&VibeConfig::default()).unwrap();
    let assignment = assign_catalog(&catalog, &matcher).unwrap();

    let json = assignment.to_table().to_json_pretty().unwrap();
    let table = AssignmentTable::from_json_str(&json).unwrap();
    assert_eq!(table.song_for("b-road"), Some("s-ashes"));

    let rescored = rescore_table(&catalog, &matcher, &table).unwrap();
    assert_eq!(rescored, assignment.into_inner());
}

#[test]
fn mismatched_recommendations_explain_their_penalties() {
    let catalog = demo_catalog().unwrap();
    let matcher = build_matcher(&VibeConfig::default()).unwrap();

    let ranked = recommend(&catalog, &matcher, "b-road", catalog.songs.len()).unwrap();
    assert_eq!(ranked.len(), catalog.songs.len());
    assert_eq!(ranked[0].song.id, "s-ashes");

    let charleston = ranked
        .iter()
        .find(|r| r.song.id == "s-charleston")
        .expect("every song is ranked");
    assert!(charleston.penalty_score < 0.0);
    assert!(charleston.factors.iter().any(|f| f.kind == FactorKind::Negative));
}
