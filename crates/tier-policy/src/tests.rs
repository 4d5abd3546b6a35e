use parcelbase_core_types::Tier;

use crate::defaults::default_table;
use crate::errors::PolicyError;
use crate::loader::load_table;

#[test]
fn default_table_gates_known_features() {
    let table = default_table();
    assert_eq!(table.required_tier("parcel_search"), Some(Tier::Free));
    assert_eq!(table.required_tier("collaboration"), Some(Tier::ProPlus));
    assert_eq!(table.required_tier("bulk_export"), Some(Tier::Portfolio));
    assert_eq!(table.required_tier("sso"), Some(Tier::Enterprise));
    assert!(table.is_known_feature("reports"));
}

#[test]
fn unknown_feature_is_not_known_and_has_no_tier() {
    let table = default_table();
    assert!(!table.is_known_feature("ccp-99:nonexistent"));
    assert_eq!(table.required_tier("ccp-99:nonexistent"), None);
}

#[test]
fn sufficiency_is_monotonic_over_every_tier_pair() {
    let table = default_table();
    for have in Tier::ALL {
        for need in Tier::ALL {
            assert_eq!(
                table.is_sufficient(have, need),
                have.ordinal() >= need.ordinal(),
                "have={have} need={need}"
            );
        }
    }
}

#[test]
fn load_table_without_path_returns_builtin() {
    let table = load_table(None).unwrap();
    assert_eq!(table.rev(), default_table().rev());
    assert_eq!(table.len(), default_table().len());
}

#[test]
fn load_table_overlays_file_entries() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("tiers.yaml");
    std::fs::write(
        &file_path,
        r#"rev: 7
features:
  collaboration: portfolio
  street_view_notes: pro
"#,
    )
    .unwrap();

    let table = load_table(Some(&file_path)).unwrap();
    assert_eq!(table.rev(), 7);
    // overridden
    assert_eq!(table.required_tier("collaboration"), Some(Tier::Portfolio));
    // added
    assert_eq!(table.required_tier("street_view_notes"), Some(Tier::Pro));
    // untouched builtin
    assert_eq!(table.required_tier("reports"), Some(Tier::Pro));
}

#[test]
fn load_table_rejects_stale_revision() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("tiers.yaml");
    std::fs::write(&file_path, "rev: 1\nfeatures: {}\n").unwrap();

    let result = load_table(Some(&file_path));
    assert!(matches!(result, Err(PolicyError::Invalid(_))));
}

#[test]
fn load_table_rejects_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("tiers.yaml");
    std::fs::write(&file_path, "features: [not, a, map]\n").unwrap();

    let result = load_table(Some(&file_path));
    assert!(matches!(result, Err(PolicyError::Invalid(_))));
}
