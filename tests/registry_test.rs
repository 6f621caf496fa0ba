use familygraph::registry::{normalize, split_clan, FamilyIdRegistry};

#[test]
fn test_catalog_is_loaded() {
    let registry = FamilyIdRegistry::global();
    assert_eq!(registry.len(), 168);
    assert_eq!(registry.family_at(0), Some("AHO 1"));
    assert!(registry.is_valid("KORPI 6"));
    assert!(registry.is_valid("HERLEVI II 2"));
    assert!(registry.is_valid("PIENI SIIRONEN 1"));
    assert!(!registry.is_valid("KORPI 99"));
    assert!(!registry.is_valid(""));
}

#[test]
fn test_validation_is_case_and_space_insensitive() {
    let registry = FamilyIdRegistry::global();
    assert!(registry.is_valid("korpi 6"));
    assert!(registry.is_valid("  Korpi   6  "));
    assert!(registry.is_valid("Iso Peitso 3"));
    assert_eq!(normalize("  iso   peitso 3 "), "ISO PEITSO 3");
}

#[test]
fn test_every_catalog_id_is_valid() {
    let registry = FamilyIdRegistry::global();
    for id in registry.all_ids() {
        assert!(registry.is_valid(id), "{} should be valid", id);
        assert_eq!(normalize(id), *id);
    }
}

#[test]
fn test_navigation_follows_corpus_order() {
    let registry = FamilyIdRegistry::global();
    assert_eq!(registry.next_family_after("KORPI 6"), Some("KORPI 7"));
    assert_eq!(registry.next_family_after("KORPI 8"), Some("KORPI 8A"));
    assert_eq!(registry.next_family_after("KORPI 12"), Some("KORPI II 1"));
    assert_eq!(registry.previous_family_before("KORPI 7"), Some("KORPI 6"));
    assert_eq!(registry.previous_family_before("AHO 1"), None);
    assert_eq!(registry.next_family_after("NOSUCH 1"), None);

    let last = registry.all_ids().last().unwrap();
    assert_eq!(registry.next_family_after(last), None);
}

#[test]
fn test_split_clan() {
    assert_eq!(split_clan("KORPI 6"), ("KORPI".to_string(), "6".to_string()));
    assert_eq!(split_clan("korpi 8a"), ("KORPI".to_string(), "8A".to_string()));
    assert_eq!(
        split_clan("HERLEVI II 2"),
        ("HERLEVI".to_string(), "II 2".to_string())
    );
    assert_eq!(
        split_clan("PIENI SIIRONEN 3"),
        ("PIENI SIIRONEN".to_string(), "3".to_string())
    );
    assert_eq!(split_clan("KORPI"), ("KORPI".to_string(), String::new()));
}

#[test]
fn test_grouped_by_clan_partitions_catalog() {
    let registry = FamilyIdRegistry::global();
    let groups = registry.grouped_by_clan();

    let total: usize = groups.iter().map(|g| g.suffixes.len()).sum();
    assert_eq!(total, registry.len());

    let clans: Vec<&str> = groups.iter().map(|g| g.clan.as_str()).collect();
    let mut sorted = clans.clone();
    sorted.sort();
    assert_eq!(clans, sorted);

    // Siironen and Pieni Siironen stay apart.
    assert!(clans.contains(&"SIIRONEN"));
    assert!(clans.contains(&"PIENI SIIRONEN"));
}

#[test]
fn test_clan_suffixes_in_natural_order() {
    let registry = FamilyIdRegistry::global();
    let korpi = registry.clan("korpi").unwrap();

    assert_eq!(korpi.suffixes.len(), 16);
    assert_eq!(&korpi.suffixes[..3], &["1", "2", "3"]);
    let eight = korpi.suffixes.iter().position(|s| s == "8").unwrap();
    assert_eq!(korpi.suffixes[eight + 1], "8A");
    assert_eq!(korpi.suffixes[eight + 2], "9");
    assert_eq!(&korpi.suffixes[13..], &["II 1", "II 2", "II 3"]);
    assert_eq!(korpi.family_ids()[5], "KORPI 6");

    assert!(registry.clan("NOSUCH").is_none());
}

#[test]
fn test_registry_from_ids_drops_repeats() {
    let registry = FamilyIdRegistry::from_ids(["aho 1", "AHO 1", " ", "AHO 2"]);
    assert_eq!(registry.all_ids(), &["AHO 1".to_string(), "AHO 2".to_string()]);
    assert_eq!(registry.index_of("aho 2"), Some(1));
}

#[test]
fn test_registry_from_catalog_text() {
    let registry = FamilyIdRegistry::from_catalog("# comment\nOJA 1\n\nOJA 2\n");
    assert_eq!(registry.len(), 2);
    assert!(registry.is_valid("oja 2"));
    assert!(!registry.is_empty());
}
