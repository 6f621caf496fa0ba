use familygraph::names::NameMatcher;
use familygraph::types::Gender;

#[test]
fn test_identical_names_are_equivalent() {
    let matcher = NameMatcher::new();
    assert!(matcher.are_names_equivalent("Magdalena", "Magdalena"));
    assert!(matcher.are_names_equivalent("  MAGDALENA ", "magdalena"));
    assert!(matcher.are_names_equivalent("", ""));
}

#[test]
fn test_finnish_and_swedish_forms() {
    let matcher = NameMatcher::new();
    assert!(matcher.are_names_equivalent("Juho", "Johan"));
    assert!(matcher.are_names_equivalent("Heikki", "Henrik"));
    assert!(matcher.are_names_equivalent("Liisa", "Elisabet"));
    assert!(matcher.are_names_equivalent("Kaisa", "Carin"));
    // Two variants of the same base.
    assert!(matcher.are_names_equivalent("Juho", "Johannes"));
}

#[test]
fn test_unrelated_names_differ() {
    let matcher = NameMatcher::new();
    assert!(!matcher.are_names_equivalent("Matti", "Juho"));
    assert!(!matcher.are_names_equivalent("Maria", "Magdalena"));
    assert!(!matcher.are_names_equivalent("Maria", ""));
}

#[test]
fn test_only_given_name_is_compared() {
    let matcher = NameMatcher::new();
    assert!(matcher.are_names_equivalent("Antti Korvela", "Antti"));
    assert!(matcher.are_names_equivalent("Anders Korvela", "Antti"));
    assert!(!matcher.are_names_equivalent("Antti Korvela", "Korvela"));
}

#[test]
fn test_equivalence_is_symmetric() {
    let matcher = NameMatcher::new();
    let pairs = [
        ("Juho", "Johan"),
        ("Matti", "Mathias"),
        ("Brita", "Pirkko"),
        ("Matti", "Maria"),
    ];
    for (a, b) in pairs {
        assert_eq!(
            matcher.are_names_equivalent(a, b),
            matcher.are_names_equivalent(b, a),
            "{} / {}",
            a,
            b
        );
    }
}

#[test]
fn test_custom_equivalences() {
    let matcher = NameMatcher::with_custom_equivalences([("Aatu", "Adolf")]);
    assert!(matcher.are_names_equivalent("Adolf", "aatu"));

    matcher.add_custom_equivalence("Tahvo", "Staffan");
    assert!(matcher.are_names_equivalent("Staffan", "Tahvo"));
    assert_eq!(
        matcher.custom_equivalences(),
        vec![
            ("aatu".to_string(), "adolf".to_string()),
            ("staffan".to_string(), "tahvo".to_string()),
        ]
    );

    assert!(matcher.remove_custom_equivalence("adolf", "AATU"));
    assert!(!matcher.remove_custom_equivalence("adolf", "aatu"));
    assert!(!matcher.are_names_equivalent("Adolf", "Aatu"));

    matcher.clear_custom_equivalences();
    assert!(matcher.custom_equivalences().is_empty());
}

#[test]
fn test_base_names() {
    let matcher = NameMatcher::new();
    assert_eq!(matcher.base_names("Jaakko Korpi"), vec!["jakob"]);
    assert!(matcher.base_names("Zyxw").is_empty());
}

#[test]
fn test_gender_from_patronymic_and_table() {
    let matcher = NameMatcher::new();
    assert_eq!(matcher.determine_gender("Maria Juhontytär"), Gender::Female);
    assert_eq!(matcher.determine_gender("Brita Matsdotter"), Gender::Female);
    assert_eq!(matcher.determine_gender("Matti Juhonpoika"), Gender::Male);
    assert_eq!(matcher.determine_gender("Erik Andersson"), Gender::Male);
    assert_eq!(matcher.determine_gender("Magdalena"), Gender::Female);
    assert_eq!(matcher.determine_gender("Heikki"), Gender::Male);
    assert_eq!(matcher.determine_gender("Zyxw"), Gender::Unknown);
    assert_eq!(matcher.determine_gender(""), Gender::Unknown);
}
