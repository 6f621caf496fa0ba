mod common;

use familygraph::network::FamilyNetwork;
use familygraph::types::*;

use common::*;

#[test]
fn test_family_accessors() {
    let family = korpi_6();
    assert!(family.is_valid());
    assert_eq!(family.father().unwrap().full_name(), "Matti Juhonpoika");
    assert_eq!(family.mother().unwrap().name, "Maria");
    assert_eq!(family.parents().len(), 2);
    assert_eq!(family.children().len(), 2);

    let married: Vec<&str> = family
        .married_children()
        .iter()
        .map(|c| c.display_name())
        .collect();
    assert_eq!(married, vec!["Magdalena"]);
    assert_eq!(family.all_persons().len(), 4);
}

#[test]
fn test_remarriage_children_and_parents() {
    let mut family = korpi_6();
    let mut second = Couple::new(family.couples[0].husband.clone(), person("Liisa", None));
    second.children = vec![person("Kaisa", Some("1771"))];
    family.couples.push(second);

    // Children of the primary couple only vs. every couple.
    assert_eq!(family.children().len(), 2);
    assert_eq!(family.all_children().len(), 3);
    // The repeated husband is listed once.
    let parents: Vec<&str> = family.all_parents().iter().map(|p| p.display_name()).collect();
    assert_eq!(parents, vec!["Matti", "Maria", "Liisa"]);
}

#[test]
fn test_empty_family_is_invalid() {
    let family = Family::new("AHO 1", vec![]);
    assert!(!family.is_valid());
    assert!(family.primary_couple().is_none());
    assert!(family.children().is_empty());
    assert!(family.all_persons().is_empty());

    let unnamed = Family::new("AHO 1", vec![Couple::new(person("Matti", None), Person::default())]);
    assert!(!unnamed.is_valid());
}

#[test]
fn test_find_person_by_name() {
    let family = korpi_6();
    assert_eq!(family.find_person_by_name("magdalena").unwrap().name, "Magdalena");
    assert_eq!(
        family.find_person_by_name("Matti Juhonpoika").unwrap().name,
        "Matti"
    );
    assert!(family.find_person_by_name("Magda").is_none());
}

#[test]
fn test_members_carry_roles() {
    let family = korpi_6();
    let roles: Vec<(FamilyRole, &str)> = family
        .members()
        .into_iter()
        .map(|(role, p)| (role, p.name.as_str()))
        .collect();
    assert_eq!(
        roles,
        vec![
            (FamilyRole::Parent, "Matti"),
            (FamilyRole::Parent, "Maria"),
            (FamilyRole::Child, "Magdalena"),
            (FamilyRole::Child, "Juho"),
        ]
    );
}

#[test]
fn test_person_query_parse() {
    assert_eq!(PersonQuery::parse(" Maria "), PersonQuery::named("Maria"));
    assert_eq!(
        PersonQuery::parse("Maria, b 15.03.1758"),
        PersonQuery::named("Maria").born("15.03.1758")
    );
    // Anything but a birth clause stays part of the name.
    assert_eq!(PersonQuery::parse("Korvela, Antti").name, "Korvela, Antti");
    assert_eq!("Child".parse::<FamilyRole>(), Ok(FamilyRole::Child));
    assert!("cousin".parse::<FamilyRole>().is_err());
}

#[test]
fn test_person_query_admits() {
    let child = person("Maria", Some("15.03.1758"));
    let query = PersonQuery::named("Maria");
    assert!(query.admits(FamilyRole::Parent, &child));

    assert!(query.clone().born("15.03.1758").admits(FamilyRole::Child, &child));
    assert!(query.clone().born("1758").admits(FamilyRole::Child, &child));
    assert!(!query.clone().born("1730").admits(FamilyRole::Child, &child));
    assert!(!query
        .clone()
        .born("1758")
        .admits(FamilyRole::Child, &person("Maria", None)));
    assert!(!query
        .with_role(FamilyRole::Parent)
        .admits(FamilyRole::Child, &child));
}

#[test]
fn test_couple_older_birth_year() {
    let couple = &korpi_6().couples[0];
    assert_eq!(couple.older_birth_year(), Some(1727));
    assert_eq!(couple.marriage(), Some("50"));
    assert_eq!(
        Couple::new(person("A", None), person("B", Some("01.01.1740"))).older_birth_year(),
        Some(1740)
    );
}

#[test]
fn test_person_serde_defaults() {
    let person: Person = serde_json::from_str(r#"{ "name": "Juho" }"#).unwrap();
    assert_eq!(person, Person::named("Juho"));
    assert_eq!(person.birth_year(), None);
    assert!(!person.has_as_child());
}

#[test]
fn test_network_lookups() {
    let mut network = FamilyNetwork::new(korpi_6());
    assert!(!network.has_cross_references());

    network
        .as_parent_families
        .insert("Magdalena".to_string(), korvela_3());
    network
        .spouse_as_child_families
        .insert("Antti Korvela".to_string(), korvela_2());

    let magdalena = network.main_family.all_children()[0].clone();
    assert_eq!(
        network.as_parent_family(&magdalena).unwrap().family_id,
        "KORVELA 3"
    );
    assert_eq!(
        network
            .spouse_as_child_family(" Antti Korvela ")
            .unwrap()
            .family_id,
        "KORVELA 2"
    );
    assert!(network.as_child_family(&magdalena).is_none());
    assert_eq!(network.total_linked_families(), 2);
    assert_eq!(network.linked_family_ids(), vec!["KORVELA 2", "KORVELA 3"]);
}

#[test]
fn test_gender_labels() {
    assert_eq!(Gender::Male.as_str(), "male");
    assert_eq!(Gender::Female.as_str(), "female");
    assert_eq!(Gender::Unknown.as_str(), "unknown");
}
