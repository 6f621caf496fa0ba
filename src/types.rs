use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Returns the value when it is present and not blank.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// A single person as recorded in a family entry of the corpus.
///
/// Optional fields distinguish "absent in source" (`None`) from "present but
/// empty" (`Some("")`). The `has_*` helpers treat blank values as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub patronymic: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    /// Two-digit year (`"78"`) or a full date.
    pub marriage_date: Option<String>,
    pub full_marriage_date: Option<String>,
    pub spouse: Option<String>,
    /// Family in which this person appears as a child.
    pub as_child: Option<String>,
    /// Family this person founded upon marriage.
    pub as_parent: Option<String>,
    /// External record id, e.g. a FamilySearch person id.
    pub record_id: Option<String>,
    pub note_markers: Vec<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub spouse_birth_date: Option<String>,
    pub spouse_parents_family_id: Option<String>,
}

impl Person {
    /// Creates a person with only a name set.
    pub fn named(name: &str) -> Self {
        Person {
            name: name.to_string(),
            ..Person::default()
        }
    }

    /// The given name as recorded; used as the key for child-keyed lookups.
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    /// Given name followed by the patronymic, when one is recorded.
    pub fn full_name(&self) -> String {
        match present(&self.patronymic) {
            Some(patronymic) => format!("{} {}", self.display_name(), patronymic),
            None => self.display_name().to_string(),
        }
    }

    /// True when `name` equals the given name or the full name, ignoring case.
    pub fn has_exact_name(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.display_name().to_lowercase() == wanted || self.full_name().to_lowercase() == wanted
    }

    pub fn as_child_ref(&self) -> Option<&str> {
        present(&self.as_child)
    }

    pub fn as_parent_ref(&self) -> Option<&str> {
        present(&self.as_parent)
    }

    pub fn spouse_name(&self) -> Option<&str> {
        present(&self.spouse)
    }

    pub fn birth(&self) -> Option<&str> {
        present(&self.birth_date)
    }

    pub fn death(&self) -> Option<&str> {
        present(&self.death_date)
    }

    pub fn marriage(&self) -> Option<&str> {
        present(&self.marriage_date)
    }

    pub fn full_marriage(&self) -> Option<&str> {
        present(&self.full_marriage_date)
    }

    pub fn spouse_birth(&self) -> Option<&str> {
        present(&self.spouse_birth_date)
    }

    /// True when a spouse is named for this person.
    pub fn is_married(&self) -> bool {
        self.spouse_name().is_some()
    }

    pub fn has_as_child(&self) -> bool {
        self.as_child_ref().is_some()
    }

    pub fn has_as_parent(&self) -> bool {
        self.as_parent_ref().is_some()
    }

    /// Birth year extracted from the birth date, if one can be read.
    pub fn birth_year(&self) -> Option<i32> {
        self.birth().and_then(extract_year)
    }
}

/// One marriage within a family: both spouses and their children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Couple {
    pub husband: Person,
    pub wife: Person,
    pub marriage_date: Option<String>,
    pub full_marriage_date: Option<String>,
    pub children: Vec<Person>,
    pub children_died_infancy: Option<u32>,
    pub notes: Vec<String>,
}

impl Couple {
    pub fn new(husband: Person, wife: Person) -> Self {
        Couple {
            husband,
            wife,
            ..Couple::default()
        }
    }

    /// Both spouses are named.
    pub fn is_complete(&self) -> bool {
        !self.husband.display_name().is_empty() && !self.wife.display_name().is_empty()
    }

    pub fn marriage(&self) -> Option<&str> {
        present(&self.marriage_date)
    }

    pub fn full_marriage(&self) -> Option<&str> {
        present(&self.full_marriage_date)
    }

    /// Birth year of the older spouse.
    pub fn older_birth_year(&self) -> Option<i32> {
        match (self.husband.birth_year(), self.wife.birth_year()) {
            (Some(h), Some(w)) => Some(h.min(w)),
            (h, w) => h.or(w),
        }
    }

    pub fn parents(&self) -> [&Person; 2] {
        [&self.husband, &self.wife]
    }
}

/// A family record as printed under one identifier in the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Family {
    pub family_id: String,
    pub page_references: Vec<String>,
    /// More than one couple expresses remarriage.
    pub couples: Vec<Couple>,
    pub notes: Vec<String>,
    pub note_definitions: BTreeMap<String, String>,
}

impl Family {
    pub fn new(family_id: &str, couples: Vec<Couple>) -> Self {
        Family {
            family_id: family_id.to_string(),
            couples,
            ..Family::default()
        }
    }

    /// Non-empty identifier and at least one structurally complete couple.
    pub fn is_valid(&self) -> bool {
        !self.family_id.trim().is_empty() && self.couples.iter().any(Couple::is_complete)
    }

    pub fn primary_couple(&self) -> Option<&Couple> {
        self.couples.first()
    }

    pub fn father(&self) -> Option<&Person> {
        self.primary_couple().map(|c| &c.husband)
    }

    pub fn mother(&self) -> Option<&Person> {
        self.primary_couple().map(|c| &c.wife)
    }

    /// Parents of the primary couple.
    pub fn parents(&self) -> Vec<&Person> {
        self.primary_couple()
            .map(|c| c.parents().to_vec())
            .unwrap_or_default()
    }

    /// Every spouse of every couple, in order, skipping repeated people.
    pub fn all_parents(&self) -> Vec<&Person> {
        let mut out: Vec<&Person> = Vec::new();
        for couple in &self.couples {
            for parent in couple.parents() {
                if !out.iter().any(|p| *p == parent) {
                    out.push(parent);
                }
            }
        }
        out
    }

    /// Children of the primary couple.
    pub fn children(&self) -> &[Person] {
        self.primary_couple()
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Children of every couple in order.
    pub fn all_children(&self) -> Vec<&Person> {
        self.couples.iter().flat_map(|c| c.children.iter()).collect()
    }

    pub fn married_children(&self) -> Vec<&Person> {
        self.all_children()
            .into_iter()
            .filter(|c| c.is_married())
            .collect()
    }

    /// Parents followed by children.
    pub fn all_persons(&self) -> Vec<&Person> {
        let mut out = self.all_parents();
        out.extend(self.all_children());
        out
    }

    /// Finds a person whose given name matches exactly (case-insensitive).
    pub fn find_person_by_name(&self, name: &str) -> Option<&Person> {
        self.all_persons()
            .into_iter()
            .find(|p| p.has_exact_name(name))
    }

    /// Parents then children, each with the role they hold in this family.
    pub fn members(&self) -> Vec<(FamilyRole, &Person)> {
        let mut out: Vec<(FamilyRole, &Person)> = self
            .all_parents()
            .into_iter()
            .map(|p| (FamilyRole::Parent, p))
            .collect();
        out.extend(
            self.all_children()
                .into_iter()
                .map(|c| (FamilyRole::Child, c)),
        );
        out
    }
}

// ---------------------------------------------------------------------------
// Person selection
// ---------------------------------------------------------------------------

/// The position a person holds in a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyRole {
    Parent,
    Child,
}

impl FamilyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyRole::Parent => "parent",
            FamilyRole::Child => "child",
        }
    }
}

impl FromStr for FamilyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parent" => Ok(FamilyRole::Parent),
            "child" => Ok(FamilyRole::Child),
            other => Err(format!("unknown role '{}' (expected parent or child)", other)),
        }
    }
}

/// A family member to look up: a name, optionally narrowed by birth date and
/// by role when several members share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    pub name: String,
    /// Full date (`15.03.1758`) or a bare year (`1758`).
    pub birth: Option<String>,
    pub role: Option<FamilyRole>,
}

impl PersonQuery {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Self::default()
        }
    }

    /// Parses `Name` or `Name, b DATE`.
    pub fn parse(text: &str) -> Self {
        match text.split_once(',') {
            Some((name, rest)) => {
                let rest = rest.trim();
                let birth = rest
                    .strip_prefix("b ")
                    .map(str::trim)
                    .filter(|b| !b.is_empty());
                match birth {
                    Some(birth) => Self::named(name).born(birth),
                    None => Self::named(text),
                }
            }
            None => Self::named(text),
        }
    }

    pub fn born(mut self, birth: &str) -> Self {
        self.birth = Some(birth.trim().to_string());
        self
    }

    pub fn with_role(mut self, role: FamilyRole) -> Self {
        self.role = Some(role);
        self
    }

    /// True when the query's birth date and role, if given, fit the member.
    /// A bare year matches any date within that year.
    pub fn admits(&self, role: FamilyRole, person: &Person) -> bool {
        if self.role.is_some_and(|r| r != role) {
            return false;
        }
        let Some(wanted) = self.birth.as_deref() else {
            return true;
        };
        match person.birth() {
            Some(birth) if birth == wanted => true,
            Some(_) if wanted.len() == 4 => extract_year(wanted) == person.birth_year(),
            _ => false,
        }
    }
}

/// Gender inferred from a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

/// Extracts a four-digit year from a date such as `09.09.1727`, `1727` or
/// `abt 1727`. The last four-digit run wins.
pub fn extract_year(date: &str) -> Option<i32> {
    let mut year = None;
    let mut run = String::new();
    for ch in date.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() {
            run.push(ch);
        } else {
            if run.len() == 4 {
                year = run.parse().ok();
            }
            run.clear();
        }
    }
    year
}

/// Expands a two-digit marriage year using the birth year of the older
/// spouse: `century = (older_birth_year + 20) / 100`.
///
/// Values that are not exactly two digits are returned unchanged, as is the
/// short form when no birth year is known.
pub fn expand_marriage_year(short: &str, older_birth_year: Option<i32>) -> String {
    let short = short.trim();
    let is_two_digit = short.len() == 2 && short.chars().all(|c| c.is_ascii_digit());
    match (is_two_digit, older_birth_year) {
        (true, Some(birth_year)) => {
            let century = (birth_year + 20) / 100;
            let two_digit: i32 = short.parse().unwrap_or_default();
            (century * 100 + two_digit).to_string()
        }
        _ => short.to_string(),
    }
}
