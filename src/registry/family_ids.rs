use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// The catalog embedded at compile time, one identifier per line.
const CATALOG: &str = include_str!("../../data/family_ids.txt");

static GLOBAL: LazyLock<FamilyIdRegistry> =
    LazyLock::new(|| FamilyIdRegistry::from_ids(catalog_lines(CATALOG)));

/// Immutable, ordered catalog of family identifiers.
#[derive(Debug, Clone)]
pub struct FamilyIdRegistry {
    /// Normalized identifiers in corpus order.
    ids: Vec<String>,
    /// Normalized identifier to ordinal.
    positions: HashMap<String, usize>,
}

/// One clan and the suffixes of its identifiers, naturally sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanGroup {
    pub clan: String,
    pub suffixes: Vec<String>,
}

impl ClanGroup {
    /// Reconstructs the full identifiers of this group.
    pub fn family_ids(&self) -> Vec<String> {
        self.suffixes
            .iter()
            .map(|suffix| join_clan(&self.clan, suffix))
            .collect()
    }
}

/// Canonical uppercase, trimmed, single-spaced form of an identifier.
pub fn normalize(id: &str) -> String {
    id.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Splits a normalized identifier into clan name and suffix.
///
/// The clan is every leading token before the first token that starts with a
/// digit, or before a roman numeral that is followed by such a token. An
/// identifier without any numeric part is returned whole with an empty
/// suffix.
pub fn split_clan(id: &str) -> (String, String) {
    let normalized = normalize(id);
    let tokens: Vec<&str> = normalized.split(' ').collect();

    for i in 1..tokens.len() {
        let starts_numeric = starts_with_digit(tokens[i]);
        let roman_prefix = is_roman(tokens[i])
            && tokens.get(i + 1).is_some_and(|next| starts_with_digit(next));
        if starts_numeric || roman_prefix {
            return (tokens[..i].join(" "), tokens[i..].join(" "));
        }
    }

    (normalized, String::new())
}

fn join_clan(clan: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        clan.to_string()
    } else {
        format!("{} {}", clan, suffix)
    }
}

fn starts_with_digit(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_roman(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| matches!(c, 'I' | 'V' | 'X' | 'L' | 'C'))
}

fn roman_value(token: &str) -> u32 {
    let value_of = |c: char| match c {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        _ => 0,
    };
    let values: Vec<u32> = token.chars().map(value_of).collect();
    let mut total = 0;
    for (i, v) in values.iter().enumerate() {
        if values.get(i + 1).is_some_and(|next| next > v) {
            total -= *v as i64;
        } else {
            total += *v as i64;
        }
    }
    total.max(0) as u32
}

/// Leading number and trailing letters of a suffix token, e.g. `8A` → (8, "A").
fn numeric_parts(token: &str) -> (u32, String) {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest: String = token.chars().skip(digits.len()).collect();
    (digits.parse().unwrap_or(u32::MAX), rest)
}

/// Ordering key for suffixes: plain numbers first, then roman-prefixed ones.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SuffixKey {
    Plain(u32, String),
    Roman(u32, u32, String),
    Other(String),
}

fn suffix_key(suffix: &str) -> SuffixKey {
    let tokens: Vec<&str> = suffix.split(' ').collect();
    match tokens.as_slice() {
        [single] if starts_with_digit(single) => {
            let (number, rest) = numeric_parts(single);
            SuffixKey::Plain(number, rest)
        }
        [roman, number, ..] if is_roman(roman) && starts_with_digit(number) => {
            let (number, rest) = numeric_parts(number);
            SuffixKey::Roman(roman_value(roman), number, rest)
        }
        _ => SuffixKey::Other(suffix.to_string()),
    }
}

/// Natural ordering of two suffixes within one clan.
pub(crate) fn compare_suffixes(a: &str, b: &str) -> Ordering {
    suffix_key(a).cmp(&suffix_key(b))
}

fn catalog_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

impl FamilyIdRegistry {
    /// Builds a registry from identifiers in corpus order.
    ///
    /// Identifiers are normalized; blank entries and repeats are dropped,
    /// keeping the first occurrence.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = FamilyIdRegistry {
            ids: Vec::new(),
            positions: HashMap::new(),
        };
        for id in ids {
            let normalized = normalize(id.as_ref());
            if normalized.is_empty() || registry.positions.contains_key(&normalized) {
                continue;
            }
            registry
                .positions
                .insert(normalized.clone(), registry.ids.len());
            registry.ids.push(normalized);
        }
        registry
    }

    /// Builds a registry from catalog text: one identifier per line, `#`
    /// comments allowed.
    pub fn from_catalog(text: &str) -> Self {
        Self::from_ids(catalog_lines(text))
    }

    /// The process-wide registry backed by the embedded catalog.
    pub fn global() -> &'static FamilyIdRegistry {
        &GLOBAL
    }

    pub fn normalize(&self, id: &str) -> String {
        normalize(id)
    }

    pub fn is_valid(&self, id: &str) -> bool {
        self.positions.contains_key(&normalize(id))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(&normalize(id)).copied()
    }

    pub fn family_at(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn next_family_after(&self, id: &str) -> Option<&str> {
        let index = self.index_of(id)?;
        self.family_at(index + 1)
    }

    pub fn previous_family_before(&self, id: &str) -> Option<&str> {
        let index = self.index_of(id)?;
        index.checked_sub(1).and_then(|i| self.family_at(i))
    }

    pub fn all_ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Partitions the catalog by clan name.
    ///
    /// Groups are sorted alphabetically by clan; suffixes within a group are
    /// in natural order with plain numbers before roman-prefixed ones.
    pub fn grouped_by_clan(&self) -> Vec<ClanGroup> {
        let mut by_clan: HashMap<String, Vec<String>> = HashMap::new();
        for id in &self.ids {
            let (clan, suffix) = split_clan(id);
            by_clan.entry(clan).or_default().push(suffix);
        }

        let mut groups: Vec<ClanGroup> = by_clan
            .into_iter()
            .map(|(clan, mut suffixes)| {
                suffixes.sort_by(|a, b| compare_suffixes(a, b));
                ClanGroup { clan, suffixes }
            })
            .collect();
        groups.sort_by(|a, b| a.clan.cmp(&b.clan));
        groups
    }

    /// The group for one clan name, if any identifier belongs to it.
    pub fn clan(&self, clan: &str) -> Option<ClanGroup> {
        let wanted = normalize(clan);
        self.grouped_by_clan().into_iter().find(|g| g.clan == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_values() {
        assert_eq!(roman_value("I"), 1);
        assert_eq!(roman_value("II"), 2);
        assert_eq!(roman_value("IV"), 4);
        assert_eq!(roman_value("IX"), 9);
    }

    #[test]
    fn test_suffix_ordering() {
        let mut suffixes = vec!["II 1", "10", "2", "8A", "1", "8", "I 2", "11"];
        suffixes.sort_by(|a, b| compare_suffixes(a, b));
        assert_eq!(suffixes, vec!["1", "2", "8", "8A", "10", "11", "I 2", "II 1"]);
    }

    #[test]
    fn test_catalog_lines_skip_comments() {
        let lines: Vec<&str> = catalog_lines("# header\n\nKORPI 1\n  KORPI 2  \n").collect();
        assert_eq!(lines, vec!["KORPI 1", "KORPI 2"]);
    }
}
