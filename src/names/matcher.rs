use std::collections::BTreeSet;
use std::sync::RwLock;

use tracing::debug;

use crate::types::Gender;

use super::tables::TABLES;

/// Trailing tokens that mark a matronymic (daughter of).
const FEMALE_MARKERS: &[&str] = &["tytär", "dotter", "dr", "dr."];

/// Trailing tokens that mark a patronymic (son of).
const MALE_MARKERS: &[&str] = &["poika", "son", "pojka", "p.", "s."];

/// Decides whether two given names denote the same person across Finnish,
/// Swedish and Latin spellings.
///
/// The variant tables are immutable; custom pairs registered at runtime are
/// kept in a separate overlay consulted before the tables.
#[derive(Debug, Default)]
pub struct NameMatcher {
    /// Unordered pairs stored as `(min, max)` of the lowercase given names.
    custom: RwLock<BTreeSet<(String, String)>>,
}

fn lowercase_trimmed(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First whitespace token of a lowercase name.
fn given_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    let a = given_name(&lowercase_trimmed(a)).to_string();
    let b = given_name(&lowercase_trimmed(b)).to_string();
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl NameMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with custom pairs already registered.
    pub fn with_custom_equivalences<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let matcher = Self::new();
        for (a, b) in pairs {
            matcher.add_custom_equivalence(a.as_ref(), b.as_ref());
        }
        matcher
    }

    /// Returns `true` when both names denote the same given name.
    ///
    /// Comparison is case-insensitive. Identical strings (including two empty
    /// ones) match; otherwise the first tokens are compared directly, then
    /// against the custom overlay, then against the variant tables.
    pub fn are_names_equivalent(&self, a: &str, b: &str) -> bool {
        let a = lowercase_trimmed(a);
        let b = lowercase_trimmed(b);
        if a == b {
            return true;
        }

        let given_a = given_name(&a);
        let given_b = given_name(&b);
        if given_a.is_empty() || given_b.is_empty() {
            return false;
        }
        if given_a == given_b {
            return true;
        }

        if self.has_custom_pair(given_a, given_b) {
            return true;
        }

        let bases_a = TABLES.bases_of(given_a);
        let bases_b = TABLES.bases_of(given_b);
        bases_a.iter().any(|base| bases_b.contains(base))
    }

    /// Table bases the given name of `name` resolves to.
    pub fn base_names(&self, name: &str) -> Vec<String> {
        let lower = lowercase_trimmed(name);
        TABLES
            .bases_of(given_name(&lower))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Registers `a` and `b` as equivalent given names.
    pub fn add_custom_equivalence(&self, a: &str, b: &str) {
        let key = pair_key(a, b);
        if key.0.is_empty() || key.1.is_empty() || key.0 == key.1 {
            return;
        }
        debug!(a = %key.0, b = %key.1, "adding custom name equivalence");
        if let Ok(mut custom) = self.custom.write() {
            custom.insert(key);
        }
    }

    /// Removes a custom pair in either order. Returns whether it existed.
    pub fn remove_custom_equivalence(&self, a: &str, b: &str) -> bool {
        let key = pair_key(a, b);
        self.custom
            .write()
            .map(|mut custom| custom.remove(&key))
            .unwrap_or(false)
    }

    /// Registered custom pairs, sorted.
    pub fn custom_equivalences(&self) -> Vec<(String, String)> {
        self.custom
            .read()
            .map(|custom| custom.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_custom_equivalences(&self) {
        if let Ok(mut custom) = self.custom.write() {
            custom.clear();
        }
    }

    fn has_custom_pair(&self, a: &str, b: &str) -> bool {
        let key = pair_key(a, b);
        self.custom
            .read()
            .map(|custom| custom.contains(&key))
            .unwrap_or(false)
    }

    /// Infers gender from a full name.
    ///
    /// The last token is checked for a matronymic or patronymic ending first;
    /// otherwise the first token is looked up in the female and male tables.
    pub fn determine_gender(&self, full_name: &str) -> Gender {
        let lower = lowercase_trimmed(full_name);
        let tokens: Vec<&str> = lower.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Gender::Unknown;
        };

        if tokens.len() > 1 {
            if let Some(last) = tokens.last() {
                if FEMALE_MARKERS.iter().any(|m| last.ends_with(m)) {
                    return Gender::Female;
                }
                if MALE_MARKERS.iter().any(|m| last.ends_with(m)) {
                    return Gender::Male;
                }
            }
        }

        if TABLES.is_female(first) {
            Gender::Female
        } else if TABLES.is_male(first) {
            Gender::Male
        } else {
            Gender::Unknown
        }
    }
}
