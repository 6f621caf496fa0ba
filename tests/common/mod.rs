//! Shared corpus fixture: the KORPI 6 family, its parents' and children's
//! families and the birth family of a child's spouse.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use familygraph::corpus::{CorpusTextLocator, FamilyParser, JsonFamilyParser};
use familygraph::errors::Result;
use familygraph::names::NameMatcher;
use familygraph::registry::FamilyIdRegistry;
use familygraph::resolution::FamilyResolver;
use familygraph::types::{Couple, Family, Person};

pub fn person(name: &str, birth: Option<&str>) -> Person {
    Person {
        name: name.to_string(),
        birth_date: birth.map(str::to_string),
        ..Person::default()
    }
}

/// Matti and Maria with children Magdalena (married into KORVELA 3) and Juho.
pub fn korpi_6() -> Family {
    let mut matti = person("Matti", Some("1727"));
    matti.patronymic = Some("Juhonpoika".to_string());
    matti.death_date = Some("1790".to_string());
    matti.as_child = Some("KORPI 5".to_string());

    let mut maria = person("Maria", Some("1730"));
    maria.as_child = Some("HAAPALA 2".to_string());

    let mut magdalena = person("Magdalena", Some("10.02.1754"));
    magdalena.spouse = Some("Antti Korvela".to_string());
    magdalena.marriage_date = Some("78".to_string());
    magdalena.as_parent = Some("Korvela 3".to_string());

    let juho = person("Juho", Some("1756"));

    let mut couple = Couple::new(matti, maria);
    couple.marriage_date = Some("50".to_string());
    couple.children = vec![magdalena, juho];
    couple.children_died_infancy = Some(2);

    let mut family = Family::new("KORPI 6", vec![couple]);
    family.page_references = vec!["105".to_string()];
    family
}

/// Matti's birth family.
pub fn korpi_5() -> Family {
    let mut couple = Couple::new(person("Juho", Some("1700")), person("Kaisa", Some("1702")));
    couple.marriage_date = Some("25".to_string());
    couple.children = vec![person("Matti", Some("1727")), person("Liisa", Some("1729"))];
    Family::new("KORPI 5", vec![couple])
}

/// A family with no links, used as the next family in corpus order.
pub fn korpi_7() -> Family {
    let mut couple = Couple::new(person("Heikki", Some("1760")), person("Anna", Some("1762")));
    couple.children = vec![person("Jaakko", Some("1785"))];
    Family::new("KORPI 7", vec![couple])
}

/// Antti's birth family.
pub fn korvela_2() -> Family {
    let mut antti = person("Antti", Some("1750"));
    antti.death_date = Some("1810".to_string());
    let mut couple = Couple::new(person("Erkki", Some("1720")), person("Kaisa", Some("1724")));
    couple.children = vec![antti];
    Family::new("KORVELA 2", vec![couple])
}

/// The family Magdalena founded with Antti Korvela.
pub fn korvela_3() -> Family {
    let mut antti = person("Antti", Some("1750"));
    antti.as_child = Some("KORVELA 2".to_string());

    let mut magdalena = person("Magdalena", Some("10.02.1754"));
    magdalena.death_date = Some("19.10.1846".to_string());
    magdalena.as_child = Some("KORPI 6".to_string());

    let mut couple = Couple::new(antti, magdalena);
    couple.marriage_date = Some("78".to_string());
    couple.full_marriage_date = Some("12.11.1778".to_string());
    Family::new("KORVELA 3", vec![couple])
}

/// Renders families as corpus blocks: a header line followed by JSON.
pub fn corpus_text(blocks: &[(&str, Family)]) -> String {
    let mut text = String::from("Preface text that belongs to no family.\n\n");
    for (header, family) in blocks {
        text.push_str(header);
        text.push('\n');
        text.push_str(&serde_json::to_string(family).unwrap());
        text.push_str("\n\n");
    }
    text
}

/// Corpus order: KORPI 5, KORPI 6, KORPI 7, KORVELA 2, KORVELA 3.
/// HAAPALA 2 is referenced but absent.
pub fn sample_corpus() -> String {
    corpus_text(&[
        ("KORPI 5, page 104", korpi_5()),
        ("KORPI 6, page 105", korpi_6()),
        ("KORPI 7, pages 105, 106", korpi_7()),
        ("KORVELA 2, page 120", korvela_2()),
        ("KORVELA 3, page 121", korvela_3()),
    ])
}

pub fn sample_locator() -> CorpusTextLocator {
    CorpusTextLocator::from_text(&sample_corpus(), FamilyIdRegistry::global())
}

/// JSON parser that counts its calls and can be slowed down.
#[derive(Default)]
pub struct CountingParser {
    inner: JsonFamilyParser,
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingParser {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FamilyParser for CountingParser {
    async fn parse_family(&self, family_id: &str, raw_text: &str) -> Result<Family> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.parse_family(family_id, raw_text).await
    }
}

pub fn resolver_with(parser: Arc<dyn FamilyParser>) -> Arc<FamilyResolver> {
    Arc::new(FamilyResolver::new(
        Arc::new(sample_locator()),
        parser,
        Arc::new(FamilyIdRegistry::global().clone()),
        Arc::new(NameMatcher::new()),
    ))
}

/// Resolver over arbitrary corpus text with the JSON parser.
pub fn resolver_for_corpus(text: &str) -> Arc<FamilyResolver> {
    Arc::new(FamilyResolver::new(
        Arc::new(CorpusTextLocator::from_text(text, FamilyIdRegistry::global())),
        Arc::new(JsonFamilyParser::new()),
        Arc::new(FamilyIdRegistry::global().clone()),
        Arc::new(NameMatcher::new()),
    ))
}

pub fn sample_resolver() -> Arc<FamilyResolver> {
    resolver_with(Arc::new(JsonFamilyParser::new()))
}
