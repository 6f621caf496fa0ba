/// Name equivalence and gender detection.
///
/// A single matcher is used everywhere a person named in one family record is
/// looked up in another, where the spelling may differ between languages.
mod matcher;
mod tables;

pub use matcher::NameMatcher;
