/// Cross-reference resolution module.
///
/// Resolves the family references carried by members of a nuclear family
/// (parents' birth families, children's own families, spouses' birth
/// families) into a [`FamilyNetwork`](crate::network::FamilyNetwork).
mod resolver;

pub use resolver::FamilyResolver;
