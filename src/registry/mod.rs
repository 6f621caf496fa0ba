/// Family identifier catalog.
///
/// Holds every addressable family identifier in corpus order and answers
/// membership, ordinal, navigation and clan-grouping queries. An identifier
/// missing from the catalog belongs to a pseudo family and is never resolved.
mod family_ids;

pub use family_ids::{normalize, split_clan, ClanGroup, FamilyIdRegistry};
