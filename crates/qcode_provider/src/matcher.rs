/// A test against a model identifier. Vendor-specific naming, ranking and
/// persona rules are tables of these, so new vendors are new rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Suffix(&'static str),
    /// Matches when any of the needles occurs in the identifier.
    Contains(&'static [&'static str]),
}

impl IdMatch {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            IdMatch::Exact(expected) => id == *expected,
            IdMatch::Prefix(prefix) => id.starts_with(prefix),
            IdMatch::Suffix(suffix) => id.ends_with(suffix),
            IdMatch::Contains(needles) => needles.iter().any(|needle| id.contains(needle)),
        }
    }
}
