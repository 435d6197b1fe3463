//! Resolution of transactions to the people they concern.
//!
//! A transaction names its person through a reference id when the dashboard
//! recorded one, and otherwise only through its free-text title. Reference
//! ids are trusted; titles are a labelled best effort and a title shared by
//! several people resolves to nobody.

use std::collections::HashMap;

use crate::models::{MatchKind, StaffMember};

/// Something a transaction can be attributed to.
pub trait Party {
    /// The record id the transaction's reference points at.
    fn party_id(&self) -> &str;
    /// The display name a transaction title is compared against.
    fn party_name(&self) -> &str;
}

impl Party for StaffMember {
    fn party_id(&self) -> &str {
        &self.id
    }

    fn party_name(&self) -> &str {
        &self.name
    }
}

/// How titles are compared against names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatching {
    /// Trimmed, case-insensitive equality.
    CaseInsensitive,
    /// Trimmed, exact equality.
    Exact,
}

impl TitleMatching {
    fn key(&self, name: &str) -> String {
        match self {
            TitleMatching::CaseInsensitive => name.trim().to_lowercase(),
            TitleMatching::Exact => name.trim().to_string(),
        }
    }
}

/// The outcome of resolving one transaction.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    /// Exactly one party matched.
    Matched {
        /// The matched party.
        party: &'a T,
        /// Whether the reference id or the title produced the match.
        kind: MatchKind,
    },
    /// The title matched several parties, so none is credited.
    Ambiguous {
        /// How many parties share the title.
        candidates: usize,
    },
    /// Nothing matched.
    Unmatched,
}

/// Lookup tables over a set of parties.
///
/// # Example
///
/// ```
/// use school_reports::aggregation::{PartyIndex, Resolution, TitleMatching};
/// use school_reports::models::{MatchKind, StaffMember};
///
/// let staff = vec![StaffMember {
///     id: "3".to_string(),
///     name: "Grace Okafor".to_string(),
///     role: Some("Teacher".to_string()),
///     subject: None,
/// }];
/// let index = PartyIndex::new(&staff, TitleMatching::Exact);
///
/// match index.resolve(None, Some("Grace Okafor")) {
///     Resolution::Matched { party, kind } => {
///         assert_eq!(party.id, "3");
///         assert_eq!(kind, MatchKind::Title);
///     }
///     _ => panic!("expected a title match"),
/// }
/// ```
#[derive(Debug)]
pub struct PartyIndex<'a, T> {
    by_id: HashMap<&'a str, &'a T>,
    by_name: HashMap<String, Vec<&'a T>>,
    matching: TitleMatching,
}

impl<'a, T: Party> PartyIndex<'a, T> {
    /// Indexes parties by id and by name. When two parties share an id the
    /// first one wins.
    pub fn new(parties: &'a [T], matching: TitleMatching) -> Self {
        let mut by_id = HashMap::with_capacity(parties.len());
        let mut by_name: HashMap<String, Vec<&'a T>> = HashMap::with_capacity(parties.len());

        for party in parties {
            by_id.entry(party.party_id()).or_insert(party);

            let key = matching.key(party.party_name());
            if !key.is_empty() {
                by_name.entry(key).or_default().push(party);
            }
        }

        Self {
            by_id,
            by_name,
            matching,
        }
    }

    /// Resolves a transaction from its reference id, falling back to its
    /// title when the reference is missing or points outside the index.
    pub fn resolve(&self, reference_id: Option<&str>, title: Option<&str>) -> Resolution<'a, T> {
        if let Some(party) = reference_id.and_then(|id| self.by_id.get(id.trim()).copied()) {
            return Resolution::Matched {
                party,
                kind: MatchKind::Reference,
            };
        }

        let Some(key) = title.map(|t| self.matching.key(t)).filter(|k| !k.is_empty()) else {
            return Resolution::Unmatched;
        };

        match self.by_name.get(&key).map(Vec::as_slice) {
            Some([party]) => Resolution::Matched {
                party: *party,
                kind: MatchKind::Title,
            },
            Some(candidates) if candidates.len() > 1 => Resolution::Ambiguous {
                candidates: candidates.len(),
            },
            _ => Resolution::Unmatched,
        }
    }
}
