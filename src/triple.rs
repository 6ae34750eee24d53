use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Slot name marking a user request rather than an informed value.
pub const REQUEST_SLOT: &str = "Request";

/// Slot and value used by general (non-inform) intents.
pub const NONE_VALUE: &str = "none";

/// A (domain-slot, slot, value) triple, serialized as a three element array.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Triple(pub String, pub String, pub String);

impl Triple {
    pub fn new(
        domain_slot: impl Into<String>,
        slot: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Triple(domain_slot.into(), slot.into(), value.into())
    }

    pub fn domain_slot(&self) -> &str {
        &self.0
    }

    pub fn slot(&self) -> &str {
        &self.1
    }

    pub fn value(&self) -> &str {
        &self.2
    }

    pub fn is_request(&self) -> bool {
        self.slot() == REQUEST_SLOT
    }

    /// General intents carry "none" as both slot and value.
    pub fn is_general(&self) -> bool {
        self.slot() == NONE_VALUE && self.value() == NONE_VALUE
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Splits triples into `(request, inform)` sets.
pub fn split_request_inform<'a>(
    triples: impl IntoIterator<Item = &'a Triple>,
) -> (IndexSet<Triple>, IndexSet<Triple>) {
    let mut request = IndexSet::new();
    let mut inform = IndexSet::new();
    for triple in triples {
        if triple.is_request() {
            request.insert(triple.clone());
        } else {
            inform.insert(triple.clone());
        }
    }
    (request, inform)
}
