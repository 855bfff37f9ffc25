//! Unique opaque markers.
//!
//! A [`Marker`] is the payload of a sentinel variant. Two markers are equal
//! only if they are the same marker; the description is for display only.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MARKER: AtomicU64 = AtomicU64::new(1);

/// Opaque token compared by identity.
///
/// Every call to [`Marker::new`] yields a marker distinct from all others,
/// even when the descriptions match. Clones share the identity.
#[derive(Clone)]
pub struct Marker {
    id: u64,
    description: Arc<str>,
}

impl Marker {
    /// Creates a fresh marker with the given description.
    #[must_use]
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_MARKER.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Returns the identity of this marker.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the description given at creation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({}#{})", self.description, self.id)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}
