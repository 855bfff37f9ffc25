//! Integer-associated enums.
//!
//! Every field becomes a [`Tag`] carrying a unique integer. Fields whose
//! value is a finite whole number request that integer explicitly; all other
//! fields take the running index. Collisions are settled by [`SlotAllocator`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use enumforge_foundation::{LtMap, Result, Value};
use tracing::trace;

use crate::flags::Flag;
use crate::keys::{KeyScope, check_key};

// =============================================================================
// Tag
// =============================================================================

/// A member of a simple enum: a name bound to an integer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    name: Arc<str>,
    int: i64,
}

impl Tag {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved integer.
    #[must_use]
    pub const fn int(&self) -> i64 {
        self.int
    }

    /// Views the tag as a flag when its integer is a single bit.
    #[must_use]
    pub fn as_flag(&self) -> Option<Flag> {
        let bit = u32::try_from(self.int).ok()?;
        bit.is_power_of_two().then(|| Flag::new(self.name.clone(), bit))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&Tag> for Value {
    fn from(tag: &Tag) -> Self {
        Value::Int(tag.int)
    }
}

// =============================================================================
// Slot allocation
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct Occupant {
    field: usize,
    explicit: bool,
}

/// Assigns unique integer slots to fields in declaration order.
///
/// `next` is the running index. An explicit request parks `next` in `free`
/// so a later relocation can reuse it. When a request collides, an explicit
/// newcomer evicts an implicit occupant; in every other case the newcomer
/// moves and counts as implicit from then on. A moving field goes to `next`
/// if vacant, else the lowest vacant parked index, else the lowest vacant
/// non-negative integer.
#[derive(Debug, Default)]
pub struct SlotAllocator {
    next: i64,
    free: BTreeSet<i64>,
    occupants: HashMap<i64, Occupant>,
}

impl SlotAllocator {
    /// Creates an allocator starting at slot 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places field number `field`, optionally requesting a specific slot.
    pub fn place(&mut self, field: usize, request: Option<i64>) {
        let newcomer = Occupant {
            field,
            explicit: request.is_some(),
        };
        let slot = match request {
            Some(slot) => {
                self.free.insert(self.next);
                slot
            }
            None => self.next,
        };

        match self.occupants.get(&slot).copied() {
            None => self.occupy(slot, newcomer),
            Some(occupant) if newcomer.explicit && !occupant.explicit => {
                self.occupy(slot, newcomer);
                let target = self.vacancy();
                trace!(from = slot, to = target, field = occupant.field, "evicted implicit slot");
                self.occupy(target, occupant);
            }
            Some(_) => {
                let target = self.vacancy();
                trace!(requested = slot, to = target, field, "relocated colliding slot");
                // A relocated field no longer holds the slot it asked for.
                self.occupy(
                    target,
                    Occupant {
                        field,
                        explicit: false,
                    },
                );
            }
        }

        self.next = self.next.saturating_add(1);
    }

    /// Returns the slot of every placed field, indexed by field number.
    #[must_use]
    pub fn finish(self, fields: usize) -> Vec<i64> {
        let mut slots = vec![0; fields];
        for (slot, occupant) in self.occupants {
            if let Some(entry) = slots.get_mut(occupant.field) {
                *entry = slot;
            }
        }
        slots
    }

    fn is_vacant(&self, slot: i64) -> bool {
        !self.occupants.contains_key(&slot)
    }

    fn vacancy(&self) -> i64 {
        if self.is_vacant(self.next) {
            return self.next;
        }
        if let Some(&slot) = self.free.iter().find(|&&slot| self.is_vacant(slot)) {
            return slot;
        }
        (0..=i64::MAX)
            .find(|&slot| self.is_vacant(slot))
            .unwrap_or(self.next)
    }

    fn occupy(&mut self, slot: i64, occupant: Occupant) {
        self.free.remove(&slot);
        self.occupants.insert(slot, occupant);
    }
}

// =============================================================================
// Table
// =============================================================================

/// Forward and reverse lookups of a built simple enum.
#[derive(Clone, Debug, Default)]
pub struct SimpleTable {
    tags: Vec<Tag>,
    by_name: HashMap<Arc<str>, usize>,
    by_int: HashMap<i64, usize>,
}

impl SimpleTable {
    /// Builds the table from an ordered field mapping.
    ///
    /// # Errors
    /// Returns a key error for an invalid or duplicate field name.
    pub fn build(fields: &LtMap<Value>) -> Result<Self> {
        let mut scope = KeyScope::new();
        let mut allocator = SlotAllocator::new();

        for (index, (name, value)) in fields.iter().enumerate() {
            check_key(name, index, &scope)?;
            scope.insert(name.clone());
            allocator.place(index, value.as_whole_number());
        }

        let slots = allocator.finish(fields.len());
        let tags: Vec<Tag> = fields
            .keys()
            .zip(slots)
            .map(|(name, int)| Tag {
                name: name.clone(),
                int,
            })
            .collect();
        let by_name = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (tag.name.clone(), i))
            .collect();
        let by_int = tags.iter().enumerate().map(|(i, tag)| (tag.int, i)).collect();

        Ok(Self {
            tags,
            by_name,
            by_int,
        })
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the enum has no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns the tags in declaration order.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Looks up a tag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.by_name.get(name).and_then(|&i| self.tags.get(i))
    }

    /// Looks up a tag by integer.
    #[must_use]
    pub fn by_int(&self, int: i64) -> Option<&Tag> {
        self.by_int.get(&int).and_then(|&i| self.tags.get(i))
    }

    /// Looks up the tag bound to a single bit.
    #[must_use]
    pub fn flag_at(&self, bit: u32) -> Option<Flag> {
        self.by_int(i64::from(bit)).and_then(Tag::as_flag)
    }
}
