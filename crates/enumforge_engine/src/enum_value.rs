//! Built enums and their members.
//!
//! An [`EnumValue`] is a cheaply clonable handle over an immutable table.
//! The only state that changes after construction is the match table, and
//! it only changes through registration.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use enumforge_foundation::{EnumConfig, Error, ErrorContext, ErrorKind, NativeFn, Result, Value};
use tracing::trace;

use crate::flags::{Flag, FlagsTable};
use crate::kind::Kind;
use crate::matcher::{MatchForm, MatchTable, invoke};
use crate::query::{Flagged, Query, scan_bits};
use crate::simple::{SimpleTable, Tag};
use crate::symbolic::{SymbolicTable, VariantShape, VariantSpec};
use crate::variant::{VariantConstructor, VariantInstance};

// =============================================================================
// Metadata
// =============================================================================

/// Title and kind of an enum or variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Metadata {
    title: Arc<str>,
    kind: Kind,
}

impl Metadata {
    /// Creates metadata.
    #[must_use]
    pub fn new(title: impl Into<Arc<str>>, kind: Kind) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }
}

// =============================================================================
// Members
// =============================================================================

/// One named member of an enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    /// A simple enum tag.
    Tag(Tag),
    /// A flags enum bit.
    Flag(Flag),
    /// A sentinel variant instance.
    Variant(VariantInstance),
    /// A payload variant constructor.
    Constructor(VariantConstructor),
}

impl Member {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tag(tag) => tag.name(),
            Self::Flag(flag) => flag.name(),
            Self::Variant(variant) => variant.name(),
            Self::Constructor(constructor) => constructor.name(),
        }
    }

    /// Returns the tag, if this is one.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&Tag> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Returns the flag, if this is one.
    #[must_use]
    pub const fn as_flag(&self) -> Option<&Flag> {
        match self {
            Self::Flag(flag) => Some(flag),
            _ => None,
        }
    }

    /// Returns the variant instance, if this is one.
    #[must_use]
    pub const fn as_variant(&self) -> Option<&VariantInstance> {
        match self {
            Self::Variant(variant) => Some(variant),
            _ => None,
        }
    }

    /// Returns the constructor, if this is one.
    #[must_use]
    pub const fn as_constructor(&self) -> Option<&VariantConstructor> {
        match self {
            Self::Constructor(constructor) => Some(constructor),
            _ => None,
        }
    }

    /// Returns the integer of a tag or flag.
    #[must_use]
    pub fn int(&self) -> Option<i64> {
        match self {
            Self::Tag(tag) => Some(tag.int()),
            Self::Flag(flag) => Some(i64::from(flag.bit())),
            Self::Variant(_) | Self::Constructor(_) => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Tag(tag) => format!("tag {tag}"),
            Self::Flag(flag) => format!("flag {flag}"),
            Self::Variant(variant) => format!("variant {variant}"),
            Self::Constructor(constructor) => format!("constructor {}", constructor.name()),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Variant(variant) => write!(f, "{variant}"),
            Self::Constructor(constructor) => write!(f, "{constructor}"),
        }
    }
}

/// Iterator over the members of an enum in declaration order.
#[derive(Clone, Debug)]
pub struct Members {
    value: EnumValue,
    next: usize,
}

impl Iterator for Members {
    type Item = Member;

    fn next(&mut self) -> Option<Member> {
        let member = self.value.member_at(self.next)?;
        self.next += 1;
        Some(member)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.value.size().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Members {}

// =============================================================================
// EnumValue
// =============================================================================

#[derive(Debug)]
pub(crate) enum Body {
    Simple(SimpleTable),
    Flags(FlagsTable),
    Symbolic(SymbolicTable),
}

#[derive(Debug)]
struct EnumInner {
    metadata: Metadata,
    body: Body,
    config: EnumConfig,
    matches: Mutex<MatchTable>,
}

/// A built enum.
#[derive(Clone)]
pub struct EnumValue(Arc<EnumInner>);

impl EnumValue {
    pub(crate) fn new(metadata: Metadata, body: Body, config: EnumConfig) -> Self {
        Self(Arc::new(EnumInner {
            metadata,
            body,
            config,
            matches: Mutex::new(MatchTable::default()),
        }))
    }

    /// Returns `{title, kind}`.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.0.metadata
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.0.metadata.title()
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.metadata.kind()
    }

    /// Returns the configuration the enum was built with.
    #[must_use]
    pub fn config(&self) -> &EnumConfig {
        &self.0.config
    }

    /// Returns the number of members. A flags fallback is not a member.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.0.body {
            Body::Simple(table) => table.len(),
            Body::Flags(table) => table.len(),
            Body::Symbolic(table) => table.len(),
        }
    }

    /// Returns true if the enum has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns true if both handles refer to the same enum.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a handle that does not keep the enum alive.
    ///
    /// Handlers that need their own enum capture this. A captured clone
    /// would keep the enum alive through its own match table.
    #[must_use]
    pub fn downgrade(&self) -> WeakEnum {
        WeakEnum(Arc::downgrade(&self.0))
    }

    /// Returns the member names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        match &self.0.body {
            Body::Simple(table) => table.tags().iter().map(|t| Arc::from(t.name())).collect(),
            Body::Flags(table) => table.flags().iter().map(Flag::name_arc).collect(),
            Body::Symbolic(table) => table.variants().iter().map(VariantSpec::name_arc).collect(),
        }
    }

    /// Iterates the members in declaration order. Each call starts afresh.
    #[must_use]
    pub fn iter(&self) -> Members {
        Members {
            value: self.clone(),
            next: 0,
        }
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Member> {
        match &self.0.body {
            Body::Simple(table) => table.get(name).cloned().map(Member::Tag),
            Body::Flags(table) => table.get(name).cloned().map(Member::Flag),
            Body::Symbolic(table) => table.get(name).map(|spec| self.member_of(spec)),
        }
    }

    fn member_at(&self, index: usize) -> Option<Member> {
        match &self.0.body {
            Body::Simple(table) => table.tags().get(index).cloned().map(Member::Tag),
            Body::Flags(table) => table.flags().get(index).cloned().map(Member::Flag),
            Body::Symbolic(table) => table.at(index).map(|spec| self.member_of(spec)),
        }
    }

    fn member_of(&self, spec: &VariantSpec) -> Member {
        match spec.shape() {
            VariantShape::Sentinel(marker) => {
                Member::Variant(VariantInstance::sentinel(self.clone(), spec.name_arc(), marker))
            }
            VariantShape::Payload(schema) => Member::Constructor(VariantConstructor::new(
                self.clone(),
                spec.name_arc(),
                schema.clone(),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Integer associations
    // -------------------------------------------------------------------------

    /// Returns the tag of a simple enum.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<Tag> {
        match &self.0.body {
            Body::Simple(table) => table.get(name).cloned(),
            _ => None,
        }
    }

    /// Returns the flag of a flags enum.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<Flag> {
        match &self.0.body {
            Body::Flags(table) => table.get(name).cloned(),
            _ => None,
        }
    }

    /// Returns the integer bound to a tag or flag.
    #[must_use]
    pub fn int_of(&self, name: &str) -> Option<i64> {
        match &self.0.body {
            Body::Simple(table) => table.get(name).map(Tag::int),
            Body::Flags(table) => table.get(name).map(|f| i64::from(f.bit())),
            Body::Symbolic(_) => None,
        }
    }

    /// Returns the bit bound to a flag.
    #[must_use]
    pub fn bit_of(&self, name: &str) -> Option<u32> {
        match &self.0.body {
            Body::Flags(table) => table.get(name).map(Flag::bit),
            _ => None,
        }
    }

    /// Returns the name bound to an integer or bit.
    #[must_use]
    pub fn name_of(&self, int: i64) -> Option<&str> {
        match &self.0.body {
            Body::Simple(table) => table.by_int(int).map(Tag::name),
            Body::Flags(table) => u32::try_from(int)
                .ok()
                .filter(|bit| bit.is_power_of_two())
                .and_then(|bit| table.flags().get(bit.trailing_zeros() as usize))
                .map(Flag::name),
            Body::Symbolic(_) => None,
        }
    }

    /// Returns the fallback of a flags enum.
    #[must_use]
    pub fn fallback(&self) -> Option<&NativeFn> {
        match &self.0.body {
            Body::Flags(table) => Some(table.fallback()),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Bitmask queries
    // -------------------------------------------------------------------------

    /// Returns the names of the members whose bits are set in `mask`.
    ///
    /// # Errors
    /// Returns `NotBitmaskable` on a symbolic enum, and whatever the
    /// fallback raises.
    pub fn values(&self, mask: i64) -> Result<Query<Arc<str>>> {
        Ok(self.query(mask)?.map(|flag| flag.name_arc()))
    }

    /// Returns the bits set in `mask` that belong to members.
    ///
    /// # Errors
    /// See [`EnumValue::values`].
    pub fn keys(&self, mask: i64) -> Result<Query<u32>> {
        Ok(self.query(mask)?.map(|flag| flag.bit()))
    }

    /// Returns the `(name, bit)` pairs of the members set in `mask`.
    ///
    /// # Errors
    /// See [`EnumValue::values`].
    pub fn entries(&self, mask: i64) -> Result<Query<Flag>> {
        self.query(mask)
    }

    fn query(&self, mask: i64) -> Result<Query<Flag>> {
        let hits = match &self.0.body {
            Body::Simple(table) => scan_bits(mask, |bit| table.flag_at(bit)),
            Body::Flags(table) => scan_bits(mask, |bit| table.flag_at(bit)),
            Body::Symbolic(_) => {
                return Err(Error::new(ErrorKind::NotBitmaskable {
                    title: self.title().to_string(),
                }));
            }
        };
        if !hits.is_empty() {
            return Ok(Query::Found(Flagged::from(hits)));
        }

        match self.fallback() {
            Some(fallback) => {
                trace!(title = self.title(), mask, "no known bits, calling fallback");
                let result = fallback.call(&[Value::Int(mask)]).map_err(|e| {
                    e.with_context(ErrorContext::new().with_title(self.title()).with_frame("fallback"))
                })?;
                Ok(Query::Fallback(result))
            }
            None => Ok(Query::Fallback(Value::Undefined)),
        }
    }

    // -------------------------------------------------------------------------
    // Variants
    // -------------------------------------------------------------------------

    pub(crate) fn symbolic_table(&self) -> Result<&SymbolicTable> {
        match &self.0.body {
            Body::Symbolic(table) => Ok(table),
            _ => Err(Error::new(ErrorKind::NotSymbolic {
                title: self.title().to_string(),
            })),
        }
    }

    /// Returns a sentinel variant instance.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<VariantInstance> {
        match self.get(name)? {
            Member::Variant(variant) => Some(variant),
            _ => None,
        }
    }

    /// Returns the constructor of a payload variant.
    #[must_use]
    pub fn constructor(&self, name: &str) -> Option<VariantConstructor> {
        match self.get(name)? {
            Member::Constructor(constructor) => Some(constructor),
            _ => None,
        }
    }

    /// Builds an instance of a payload variant.
    ///
    /// # Errors
    /// Returns `NotSymbolic`, `UnknownVariant`, or `NotConstructible` when
    /// `name` does not name a payload variant, and otherwise whatever
    /// [`VariantConstructor::construct`] returns.
    pub fn construct(&self, name: &str, input: &Value) -> Result<VariantInstance> {
        let table = self.symbolic_table()?;
        let spec = table.get(name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownVariant {
                title: self.title().to_string(),
                name: name.to_string(),
            })
        })?;
        match self.member_of(spec) {
            Member::Constructor(constructor) => constructor.construct(input),
            _ => Err(Error::new(ErrorKind::NotConstructible {
                name: name.to_string(),
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------

    fn lock_matches(&self) -> MutexGuard<'_, MatchTable> {
        self.0.matches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_handler(&self, name: Arc<str>, handler: NativeFn) {
        trace!(title = self.title(), variant = &*name, "registered single handler");
        self.lock_matches().insert(name, handler);
    }

    /// Replaces the match table with one resolved from `form`.
    ///
    /// The enum owns its handlers. A handler that captures a clone of this
    /// enum keeps it alive forever; capture [`EnumValue::downgrade`] instead.
    ///
    /// # Errors
    /// Returns `NotSymbolic` for simple and flags enums, `HandlerNotCallable`
    /// for a non-function entry, and `IncompleteMatch` listing every variant
    /// the form misses.
    pub fn register_form(&self, form: &MatchForm) -> Result<()> {
        let context = || ErrorContext::new().with_title(self.title());
        let variants = self.symbolic_table().map_err(|e| e.with_context(context()))?;
        let table = MatchTable::resolve(form, variants).map_err(|e| e.with_context(context()))?;
        *self.lock_matches() = table;
        Ok(())
    }

    /// Runs the registered handler for `variant` and returns its result.
    ///
    /// The handler receives the unwrapped payload. Handlers run outside the
    /// table lock and may register or dispatch themselves.
    ///
    /// # Errors
    /// Returns `NotSymbolic`, `ForeignVariant` for an instance of another
    /// enum, `IncompleteMatch` if the registered handlers do not cover every
    /// variant, and whatever the handler raises.
    pub fn dispatch(&self, variant: &VariantInstance) -> Result<Value> {
        let context = || ErrorContext::new().with_title(self.title());
        let variants = self.symbolic_table().map_err(|e| e.with_context(context()))?;
        if !variant.parent().ptr_eq(self) {
            return Err(Error::new(ErrorKind::ForeignVariant {
                variant: variant.name().to_string(),
                title: self.title().to_string(),
            }));
        }

        let handler = {
            let matches = self.lock_matches();
            let missing = matches.missing(variants);
            if !missing.is_empty() {
                return Err(Error::incomplete_match(missing).with_context(context()));
            }
            matches.get(variant.name()).cloned()
        };

        match handler {
            Some(handler) => invoke(&handler, variant),
            None => Err(Error::incomplete_match(vec![variant.name().to_string()]).with_context(context())),
        }
    }
}

/// Non-owning handle to an [`EnumValue`].
#[derive(Clone, Debug)]
pub struct WeakEnum(Weak<EnumInner>);

impl WeakEnum {
    /// Returns the enum if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<EnumValue> {
        self.0.upgrade().map(EnumValue)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EnumValue {}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumValue")
            .field("title", &self.title())
            .field("kind", &self.kind())
            .field("members", &self.names())
            .finish()
    }
}

/// Prints `Title { A = 0, B = 1 }`, `Title { A(1), B(2) }`, or
/// `Title { A, B }` depending on the kind.
impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.title())?;
        for (i, member) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match &member {
                Member::Tag(tag) => write!(f, " {} = {}", tag.name(), tag.int())?,
                other => write!(f, " {}", other.name())?,
            }
            if let Member::Flag(flag) = &member {
                write!(f, "({})", flag.bit())?;
            }
        }
        if self.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}

impl IntoIterator for &EnumValue {
    type Item = Member;
    type IntoIter = Members;

    fn into_iter(self) -> Members {
        self.iter()
    }
}
