//! Error types for enum construction, matching, and payload coercion.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::config::EnumConfig;

/// Result type used throughout enumforge.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for enumforge operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    ///
    /// Context already attached is kept; new frames are appended to it.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(match self.context.take() {
            Some(existing) => existing.merge(context),
            None => context,
        });
        self
    }

    /// Returns the host exception class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// Returns the phase in which this error is raised.
    #[must_use]
    pub fn phase(&self) -> ErrorPhase {
        self.kind.phase()
    }

    /// Creates an invalid field-name error.
    #[must_use]
    pub fn invalid_key(key: impl Into<String>, position: impl fmt::Display) -> Self {
        Self::new(ErrorKind::InvalidKey {
            key: key.into(),
            position: position.to_string(),
        })
    }

    /// Creates a reserved field-name error.
    #[must_use]
    pub fn reserved_key(key: impl Into<String>, position: impl fmt::Display) -> Self {
        Self::new(ErrorKind::ReservedKey {
            key: key.into(),
            position: position.to_string(),
        })
    }

    /// Creates an unknown enum-kind error listing the valid tags.
    #[must_use]
    pub fn invalid_kind(tag: impl Into<String>, valid: &[&str]) -> Self {
        Self::new(ErrorKind::InvalidKind {
            tag: tag.into(),
            valid: valid.iter().map(ToString::to_string).collect(),
        })
    }

    /// Creates a flag-capacity error.
    #[must_use]
    pub fn too_many_flags(count: usize) -> Self {
        Self::new(ErrorKind::TooManyFlags { count })
    }

    /// Creates a non-callable fallback error.
    #[must_use]
    pub fn fallback_not_callable(title: impl Into<String>) -> Self {
        Self::new(ErrorKind::FallbackNotCallable {
            title: title.into(),
        })
    }

    /// Creates a non-callable match handler error.
    #[must_use]
    pub fn handler_not_callable(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::HandlerNotCallable {
            field: field.into(),
        })
    }

    /// Creates a non-exhaustive match form error.
    #[must_use]
    pub fn incomplete_match(missing: Vec<String>) -> Self {
        Self::new(ErrorKind::IncompleteMatch { missing })
    }

    /// Creates a missing payload field error.
    #[must_use]
    pub fn missing_field(variant: impl Into<String>, field: impl Into<String>, depth: usize) -> Self {
        Self::new(ErrorKind::MissingField {
            variant: variant.into(),
            field: field.into(),
            depth,
        })
    }

    /// Creates an error for a payload field that should have been an object.
    #[must_use]
    pub fn expected_object(variant: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExpectedObject {
            variant: variant.into(),
            field: field.into(),
        })
    }

    /// Creates a schema depth limit error.
    #[must_use]
    pub fn schema_too_deep(limit: usize) -> Self {
        Self::new(ErrorKind::SchemaTooDeep { limit })
    }

    /// Creates a host error raised from inside a handler or fallback.
    #[must_use]
    pub fn host(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Host(message.into()))
    }

    /// Renders the message, highlighting the offending token when configured.
    ///
    /// The plain message (`Display`) never contains terminal escapes.
    #[must_use]
    pub fn render(&self, config: &EnumConfig) -> String {
        let message = self.to_string();
        if !config.highlight_errors {
            return message;
        }
        match self.kind.offending_token() {
            Some(token) => match message.strip_suffix(token.as_str()) {
                Some(head) => format!("{head}\x1B[7;33m{token}\x1B[0m"),
                None => message,
            },
            None => message,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Field name does not follow identifier syntax.
    #[error("enum key at [{position}] must follow variable naming syntax: {key}")]
    InvalidKey {
        /// The offending field name.
        key: String,
        /// Where the key was found (field index, or depth and name).
        position: String,
    },

    /// Field name collides with a reserved or already defined member.
    #[error("enum key at [{position}] must not be a reserved property: {key}")]
    ReservedKey {
        /// The offending field name.
        key: String,
        /// Where the key was found (field index, or depth and name).
        position: String,
    },

    /// Unknown enum kind tag.
    #[error("enum kind must be one of [{}]: {tag}", .valid.join(", "))]
    InvalidKind {
        /// The tag that was given.
        tag: String,
        /// The tags that would have been accepted.
        valid: Vec<String>,
    },

    /// More flag fields than bits available.
    #[error("enum of bitmask type must be 32 >= keys long (excluding '0'): {count}")]
    TooManyFlags {
        /// Number of entries in the definition.
        count: usize,
    },

    /// The `0` field of a flags enum is not a function.
    #[error("field 0 of enum {title} must be a function")]
    FallbackNotCallable {
        /// Title of the enum being built.
        title: String,
    },

    /// A match form entry is not a function.
    #[error("expected matching expression for \"{field}\" to be a function")]
    HandlerNotCallable {
        /// The variant whose handler is not callable.
        field: String,
    },

    /// A match form does not cover every variant.
    #[error("matching form doesn't cover all variants of enum, missing: {}", .missing.join(","))]
    IncompleteMatch {
        /// Every variant without a handler, in declaration order.
        missing: Vec<String>,
    },

    /// Payload input lacks a field the schema requires.
    #[error("enum variant \"{variant}\" expected input object field named {field} at layer {depth}")]
    MissingField {
        /// The variant being constructed.
        variant: String,
        /// The missing field.
        field: String,
        /// Nesting depth of the missing field (0 = top level).
        depth: usize,
    },

    /// Payload input has a primitive where the schema expects a nested shape.
    #[error("enum variant \"{variant}\" expected input object field \"{field}\" to be an object")]
    ExpectedObject {
        /// The variant being constructed.
        variant: String,
        /// The field holding the wrong value.
        field: String,
    },

    /// Example payload nests deeper than the configured limit.
    #[error("schema nesting exceeds {limit} levels")]
    SchemaTooDeep {
        /// The configured limit.
        limit: usize,
    },

    /// Bitmask query on an enum without bit associations.
    #[error("cannot use bitmasking methods on symbolic enum {title}")]
    NotBitmaskable {
        /// Title of the enum.
        title: String,
    },

    /// Match binding on an enum that has no variants.
    #[error("can only bind match forms on symbolic enums: {title}")]
    NotSymbolic {
        /// Title of the enum.
        title: String,
    },

    /// Matching something that is not a variant instance.
    #[error("can only match enum variant instances, got {found}")]
    NotAVariant {
        /// Description of what was given instead.
        found: String,
    },

    /// Matching a variant against an enum it does not belong to.
    #[error("variant {variant} does not belong to enum {title}")]
    ForeignVariant {
        /// The variant name.
        variant: String,
        /// Title of the enum it was matched against.
        title: String,
    },

    /// Looking up a variant name the enum does not define.
    #[error("enum {title} has no variant named {name}")]
    UnknownVariant {
        /// Title of the enum.
        title: String,
        /// The name that was requested.
        name: String,
    },

    /// Constructing a payload-less variant.
    #[error("variant {name} carries no payload and cannot be constructed")]
    NotConstructible {
        /// The variant name.
        name: String,
    },

    /// Error raised by host code (handlers, fallbacks).
    #[error("{0}")]
    Host(String),
}

impl ErrorKind {
    /// Returns the host exception class for this kind.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidKey { .. }
            | Self::ReservedKey { .. }
            | Self::InvalidKind { .. }
            | Self::IncompleteMatch { .. }
            | Self::MissingField { .. }
            | Self::ExpectedObject { .. }
            | Self::NotSymbolic { .. } => ErrorClass::Syntax,
            Self::TooManyFlags { .. } | Self::SchemaTooDeep { .. } => ErrorClass::Range,
            Self::FallbackNotCallable { .. }
            | Self::HandlerNotCallable { .. }
            | Self::NotBitmaskable { .. }
            | Self::NotAVariant { .. }
            | Self::ForeignVariant { .. }
            | Self::UnknownVariant { .. }
            | Self::NotConstructible { .. }
            | Self::Host(_) => ErrorClass::Type,
        }
    }

    /// Returns the phase in which this kind is raised.
    #[must_use]
    pub const fn phase(&self) -> ErrorPhase {
        match self {
            Self::InvalidKey { .. }
            | Self::ReservedKey { .. }
            | Self::InvalidKind { .. }
            | Self::TooManyFlags { .. }
            | Self::FallbackNotCallable { .. }
            | Self::HandlerNotCallable { .. }
            | Self::SchemaTooDeep { .. } => ErrorPhase::Definition,
            Self::IncompleteMatch { .. } => ErrorPhase::Coverage,
            Self::MissingField { .. }
            | Self::ExpectedObject { .. }
            | Self::NotBitmaskable { .. }
            | Self::NotSymbolic { .. }
            | Self::NotAVariant { .. }
            | Self::ForeignVariant { .. }
            | Self::UnknownVariant { .. }
            | Self::NotConstructible { .. }
            | Self::Host(_) => ErrorPhase::Application,
        }
    }

    /// Returns the token a terminal rendering should highlight, if any.
    #[must_use]
    pub fn offending_token(&self) -> Option<String> {
        match self {
            Self::InvalidKey { key, .. } | Self::ReservedKey { key, .. } => Some(key.clone()),
            Self::InvalidKind { tag, .. } => Some(tag.clone()),
            Self::TooManyFlags { count } => Some(count.to_string()),
            _ => None,
        }
    }
}

/// Host exception class an error corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed definition or input shape.
    Syntax,
    /// Wrong kind of value (non-function, non-variant, wrong enum kind).
    Type,
    /// Numeric limit exceeded.
    Range,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Type => write!(f, "TypeError"),
            Self::Range => write!(f, "RangeError"),
        }
    }
}

/// When an error can occur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorPhase {
    /// While building an enum; a programmer error.
    Definition,
    /// While registering or checking a match form.
    Coverage,
    /// While using an enum; recoverable when input is untrusted.
    Application,
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Title of the enum involved.
    pub title: Option<String>,
    /// Operations that were in progress, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enum title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }

    fn merge(mut self, outer: ErrorContext) -> Self {
        if self.title.is_none() {
            self.title = outer.title;
        }
        self.stack.extend(outer.stack);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            write!(f, "in enum {title}")?;
        }
        for frame in &self.stack {
            writeln!(f)?;
            write!(f, "  in {frame}")?;
        }
        Ok(())
    }
}
