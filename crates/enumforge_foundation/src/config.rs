//! Configuration for enum construction and error rendering.

/// Options that shape how enums are built and how errors are rendered.
///
/// The defaults reproduce the library's standard behavior; presets and
/// `with_*` builders adjust individual knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConfig {
    /// Maximum nesting depth of a symbolic variant's example payload.
    pub max_schema_depth: usize,

    /// Whether variant constructors wrap a bare primitive input as
    /// `{value: input}` before applying the schema.
    pub wrap_primitive_input: bool,

    /// Whether [`Error::render`](crate::Error::render) highlights the
    /// offending token with terminal escapes.
    pub highlight_errors: bool,
}

impl Default for EnumConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: 64,
            wrap_primitive_input: true,
            highlight_errors: false,
        }
    }
}

impl EnumConfig {
    /// Creates a configuration that rejects bare primitive inputs and keeps
    /// schemas shallow.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_schema_depth: 16,
            wrap_primitive_input: false,
            highlight_errors: false,
        }
    }

    /// Creates a configuration for interactive terminals (highlighted errors).
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            highlight_errors: true,
            ..Self::default()
        }
    }

    /// Builder method to set the schema depth limit.
    #[must_use]
    pub fn with_max_schema_depth(mut self, depth: usize) -> Self {
        self.max_schema_depth = depth;
        self
    }

    /// Builder method to set primitive input wrapping.
    #[must_use]
    pub fn with_wrap_primitive_input(mut self, wrap: bool) -> Self {
        self.wrap_primitive_input = wrap;
        self
    }

    /// Builder method to set error highlighting.
    #[must_use]
    pub fn with_highlight_errors(mut self, highlight: bool) -> Self {
        self.highlight_errors = highlight;
        self
    }
}
