//! Configuration options for parsing and serialization.
//!
//! - [`LuaOptions`]: main configuration struct
//! - [`Quote`]: quote character used for emitted strings
//! - [`Separator`]: entry separator used for emitted tables
//!
//! Default options produce the canonical compact form:
//!
//! ```rust
//! use serde_luatable::{lua, serialize, serialize_with_options, LuaOptions, Quote, Separator};
//!
//! let value = lua!(["a", 1]);
//! assert_eq!(serialize(&value), "{\"a\",1,}");
//!
//! let options = LuaOptions::new()
//!     .with_quote(Quote::Single)
//!     .with_separator(Separator::Semicolon);
//! assert_eq!(serialize_with_options(&value, &options), "{'a';1;}");
//! ```

/// Quote character for serialized strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// Separator written after every table entry.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::Separator;
///
/// assert_eq!(Separator::Comma.as_char(), ',');
/// assert_eq!(Separator::Semicolon.as_char(), ';');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
}

impl Separator {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Separator::Comma => ',',
            Separator::Semicolon => ';',
        }
    }
}

/// Options shared by the parser and the serializer.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{LuaOptions, Quote};
///
/// // Default compact options
/// let options = LuaOptions::new();
/// assert!(!options.pretty);
///
/// // Pretty-printed with 4-space indentation and single quotes
/// let options = LuaOptions::pretty().with_indent(4).with_quote(Quote::Single);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LuaOptions {
    /// Spaces per nesting level; only used when `pretty` is set.
    pub indent: usize,
    pub quote: Quote,
    pub separator: Separator,
    /// One entry per line.
    pub pretty: bool,
    /// Deepest table nesting the parser accepts.
    pub max_depth: usize,
}

pub(crate) const DEFAULT_MAX_DEPTH: usize = 200;

impl Default for LuaOptions {
    fn default() -> Self {
        LuaOptions {
            indent: 2,
            quote: Quote::default(),
            separator: Separator::default(),
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LuaOptions {
    /// Creates default options (compact output, double quotes, commas).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output, one entry per line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::{lua, serialize_with_options, LuaOptions};
    ///
    /// let text = serialize_with_options(&lua!([1, 2]), &LuaOptions::pretty());
    /// assert_eq!(text, "{\n  1,\n  2,\n}");
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        LuaOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the quote character for strings.
    #[must_use]
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the entry separator.
    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the deepest nesting level the parser accepts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::{parse_with_options, Error, LuaOptions};
    ///
    /// let options = LuaOptions::new().with_max_depth(2);
    /// assert!(parse_with_options("{{1}}", &options).is_ok());
    /// assert!(matches!(
    ///     parse_with_options("{{{1}}}", &options),
    ///     Err(Error::DepthLimitExceeded { limit: 2, .. })
    /// ));
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
