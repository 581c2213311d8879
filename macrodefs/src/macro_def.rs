use std::fmt;
use std::str::FromStr;

use crate::coerce::{parse_base10, u8bytes};
use crate::error::{MacroError, Result};

/// Stored value of an undefined macro
pub const STRING_ZERO: &str = "0";
/// Stored value of a macro defined without an explicit value
pub const STRING_ONE: &str = "1";

/// A single preprocessor macro as passed to a compiler driver.
///
/// A macro is either defined (`-DNAME` or `-DNAME=VALUE`) or explicitly
/// undefined (`-UNAME`). Instances never change after construction.
///
/// # Sentinel values
///
/// Definitions that read as the integer `0` or `1` are not kept as values:
///
/// - a zero definition (`"0"`, `" 00"`, `"-0"`, ...) turns the macro into an
///   undefined one, whatever `undefine` flag was passed;
/// - a one definition (`"1"`, `"+1"`, ...) is dropped, leaving the macro
///   defined without a value.
///
/// A macro can therefore never be defined to the literal text `0` or `1`.
/// Use [`Macro::state`] to inspect the resulting three-way state.
///
/// ```rust
/// use macrodefs::{Macro, MacroState};
///
/// let m = Macro::with_value("VERSION", "1.2.3").unwrap();
/// assert_eq!(m.to_string(), "DVERSION=1.2.3");
///
/// let m = Macro::with_value("DEBUG", "0").unwrap();
/// assert_eq!(m.state(), MacroState::Undefined);
/// assert_eq!(m.to_string(), "UDEBUG");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Macro {
    name: String,
    definition: Option<String>,
    undefine: bool,
}

/// Three-way view of a [`Macro`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacroState<'a> {
    /// Explicitly undefined (`UNAME`)
    Undefined,
    /// Defined without a value (`DNAME`)
    Defined,
    /// Defined with a value (`DNAME=VALUE`)
    Valued(&'a str),
}

impl Macro {
    /// Create a new macro, applying the zero/one normalization.
    ///
    /// # Errors
    /// Returns [`MacroError::InvalidName`] if `name` is empty.
    pub fn new<N, D>(name: N, definition: Option<D>, undefine: bool) -> Result<Self>
    where
        N: Into<String>,
        D: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(MacroError::InvalidName);
        }

        Ok(Self::normalized(name, definition.map(Into::into), undefine))
    }

    /// Rebuild a macro from an entry stored in [`crate::Macros`], whose name
    /// was validated when it was added
    pub(crate) fn from_stored(name: &str, value: &str) -> Self {
        Self::normalized(name.to_string(), Some(value.to_string()), false)
    }

    fn normalized(name: String, definition: Option<String>, undefine: bool) -> Self {
        let string_zero = Self::is_string_value(definition.as_deref(), 0);
        let string_one = Self::is_string_value(definition.as_deref(), 1);
        if string_zero || string_one {
            tracing::trace!(
                name = %name,
                definition = ?definition,
                "normalized sentinel definition"
            );
        }

        Self {
            name,
            definition: if string_zero || string_one {
                None
            } else {
                definition
            },
            undefine: string_zero || undefine,
        }
    }

    /// Create a macro defined without a value
    ///
    /// # Errors
    /// Returns [`MacroError::InvalidName`] if `name` is empty.
    pub fn defined<N: Into<String>>(name: N) -> Result<Self> {
        Self::new(name, None::<String>, false)
    }

    /// Create a macro defined to `value`
    ///
    /// # Errors
    /// Returns [`MacroError::InvalidName`] if `name` is empty.
    pub fn with_value<N: Into<String>, D: Into<String>>(name: N, value: D) -> Result<Self> {
        Self::new(name, Some(value), false)
    }

    /// Create an explicitly undefined macro
    ///
    /// # Errors
    /// Returns [`MacroError::InvalidName`] if `name` is empty.
    pub fn undefined<N: Into<String>>(name: N) -> Result<Self> {
        Self::new(name, None::<String>, true)
    }

    /// Parse the operand of a `-U` switch. Unlike `-D` operands it may not
    /// carry a value.
    ///
    /// # Errors
    /// Returns [`MacroError::MalformedSpec`] if the operand contains `=`,
    /// or [`MacroError::InvalidName`] if it is empty.
    pub fn parse_undef(spec: &str) -> Result<Self> {
        let name = spec.trim();
        if name.contains('=') {
            return Err(MacroError::MalformedSpec(spec.to_string()));
        }
        Self::undefined(name)
    }

    /// Check whether `candidate` is a string that reads as the integer `value`.
    ///
    /// `None` and strings that do not parse as base-10 integers yield `false`.
    #[must_use]
    pub fn is_string_value(candidate: Option<&str>, value: i64) -> bool {
        candidate.and_then(parse_base10) == Some(value)
    }

    /// The macro name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit definition, if any
    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Whether this is an undef macro
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        self.undefine
    }

    /// Whether this macro is defined (with or without a value)
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        !self.undefine
    }

    /// The three-way state of this macro
    #[must_use]
    pub fn state(&self) -> MacroState<'_> {
        match (self.undefine, self.definition.as_deref()) {
            (true, _) => MacroState::Undefined,
            (false, Some(value)) => MacroState::Valued(value),
            (false, None) => MacroState::Defined,
        }
    }

    /// The `(name, value)` pair for a define-macros list: `"0"` when
    /// undefined, `"1"` when defined without a value.
    #[must_use]
    pub fn to_tuple(&self) -> (String, String) {
        let value = match self.state() {
            MacroState::Undefined => STRING_ZERO,
            MacroState::Valued(value) => value,
            MacroState::Defined => STRING_ONE,
        };
        (self.name.clone(), value.to_string())
    }

    /// The compiler switch with its leading dash, e.g. `-DNAME=VALUE`
    #[must_use]
    pub fn to_arg(&self) -> String {
        format!("-{self}")
    }

    /// UTF-8 encoding of the switch text
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        u8bytes(self)
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            MacroState::Undefined => write!(f, "U{}", self.name),
            MacroState::Valued(value) => write!(f, "D{}={value}", self.name),
            MacroState::Defined => write!(f, "D{}", self.name),
        }
    }
}

impl From<&Macro> for Vec<u8> {
    fn from(m: &Macro) -> Self {
        m.to_bytes()
    }
}

impl FromStr for Macro {
    type Err = MacroError;

    /// Parse the operand of a `-D` switch: `NAME` or `NAME=VALUE`
    fn from_str(spec: &str) -> Result<Self> {
        match spec.split_once('=') {
            Some((name, value)) => Self::with_value(name.trim(), value),
            None => Self::defined(spec.trim()),
        }
    }
}
