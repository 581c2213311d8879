#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

//! # C Preprocessor Macro Definitions
//!
//! This library models the `-D` / `-U` macro switches handed to a C or C++
//! compiler. A [`Macro`] is a single definition; [`Macros`] is an ordered set
//! of them that renders as a flag string, an argument vector, or the
//! `(name, value)` list build tools expect for their define-macros option.
//!
//! ## Features
//!
//! - Defined, valued, and undefined macros (`DNAME`, `DNAME=VALUE`, `UNAME`)
//! - Zero/one normalization of definitions (`"0"` undefines, `"1"` is a bare define)
//! - Configurable separator for the joined form
//! - Parsing of `-D` / `-U` operands
//! - C FFI for integration with other languages
//!
//! ## Example
//!
//! ```rust
//! use macrodefs::{Macros, RenderConfig};
//!
//! let mut macros = Macros::new();
//! macros.define("NDEBUG", None::<&str>, false)?;
//! macros.define("VERSION", Some("1.2.3"), false)?;
//! macros.undefine("DEBUG")?;
//!
//! assert_eq!(
//!     macros.to_list(),
//!     vec![
//!         ("NDEBUG".to_string(), "1".to_string()),
//!         ("VERSION".to_string(), "1.2.3".to_string()),
//!         ("DEBUG".to_string(), "0".to_string()),
//!     ]
//! );
//! assert_eq!(macros.to_string(), "DNDEBUG -DVERSION=1.2.3 -UDEBUG");
//! assert_eq!(
//!     macros.to_command_line(&RenderConfig::default()),
//!     "-DNDEBUG -DVERSION=1.2.3 -UDEBUG"
//! );
//! # Ok::<(), macrodefs::MacroError>(())
//! ```

mod c_api;
mod coerce;
mod config;
mod error;
mod macro_def;
mod macros;

pub use coerce::{parse_base10, u8bytes};
pub use config::{DEFAULT_SEPARATOR, RenderConfig};
pub use error::{MacroError, Result};
pub use macro_def::{Macro, MacroState, STRING_ONE, STRING_ZERO};
pub use macros::{Iter, Macros};

/// Build a macro set from `-D` and `-U` operands, in that order.
///
/// # Errors
/// Returns `MacroError` if any operand is malformed or has an empty name.
pub fn macros_from_specs<D, U>(defines: D, undefines: U) -> Result<Macros>
where
    D: IntoIterator,
    D::Item: AsRef<str>,
    U: IntoIterator,
    U::Item: AsRef<str>,
{
    let mut macros = Macros::new();
    for spec in defines {
        macros.add(spec.as_ref().parse()?);
    }
    for spec in undefines {
        macros.add(Macro::parse_undef(spec.as_ref())?);
    }
    Ok(macros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_script_macros() {
        let mut macros = Macros::new();
        macros.define("NDEBUG", None::<&str>, false).unwrap();
        macros.define("NUMPY", None::<&str>, false).unwrap();
        macros.define("VERSION", Some("0.5.1"), false).unwrap();
        macros
            .define("NPY_NO_DEPRECATED_API", Some("NPY_1_7_API_VERSION"), false)
            .unwrap();

        assert_eq!(
            macros.to_string(),
            "DNDEBUG -DNUMPY -DVERSION=0.5.1 -DNPY_NO_DEPRECATED_API=NPY_1_7_API_VERSION"
        );
        assert_eq!(macros.to_list()[1], ("NUMPY".to_string(), "1".to_string()));
    }

    #[test]
    fn specs_define_then_undefine() {
        let macros = macros_from_specs(["A", "B=2"], ["A"]).unwrap();
        assert_eq!(macros.to_string(), "UA -DB=2");
    }

    #[test]
    fn specs_propagate_errors() {
        assert_eq!(
            macros_from_specs(["=x"], Vec::<&str>::new()),
            Err(MacroError::InvalidName)
        );
        assert_eq!(
            macros_from_specs(Vec::<&str>::new(), ["X=1"]),
            Err(MacroError::MalformedSpec("X=1".to_string()))
        );
    }

    #[test]
    fn values_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Macro>();
        assert_send_sync::<Macros>();
    }
}
