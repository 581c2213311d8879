use std::fmt;

use indexmap::IndexMap;

use crate::coerce::u8bytes;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::macro_def::{Macro, STRING_ONE, STRING_ZERO};

/// An ordered set of macro definitions for one compiler invocation.
///
/// Each entry maps a macro name to its stored value: `"0"` for an undefined
/// macro, `"1"` for one defined without a value, or the literal definition.
/// Redefining a name replaces its value but keeps its position.
///
/// Because values are stored as strings, a macro defined without a value and
/// one defined to `"1"` read back identically through [`Macros::definition_for`].
///
/// ```rust
/// use macrodefs::Macros;
///
/// let mut macros = Macros::new();
/// macros.define("NDEBUG", None::<&str>, false).unwrap();
/// macros.define("VERSION", Some("1.2.3"), false).unwrap();
/// macros.undefine("DEBUG").unwrap();
///
/// assert_eq!(macros.to_string(), "DNDEBUG -DVERSION=1.2.3 -UDEBUG");
/// assert_eq!(macros.to_args(), ["-DNDEBUG", "-DVERSION=1.2.3", "-UDEBUG"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Macros {
    entries: IndexMap<String, String>,
}

impl Macros {
    /// Create an empty macro set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro and store it
    ///
    /// # Errors
    /// Returns [`crate::MacroError::InvalidName`] if `name` is empty.
    pub fn define<N, D>(&mut self, name: N, definition: Option<D>, undefine: bool) -> Result<Macro>
    where
        N: Into<String>,
        D: Into<String>,
    {
        Ok(self.add(Macro::new(name, definition, undefine)?))
    }

    /// Mark a macro as explicitly undefined
    ///
    /// # Errors
    /// Returns [`crate::MacroError::InvalidName`] if `name` is empty.
    pub fn undefine<N: Into<String>>(&mut self, name: N) -> Result<Macro> {
        Ok(self.add(Macro::undefined(name)?))
    }

    /// Store a macro, replacing any previous entry with the same name
    pub fn add(&mut self, m: Macro) -> Macro {
        let value = if m.is_defined() {
            match m.definition() {
                Some(definition) if !definition.is_empty() => definition,
                _ => STRING_ONE,
            }
        } else {
            STRING_ZERO
        };
        tracing::trace!(name = m.name(), value, "storing macro");
        self.entries.insert(m.name().to_string(), value.to_string());
        m
    }

    /// Remove a macro, returning whether it was present
    pub fn delete(&mut self, name: &str) -> bool {
        let removed = self.entries.shift_remove(name).is_some();
        if removed {
            tracing::trace!(name, "removed macro");
        }
        removed
    }

    /// Rebuild the macro stored under `name`, or an undefined macro if absent
    ///
    /// # Errors
    /// Returns [`crate::MacroError::InvalidName`] if `name` is empty.
    pub fn definition_for(&self, name: &str) -> Result<Macro> {
        match self.entries.get(name) {
            Some(value) => Macro::new(name, Some(value.as_str()), false),
            None => Macro::undefined(name),
        }
    }

    /// Number of stored macros
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no macros are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a macro with this name is stored (defined or undefined)
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The stored value for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Iterate over `(name, stored value)` pairs in insertion order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate over the stored entries as [`Macro`] values
    pub fn macros(&self) -> impl Iterator<Item = Macro> + '_ {
        self.iter().map(|(name, value)| Macro::from_stored(name, value))
    }

    /// `(name, value)` pairs in insertion order
    #[must_use]
    pub fn to_list(&self) -> Vec<(String, String)> {
        self.macros().map(|m| m.to_tuple()).collect()
    }

    /// Same content as [`Macros::to_list`], as a fixed-size slice
    #[must_use]
    pub fn to_tuple(&self) -> Box<[(String, String)]> {
        self.to_list().into_boxed_slice()
    }

    /// One compiler argument per macro, e.g. `["-DA", "-UB"]`
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        self.macros().map(|m| m.to_arg()).collect()
    }

    /// Join all macros with the configured separator.
    ///
    /// The result is trimmed. An empty set renders as the separator without
    /// its leading whitespace (`"-"` by default).
    #[must_use]
    pub fn render(&self, config: &RenderConfig) -> String {
        if self.is_empty() {
            return config.prefix().to_string();
        }
        self.join(config).trim().to_string()
    }

    /// Join all macros with the configured separator, prefixed by the
    /// separator itself, e.g. `"-DA -DB=1"`.
    #[must_use]
    pub fn to_command_line(&self, config: &RenderConfig) -> String {
        format!("{}{}", config.prefix(), self.join(config).trim())
    }

    /// UTF-8 encoding of the default rendering
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        u8bytes(self)
    }

    fn join(&self, config: &RenderConfig) -> String {
        self.macros()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(&config.separator)
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderConfig::default()))
    }
}

impl Extend<Macro> for Macros {
    fn extend<I: IntoIterator<Item = Macro>>(&mut self, iter: I) {
        for m in iter {
            self.add(m);
        }
    }
}

impl FromIterator<Macro> for Macros {
    fn from_iter<I: IntoIterator<Item = Macro>>(iter: I) -> Self {
        let mut macros = Self::new();
        macros.extend(iter);
        macros
    }
}

/// Iterator over the `(name, stored value)` pairs of a [`Macros`]
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Macros {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Macros {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self.to_list() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MacroError;
    use pretty_assertions::assert_eq;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    fn build_scenario() -> Macros {
        let mut m = Macros::new();
        m.define("NDEBUG", None::<&str>, false).unwrap();
        m.define("VERSION", Some("1.2.3"), false).unwrap();
        m.undefine("DEBUG").unwrap();
        m
    }

    #[test]
    fn scenario_list_and_string() {
        let m = build_scenario();
        assert_eq!(
            m.to_list(),
            vec![
                pair("NDEBUG", "1"),
                pair("VERSION", "1.2.3"),
                pair("DEBUG", "0"),
            ]
        );
        assert_eq!(m.to_string(), "DNDEBUG -DVERSION=1.2.3 -UDEBUG");
        assert_eq!(m.to_bytes(), b"DNDEBUG -DVERSION=1.2.3 -UDEBUG".to_vec());
    }

    #[test]
    fn two_macro_join() {
        let mut m = Macros::new();
        m.define("A", None::<&str>, false).unwrap();
        m.define("B", Some("1"), false).unwrap();
        // "1" collapses to a bare define
        assert_eq!(m.to_string(), "DA -DB");

        let mut m = Macros::new();
        m.define("A", None::<&str>, false).unwrap();
        m.define("B", Some("x"), false).unwrap();
        assert_eq!(m.to_string(), "DA -DB=x");
    }

    #[test]
    fn empty_set_renders_bare_separator() {
        let m = Macros::new();
        assert_eq!(m.to_string(), "-");
        assert_eq!(m.render(&RenderConfig::new().with_separator(" /")), "/");
        assert_eq!(m.to_command_line(&RenderConfig::default()), "-");
        assert!(m.to_list().is_empty());
        assert!(m.to_args().is_empty());
    }

    #[test]
    fn define_returns_normalized_macro() {
        let mut m = Macros::new();
        let defined = m.define("X", Some("0"), false).unwrap();
        assert!(defined.is_undefined());
        assert_eq!(m.get("X"), Some("0"));
    }

    #[test]
    fn define_round_trips_values() {
        for value in ["X", "2", "1.2.3", "NPY_1_7_API_VERSION", "a b"] {
            let mut m = Macros::new();
            let defined = m.define("NAME", Some(value), false).unwrap();
            assert_eq!(defined.to_tuple(), pair("NAME", value));
            assert_eq!(m.to_list(), vec![pair("NAME", value)]);
        }
    }

    #[test]
    fn define_rejects_empty_name() {
        let mut m = Macros::new();
        assert_eq!(
            m.define("", Some("x"), false),
            Err(MacroError::InvalidName)
        );
        assert_eq!(m.undefine(""), Err(MacroError::InvalidName));
        assert!(m.is_empty());
    }

    #[test]
    fn add_stores_derived_values() {
        let mut m = Macros::new();
        let added = m.add(Macro::with_value("A", "val").unwrap());
        assert_eq!(added, Macro::with_value("A", "val").unwrap());
        m.add(Macro::defined("B").unwrap());
        m.add(Macro::undefined("C").unwrap());
        m.add(Macro::with_value("D", "").unwrap());

        assert_eq!(m.get("A"), Some("val"));
        assert_eq!(m.get("B"), Some("1"));
        assert_eq!(m.get("C"), Some("0"));
        assert_eq!(m.get("D"), Some("1"));
    }

    #[test]
    fn redefinition_keeps_position() {
        let mut m = build_scenario();
        m.define("NDEBUG", Some("yes"), false).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.to_string(), "DNDEBUG=yes -DVERSION=1.2.3 -UDEBUG");
    }

    #[test]
    fn delete_present_and_absent() {
        let mut m = build_scenario();
        assert!(!m.delete("MISSING"));
        assert_eq!(m.len(), 3);

        assert!(m.delete("VERSION"));
        assert!(!m.contains("VERSION"));
        assert_eq!(m.to_string(), "DNDEBUG -UDEBUG");

        assert!(!m.delete("VERSION"));
    }

    #[test]
    fn definition_for_absent_is_undefined() {
        let m = Macros::new();
        let absent = m.definition_for("FOO").unwrap();
        assert!(absent.is_undefined());
        assert_eq!(absent.to_string(), "UFOO");
        assert_eq!(m.definition_for(""), Err(MacroError::InvalidName));
    }

    #[test]
    fn definition_for_loses_one_boundary() {
        let mut m = Macros::new();
        m.define("A", None::<&str>, false).unwrap();
        assert_eq!(
            m.definition_for("A").unwrap(),
            Macro::with_value("A", "1").unwrap()
        );
        assert_eq!(m.definition_for("A").unwrap(), Macro::defined("A").unwrap());

        m.define("B", Some("value"), false).unwrap();
        assert_eq!(m.definition_for("B").unwrap().definition(), Some("value"));

        m.undefine("C").unwrap();
        assert!(m.definition_for("C").unwrap().is_undefined());
    }

    #[test]
    fn macros_yields_every_entry() {
        let m = build_scenario();
        let rebuilt: Vec<Macro> = m.macros().collect();
        assert_eq!(
            rebuilt,
            vec![
                Macro::defined("NDEBUG").unwrap(),
                Macro::with_value("VERSION", "1.2.3").unwrap(),
                Macro::undefined("DEBUG").unwrap(),
            ]
        );
    }

    #[test]
    fn tuple_matches_list() {
        let m = build_scenario();
        assert_eq!(m.to_tuple().to_vec(), m.to_list());
    }

    #[test]
    fn custom_separator() {
        let m = build_scenario();
        let config = RenderConfig::new().with_separator(" /");
        assert_eq!(m.render(&config), "DNDEBUG /DVERSION=1.2.3 /UDEBUG");
        assert_eq!(m.to_command_line(&config), "/DNDEBUG /DVERSION=1.2.3 /UDEBUG");
    }

    #[test]
    fn command_line_and_args() {
        let m = build_scenario();
        assert_eq!(
            m.to_command_line(&RenderConfig::default()),
            "-DNDEBUG -DVERSION=1.2.3 -UDEBUG"
        );
        assert_eq!(m.to_args(), vec!["-DNDEBUG", "-DVERSION=1.2.3", "-UDEBUG"]);
    }

    #[test]
    fn collect_and_iterate() {
        let m: Macros = ["A", "B=2", "C=0"]
            .iter()
            .map(|spec| spec.parse::<Macro>().unwrap())
            .collect();
        let stored: Vec<_> = m.iter().collect();
        assert_eq!(stored, vec![("A", "1"), ("B", "2"), ("C", "0")]);

        let mut names = Vec::new();
        for (name, _) in &m {
            names.push(name);
        }
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(m.iter().len(), 3);
        assert_eq!(m.iter().next_back(), Some(("C", "0")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_pairs() {
        let m = build_scenario();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(
            json,
            r#"[["NDEBUG","1"],["VERSION","1.2.3"],["DEBUG","0"]]"#
        );
    }
}
