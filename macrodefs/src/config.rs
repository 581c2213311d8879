/// Separator placed between rendered macros by default
pub const DEFAULT_SEPARATOR: &str = " -";

/// Configuration for rendering a macro set as a single string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Token joining consecutive macros, e.g. `" -"` for `DA -DB`
    pub separator: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl RenderConfig {
    /// Create configuration with the default `" -"` separator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the separator token
    #[must_use]
    pub fn with_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }

    /// The separator with its leading whitespace removed
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.separator.trim_start()
    }
}
