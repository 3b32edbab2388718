use serde::Deserialize;

/// Compilation settings.
///
/// ```
/// let options: joinery::Options = serde_json::from_str(r#"{ "bind_params": false }"#).unwrap();
/// assert!(!options.bind_params);
/// assert!(options.quote_identifiers);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Emit placeholders and return the bound values. When false, values
    /// are inlined as escaped literals.
    pub bind_params: bool,

    /// Quote every identifier. When false, identifiers are only quoted when
    /// the dialect requires it.
    pub quote_identifiers: bool,

    /// Prefix prepended to every table name.
    pub table_name_prefix: Option<String>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn bind_params(mut self, bind_params: bool) -> Self {
        self.bind_params = bind_params;
        self
    }

    pub fn quote_identifiers(mut self, quote_identifiers: bool) -> Self {
        self.quote_identifiers = quote_identifiers;
        self
    }

    pub fn table_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_name_prefix = Some(prefix.into());
        self
    }
}

impl Default for Options {
    fn default() -> Options {
        Options {
            bind_params: true,
            quote_identifiers: true,
            table_name_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_partial() {
        let options: Options = serde_json::from_str(
            r#"{ "quote_identifiers": false, "table_name_prefix": "app_" }"#,
        )
        .unwrap();

        assert_eq!(
            options,
            Options::new()
                .quote_identifiers(false)
                .table_name_prefix("app_")
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Options>(r#"{ "bind": true }"#).is_err());
    }
}
