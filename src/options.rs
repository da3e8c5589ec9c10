use crate::error::{FallbackError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODULE_NAME: &str = "this-fallback";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackOptions {
    /// Label for log lines, usually the template's module path.
    pub module_name: String,
    /// Identifiers bound by the embedding module; never ambiguous.
    pub locals: Vec<String>,
    /// Identifiers runtime imports must not be bound as.
    pub reserved_names: Vec<String>,
    /// Emit each fallback diagnostic as a `warn` event in addition to returning it.
    pub emit_warnings: bool,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        FallbackOptions {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            locals: vec![],
            reserved_names: vec![],
            emit_warnings: true,
        }
    }
}

impl FallbackOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: FallbackOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        for name in self.locals.iter().chain(&self.reserved_names) {
            if !is_identifier(name) {
                return Err(FallbackError::InvalidOptions(format!(
                    "\"{}\" is not a valid identifier",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('@')
        && !name
            .chars()
            .any(|c| c == '.' || c == '/' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options = FallbackOptions::from_json("{}").unwrap();
        assert_eq!(options.module_name, DEFAULT_MODULE_NAME);
        assert!(options.locals.is_empty());
        assert!(options.emit_warnings);
    }

    #[test]
    fn test_camel_case_fields() {
        let options = FallbackOptions::from_json(
            r#"{"moduleName":"app/templates/index.hbs","locals":["Button"],"reservedNames":["isComponent"],"emitWarnings":false}"#,
        )
        .unwrap();
        assert_eq!(options.module_name, "app/templates/index.hbs");
        assert_eq!(options.locals, vec!["Button"]);
        assert_eq!(options.reserved_names, vec!["isComponent"]);
        assert!(!options.emit_warnings);
    }

    #[test]
    fn test_rejects_dotted_local() {
        let err = FallbackOptions::from_json(r#"{"locals":["this.foo"]}"#).unwrap_err();
        assert!(matches!(err, FallbackError::InvalidOptions(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = FallbackOptions::from_json("{").unwrap_err();
        assert!(matches!(err, FallbackError::Json(_)));
    }
}
