use crate::ast::SourceSpan;
use crate::string::camelize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Runtime helper that resolves a name to a helper, or returns a falsy value.
pub const TRY_LOOKUP_HELPER_MODULE: &str = "ember-this-fallback/try-lookup-helper";
/// Runtime predicate answering whether a name resolves to a component.
pub const IS_COMPONENT_MODULE: &str = "ember-this-fallback/is-component";

/// Registers a module import for the compilation unit and returns the local
/// identifier templates use to reference it.
///
/// Binding the same `(module, export)` pair twice must return the same name.
pub trait ImportBinder {
    fn bind_import(&mut self, module: &str, export: &str, site: SourceSpan, name_hint: &str)
        -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDeclaration {
    pub module: String,
    pub export: String,
    pub local: String,
    /// Location of the first node that required the import.
    #[serde(default)]
    pub site: SourceSpan,
}

/// Deduplicating import table owned by one template transform.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    declarations: Vec<ImportDeclaration>,
    by_key: HashMap<(String, String), usize>,
    reserved: HashSet<String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names imports must never take, e.g. outer locals and template block params.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
    }

    pub fn declarations(&self) -> &[ImportDeclaration] {
        &self.declarations
    }

    pub fn into_declarations(self) -> Vec<ImportDeclaration> {
        self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.declarations.iter().any(|d| d.local == name)
    }

    fn unused_local_like(&self, name_hint: &str) -> String {
        let mut base = camelize(name_hint);
        if !base.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$') {
            base.insert(0, '_');
        }

        let mut name = base.clone();
        let mut suffix = 0usize;
        while self.is_taken(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }
        name
    }
}

impl ImportBinder for ImportTable {
    fn bind_import(
        &mut self,
        module: &str,
        export: &str,
        site: SourceSpan,
        name_hint: &str,
    ) -> String {
        let key = (module.to_string(), export.to_string());
        if let Some(&index) = self.by_key.get(&key) {
            return self.declarations[index].local.clone();
        }

        let local = self.unused_local_like(name_hint);
        tracing::debug!(module, export, local = %local, "bound runtime import");
        self.by_key.insert(key, self.declarations.len());
        self.declarations.push(ImportDeclaration {
            module: module.to_string(),
            export: export.to_string(),
            local: local.clone(),
            site,
        });
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_import_is_idempotent_per_module_and_export() {
        let mut table = ImportTable::new();
        let first = table.bind_import(
            TRY_LOOKUP_HELPER_MODULE,
            "default",
            SourceSpan::synthetic(),
            "try-lookup-helper",
        );
        let second = table.bind_import(
            TRY_LOOKUP_HELPER_MODULE,
            "default",
            SourceSpan::from_coords(4, 2, 4, 10),
            "something-else",
        );

        assert_eq!(first, "tryLookupHelper");
        assert_eq!(first, second);
        assert_eq!(table.declarations().len(), 1);
        assert!(table.declarations()[0].site.is_synthetic());
    }

    #[test]
    fn test_bind_import_avoids_reserved_and_taken_names() {
        let mut table = ImportTable::new();
        table.reserve(["isComponent"]);

        let is_component = table.bind_import(
            IS_COMPONENT_MODULE,
            "default",
            SourceSpan::synthetic(),
            "isComponent",
        );
        assert_eq!(is_component, "isComponent0");

        let other = table.bind_import("some-addon/is-component", "default", SourceSpan::synthetic(), "isComponent");
        assert_eq!(other, "isComponent1");
        assert_eq!(table.declarations().len(), 2);
    }

    #[test]
    fn test_bind_import_sanitizes_leading_digit() {
        let mut table = ImportTable::new();
        let local = table.bind_import("addon/helper", "default", SourceSpan::synthetic(), "2fa");
        assert_eq!(local, "_2fa");
    }
}
