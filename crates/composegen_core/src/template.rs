//! Template model and registry.
//!
//! A template is a parsed compose document whose `services` mapping holds a
//! single sample entry. The registry keys templates by name; registering a
//! duplicate name replaces the earlier entry.

use std::collections::HashMap;

use serde_yaml::Value;

/// Top-level key holding the per-service entries in a compose document.
pub const SERVICES_KEY: &str = "services";

/// A named, pre-parsed manifest template.
#[derive(Debug, Clone)]
pub struct Template {
    /// Unique template name (file stem when loaded from a directory).
    pub name: String,
    /// Parsed document tree.
    pub document: Value,
}

impl Template {
    pub fn new(name: impl Into<String>, document: Value) -> Self {
        Self {
            name: name.into(),
            document,
        }
    }
}

/// Registry of available templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Last-seen wins on duplicate names.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Check if a template exists.
    pub fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// List all registered templates.
    pub fn list(&self) -> Vec<&Template> {
        self.templates.values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<Template> for TemplateRegistry {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        let mut registry = Self::new();
        for template in iter {
            registry.register(template);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_register_last_wins() {
        let mut registry = TemplateRegistry::new();
        registry.register(Template::new("default", doc("services: {a: {image: one}}")));
        registry.register(Template::new("default", doc("services: {a: {image: two}}")));

        let tmpl = registry.get("default").unwrap();
        assert_eq!(
            tmpl.document[SERVICES_KEY]["a"]["image"],
            Value::from("two")
        );
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_missing_template() {
        let registry = TemplateRegistry::new();
        assert!(!registry.exists("nope"));
        assert!(registry.get("nope").is_none());
    }
}
