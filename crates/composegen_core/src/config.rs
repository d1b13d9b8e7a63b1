//! Generator configuration surface.
//!
//! Mirrors the options recognized by the host build tool: an output
//! directory, exactly one template source (inline list or directory), an
//! artifact mask, and an ordered rule table. All validation happens up
//! front, before any build pass runs.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{GenerateError, GenerateResult};

/// Default mask recognizing service artifacts among build outputs.
pub const DEFAULT_SERVICE_MASK: &str = r"^services/.*/.*service\.js$";

/// Template name used by the default catch-all rule.
pub const DEFAULT_TEMPLATE_NAME: &str = "default";

/// One entry of the `templates` list: a named template backed by either
/// inline YAML text or a file path.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSource {
    pub name: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub inline: Option<String>,
}

/// One entry of the `rules` table.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Name of the template assigned to matching services.
    pub template: String,
    /// Optional mapping deep-merged into the synthesized document.
    #[serde(default)]
    pub patch: Option<Value>,
}

/// Generator configuration, deserializable from a YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Directory receiving the generated manifests.
    pub output: PathBuf,
    /// Inline template list. Mutually exclusive with `template_dir`.
    #[serde(default)]
    pub templates: Option<Vec<TemplateSource>>,
    /// Directory scanned for template files. Mutually exclusive with `templates`.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    /// Text encoding of template files. Only utf-8 is supported.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Regex selecting service artifacts among build outputs.
    #[serde(default)]
    pub mask: Option<String>,
    /// Ordered pattern -> rule table. YAML mappings preserve insertion
    /// order, which determines rule priority.
    #[serde(default)]
    pub rules: Option<Mapping>,
}

impl GeneratorConfig {
    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> GenerateResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration. Fails fast on any inconsistency.
    pub fn validate(&self) -> GenerateResult<()> {
        match (&self.templates, &self.template_dir) {
            (None, None) => return Err(GenerateError::MissingTemplates),
            (Some(_), Some(_)) => return Err(GenerateError::TemplatesConflict),
            _ => {}
        }

        if let Some(encoding) = &self.encoding {
            if !matches!(encoding.to_ascii_lowercase().as_str(), "utf8" | "utf-8") {
                return Err(GenerateError::UnsupportedEncoding(encoding.clone()));
            }
        }

        Ok(())
    }

    /// Compile the artifact mask, falling back to [`DEFAULT_SERVICE_MASK`].
    pub fn mask_regex(&self) -> GenerateResult<Regex> {
        let mask = self.mask.as_deref().unwrap_or(DEFAULT_SERVICE_MASK);
        Regex::new(mask).map_err(|source| GenerateError::InvalidMask {
            mask: mask.to_string(),
            source,
        })
    }

    /// Ordered (pattern, rule) pairs, defaulting to a single catch-all
    /// pointing at the `default` template.
    pub fn rule_entries(&self) -> GenerateResult<Vec<(String, RuleConfig)>> {
        let Some(rules) = &self.rules else {
            return Ok(vec![(
                ".*".to_string(),
                RuleConfig {
                    template: DEFAULT_TEMPLATE_NAME.to_string(),
                    patch: None,
                },
            )]);
        };

        let mut entries = Vec::with_capacity(rules.len());
        for (key, value) in rules {
            let pattern: String = serde_yaml::from_value(key.clone())?;
            let rule: RuleConfig = serde_yaml::from_value(value.clone())?;
            entries.push((pattern, rule));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_a_template_source() {
        let config: GeneratorConfig = serde_yaml::from_str("output: out").unwrap();
        assert!(matches!(
            config.validate(),
            Err(GenerateError::MissingTemplates)
        ));
    }

    #[test]
    fn test_rejects_both_template_sources() {
        let config: GeneratorConfig = serde_yaml::from_str(
            r#"
output: out
template_dir: templates
templates:
  - name: default
    inline: "services: {app: {image: nginx}}"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(GenerateError::TemplatesConflict)
        ));
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        let config: GeneratorConfig = serde_yaml::from_str(
            "output: out\ntemplate_dir: templates\nencoding: latin1",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(GenerateError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_default_rules_are_catch_all() {
        let config: GeneratorConfig =
            serde_yaml::from_str("output: out\ntemplate_dir: templates").unwrap();
        let entries = config.rule_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, ".*");
        assert_eq!(entries[0].1.template, "default");
    }

    #[test]
    fn test_rule_entries_preserve_order() {
        let config: GeneratorConfig = serde_yaml::from_str(
            r#"
output: out
template_dir: templates
rules:
  auth: {template: A}
  "svc-.*": {template: B}
  "*": {template: default}
"#,
        )
        .unwrap();
        let entries = config.rule_entries().unwrap();
        let patterns: Vec<_> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(patterns, vec!["auth", "svc-.*", "*"]);
    }

    #[test]
    fn test_default_mask_matches_service_artifacts() {
        let config: GeneratorConfig =
            serde_yaml::from_str("output: out\ntemplate_dir: templates").unwrap();
        let mask = config.mask_regex().unwrap();
        assert!(mask.is_match("services/auth/authservice.js"));
        assert!(!mask.is_match("vendor/lib.js"));
    }

    #[test]
    fn test_invalid_mask_fails_fast() {
        let config: GeneratorConfig =
            serde_yaml::from_str("output: out\ntemplate_dir: templates\nmask: '['").unwrap();
        assert!(matches!(
            config.mask_regex(),
            Err(GenerateError::InvalidMask { .. })
        ));
    }
}
