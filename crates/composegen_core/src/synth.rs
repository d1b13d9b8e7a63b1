//! Manifest synthesis.
//!
//! Specializes a template for one service: the template's document is
//! cloned, its sole sample entry is re-keyed to the service's name, the
//! rule's transform (if any) runs over the result, and the document is
//! serialized with the `: null` fix-up the compose format expects.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use crate::error::{GenerateError, GenerateResult};
use crate::rules::Rule;
use crate::template::{TemplateRegistry, SERVICES_KEY};

/// A finalized manifest for one service.
#[derive(Debug, Clone)]
pub struct RenderedManifest {
    /// Service the manifest was synthesized for.
    pub service: String,
    /// Final document tree, after sample relocation and transform.
    pub document: Value,
    /// Serialized document, ready to write.
    pub content: String,
    /// Destination path under the output directory.
    pub output_path: PathBuf,
}

/// Synthesizes per-service manifests from templates.
pub struct ManifestSynthesizer {
    output_dir: PathBuf,
    null_entry: Regex,
}

impl ManifestSynthesizer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            // Matches a line-final explicit null, e.g. `volumes: null`
            null_entry: Regex::new(r"(?m): null$").unwrap(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Synthesize the manifest for `service_name` from the rule's template.
    ///
    /// The registry's template is never mutated; each call works on a deep
    /// clone, so templates can be shared across services within a pass.
    pub fn synthesize(
        &self,
        service_name: &str,
        rule: &Rule,
        templates: &TemplateRegistry,
    ) -> GenerateResult<RenderedManifest> {
        let template = templates
            .get(&rule.template)
            .ok_or_else(|| GenerateError::TemplateNotFound(rule.template.clone()))?;

        let mut document = template.document.clone();
        let services = document
            .get_mut(SERVICES_KEY)
            .and_then(Value::as_mapping_mut)
            .ok_or_else(|| GenerateError::MalformedTemplate {
                template: template.name.clone(),
                message: format!("missing `{SERVICES_KEY}` mapping"),
            })?;

        let entries = std::mem::take(services);
        if entries.len() != 1 {
            return Err(GenerateError::MalformedTemplate {
                template: template.name.clone(),
                message: format!(
                    "expected exactly one sample entry under `{SERVICES_KEY}`, found {}",
                    entries.len()
                ),
            });
        }
        for (sample_key, sample_value) in entries {
            debug!(
                "renaming sample entry `{}` to `{}`",
                sample_key.as_str().unwrap_or("?"),
                service_name
            );
            services.insert(Value::from(service_name), sample_value);
        }

        let document = match &rule.transform {
            Some(transform) => {
                transform(document).map_err(|source| GenerateError::Transform {
                    service: service_name.to_string(),
                    source,
                })?
            }
            None => document,
        };

        let rendered = serde_yaml::to_string(&document)?;
        let content = self.null_entry.replace_all(&rendered, ":").into_owned();
        let output_path = self.output_dir.join(format!("{service_name}.yml"));

        Ok(RenderedManifest {
            service: service_name.to_string(),
            document,
            content,
            output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    fn registry(entries: &[(&str, &str)]) -> TemplateRegistry {
        entries
            .iter()
            .map(|(name, yaml)| Template::new(*name, serde_yaml::from_str(yaml).unwrap()))
            .collect()
    }

    #[test]
    fn test_sample_entry_renamed_for_service() {
        let templates = registry(&[("default", "services: {placeholder: {image: nginx}}")]);
        let synth = ManifestSynthesizer::new("out");

        let manifest = synth
            .synthesize("auth", &Rule::new("default"), &templates)
            .unwrap();

        let services = manifest.document[SERVICES_KEY].as_mapping().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(
            manifest.document[SERVICES_KEY]["auth"]["image"],
            Value::from("nginx")
        );
        assert_eq!(manifest.output_path, PathBuf::from("out/auth.yml"));
    }

    #[test]
    fn test_templates_are_not_mutated_across_calls() {
        let templates = registry(&[("default", "services: {placeholder: {image: nginx}}")]);
        let synth = ManifestSynthesizer::new("out");
        let rule = Rule::new("default");

        synth.synthesize("x", &rule, &templates).unwrap();
        synth.synthesize("x", &rule, &templates).unwrap();
        let manifest = synth.synthesize("y", &rule, &templates).unwrap();

        assert_eq!(
            manifest.document[SERVICES_KEY]["y"]["image"],
            Value::from("nginx")
        );
        // The registry still holds the pristine sample entry.
        let original = templates.get("default").unwrap();
        assert!(original.document[SERVICES_KEY]["placeholder"].is_mapping());
    }

    #[test]
    fn test_missing_template_propagates() {
        let templates = registry(&[]);
        let synth = ManifestSynthesizer::new("out");

        let result = synth.synthesize("auth", &Rule::new("ghost"), &templates);
        assert!(matches!(result, Err(GenerateError::TemplateNotFound(name)) if name == "ghost"));
    }

    #[test]
    fn test_empty_sample_collection_is_malformed() {
        let templates = registry(&[("default", "services: {}")]);
        let synth = ManifestSynthesizer::new("out");

        let result = synth.synthesize("auth", &Rule::new("default"), &templates);
        assert!(matches!(
            result,
            Err(GenerateError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_multiple_sample_entries_are_malformed() {
        let templates = registry(&[(
            "default",
            "services: {a: {image: one}, b: {image: two}}",
        )]);
        let synth = ManifestSynthesizer::new("out");

        let result = synth.synthesize("auth", &Rule::new("default"), &templates);
        assert!(matches!(
            result,
            Err(GenerateError::MalformedTemplate { template, .. }) if template == "default"
        ));
    }

    #[test]
    fn test_transform_output_replaces_document() {
        let templates = registry(&[("default", "services: {placeholder: {image: nginx}}")]);
        let synth = ManifestSynthesizer::new("out");
        let rule = Rule::new("default").with_transform(|mut document| {
            let map = document.as_mapping_mut().unwrap();
            map.insert(Value::from("version"), Value::from("3.9"));
            Ok(document)
        });

        let manifest = synth.synthesize("auth", &rule, &templates).unwrap();
        assert_eq!(manifest.document["version"], Value::from("3.9"));
        assert!(manifest.document[SERVICES_KEY]["auth"].is_mapping());
    }

    #[test]
    fn test_transform_error_propagates() {
        let templates = registry(&[("default", "services: {placeholder: {image: nginx}}")]);
        let synth = ManifestSynthesizer::new("out");
        let rule = Rule::new("default").with_transform(|_| Err("boom".into()));

        let result = synth.synthesize("auth", &rule, &templates);
        assert!(matches!(
            result,
            Err(GenerateError::Transform { service, .. }) if service == "auth"
        ));
    }

    #[test]
    fn test_null_values_render_as_bare_keys() {
        let templates = registry(&[("default", "services: {placeholder: {image: nginx}}")]);
        let synth = ManifestSynthesizer::new("out");
        let rule = Rule::new("default").with_transform(|mut document| {
            let map = document.as_mapping_mut().unwrap();
            map.insert(Value::from("volumes"), Value::Null);
            Ok(document)
        });

        let manifest = synth.synthesize("auth", &rule, &templates).unwrap();
        assert!(manifest.content.contains("volumes:\n") || manifest.content.ends_with("volumes:"));
        assert!(!manifest.content.contains(": null"));
    }
}
