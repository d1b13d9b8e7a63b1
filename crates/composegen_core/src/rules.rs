//! Rule table and rule resolution.
//!
//! Rules associate a service-name pattern with a template (plus an optional
//! transform). Resolution is first-match-wins over the table's insertion
//! order, with a catch-all (`.*`) rule as lowest-priority fallback. All
//! patterns compile once, at table construction.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use crate::config::RuleConfig;
use crate::error::{GenerateError, GenerateResult};

/// Errors raised by a transform propagate as-is.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// A document transform attached to a rule. Receives the synthesized
/// document and returns its replacement.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync>;

/// A template assignment for services matching one pattern.
#[derive(Clone)]
pub struct Rule {
    /// Name of the assigned template.
    pub template: String,
    /// Optional post-synthesis transform.
    pub transform: Option<Transform>,
}

impl Rule {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            transform: None,
        }
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Build a rule from its configuration form. A `patch` mapping becomes
    /// a transform that deep-merges the patch into the document.
    pub fn from_config(config: &RuleConfig) -> Self {
        let rule = Self::new(&config.template);
        match &config.patch {
            Some(patch) => {
                let patch = patch.clone();
                rule.with_transform(move |mut document| {
                    deep_merge(&mut document, &patch);
                    Ok(document)
                })
            }
            None => rule,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("template", &self.template)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Deep-merge `patch` into `base`: nested mappings merge per key, anything
/// else replaces the base value.
fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Mapping(base_map), Value::Mapping(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, patch_value),
                    None => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

struct SpecificRule {
    pattern: String,
    regex: Regex,
    rule: Rule,
}

/// An ordered, pre-compiled rule table.
pub struct RuleSet {
    specific: Vec<SpecificRule>,
    catch_all: Option<Rule>,
}

impl RuleSet {
    /// Build a rule set from ordered (pattern, rule) entries.
    ///
    /// The literal pattern `*` is normalized to `.*`; `.*` is the catch-all
    /// and is kept out of the ordered scan. A pattern that fails to compile
    /// is a configuration error, reported here rather than per-service.
    pub fn from_entries<I>(entries: I) -> GenerateResult<Self>
    where
        I: IntoIterator<Item = (String, Rule)>,
    {
        let mut specific = Vec::new();
        let mut catch_all = None;

        for (pattern, rule) in entries {
            let pattern = if pattern == "*" { ".*".to_string() } else { pattern };
            if pattern == ".*" {
                catch_all = Some(rule);
                continue;
            }
            let regex = Regex::new(&pattern).map_err(|source| {
                GenerateError::InvalidRulePattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            specific.push(SpecificRule {
                pattern,
                regex,
                rule,
            });
        }

        Ok(Self {
            specific,
            catch_all,
        })
    }

    /// Build a rule set from configuration entries.
    pub fn from_configs<I>(entries: I) -> GenerateResult<Self>
    where
        I: IntoIterator<Item = (String, RuleConfig)>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(pattern, config)| (pattern, Rule::from_config(&config))),
        )
    }

    /// Resolve the rule for a service name.
    ///
    /// Specific rules are scanned in insertion order and the first match
    /// wins; the catch-all applies when no specific rule matches. `None`
    /// means the service is excluded from manifest generation.
    pub fn resolve(&self, service_name: &str) -> Option<&Rule> {
        for candidate in &self.specific {
            if candidate.regex.is_match(service_name) {
                debug!(
                    "service `{}` matched rule pattern `{}`",
                    service_name, candidate.pattern
                );
                return Some(&candidate.rule);
            }
        }
        self.catch_all.as_ref()
    }

    pub fn has_catch_all(&self) -> bool {
        self.catch_all.is_some()
    }
}
