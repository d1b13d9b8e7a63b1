//! Per-pass orchestration.
//!
//! A [`Generator`] is constructed once from validated configuration and
//! borrows its template and rule tables read-only across passes. Each call
//! to [`Generator::run`] filters the build's artifact names down to
//! services, resolves a rule per service, and synthesizes one manifest per
//! resolved service, in artifact order. `run` performs no file I/O; the
//! returned report is handed to a [`ManifestWriter`](crate::ManifestWriter)
//! or another persistence layer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, GenerateResult};
use crate::loader::TemplateLoader;
use crate::rules::{Rule, RuleSet};
use crate::synth::{ManifestSynthesizer, RenderedManifest};
use crate::template::TemplateRegistry;

/// Result of one generation pass.
///
/// `service_names()` and `output_paths()` are index-aligned: the same index
/// refers to the same service.
#[derive(Debug)]
pub struct GenerateReport {
    /// Directory the manifests are destined for.
    pub output_dir: PathBuf,
    /// Finalized manifests, in processing order.
    pub manifests: Vec<RenderedManifest>,
}

impl GenerateReport {
    pub fn service_names(&self) -> Vec<&str> {
        self.manifests.iter().map(|m| m.service.as_str()).collect()
    }

    pub fn output_paths(&self) -> Vec<&Path> {
        self.manifests
            .iter()
            .map(|m| m.output_path.as_path())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// Drives rule resolution and manifest synthesis over a build's artifacts.
pub struct Generator {
    mask: Regex,
    rules: RuleSet,
    templates: TemplateRegistry,
    synthesizer: ManifestSynthesizer,
}

impl Generator {
    /// Build a generator from configuration, loading templates and
    /// compiling every pattern. All configuration errors surface here,
    /// before any pass runs.
    pub fn new(config: &GeneratorConfig) -> GenerateResult<Self> {
        config.validate()?;

        let mask = config.mask_regex()?;
        let rules = RuleSet::from_configs(config.rule_entries()?)?;

        let templates = if let Some(sources) = &config.templates {
            TemplateLoader::load_sources(sources)?
        } else if let Some(dir) = &config.template_dir {
            TemplateLoader::load_dir(dir)?
        } else {
            return Err(GenerateError::MissingTemplates);
        };

        Ok(Self::with_parts(mask, rules, templates, &config.output))
    }

    /// Build a generator from in-memory parts, for embedding hosts that
    /// manage their own templates and rules.
    pub fn with_parts(
        mask: Regex,
        rules: RuleSet,
        templates: TemplateRegistry,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mask,
            rules,
            templates,
            synthesizer: ManifestSynthesizer::new(output_dir),
        }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run one generation pass over the build's artifact names.
    ///
    /// Artifacts are filtered by the mask in input order; the first
    /// artifact deriving a given service name wins. Services with no
    /// matching rule are skipped; a synthesis failure aborts the pass.
    pub fn run(&self, artifact_names: &[impl AsRef<str>]) -> GenerateResult<GenerateReport> {
        let mut seen = HashSet::new();
        let mut selected: Vec<(String, &Rule)> = Vec::new();

        for artifact in artifact_names {
            let artifact = artifact.as_ref();
            if !self.mask.is_match(artifact) {
                continue;
            }
            let Some(service) = service_name(artifact) else {
                warn!("artifact `{}` has no service path segment, skipping", artifact);
                continue;
            };
            if !seen.insert(service.clone()) {
                continue;
            }
            match self.rules.resolve(&service) {
                Some(rule) => selected.push((service, rule)),
                None => debug!("no rule matches service `{}`, excluded", service),
            }
        }

        let mut manifests = Vec::with_capacity(selected.len());
        for (service, rule) in selected {
            let manifest = self
                .synthesizer
                .synthesize(&service, rule, &self.templates)?;
            manifests.push(manifest);
        }

        info!("synthesized {} manifest(s)", manifests.len());
        Ok(GenerateReport {
            output_dir: self.synthesizer.output_dir().to_path_buf(),
            manifests,
        })
    }
}

/// Derive a service name from an artifact path: the segment immediately
/// following the leading directory, e.g. `services/auth/authservice.js`
/// names the service `auth`.
pub fn service_name(artifact: &str) -> Option<String> {
    artifact
        .split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
