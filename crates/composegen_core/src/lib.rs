//! # composegen_core
//!
//! Derives per-service compose manifests from named templates, based on the
//! artifacts a build pass produced.
//!
//! Build outputs are filtered down to services by a configurable mask;
//! prioritized regex rules assign each service a template (and optionally a
//! transform); one manifest is synthesized per service by re-keying the
//! template's single sample entry to the service's name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use composegen_core::{Generator, GeneratorConfig, ManifestWriter};
//!
//! let config: GeneratorConfig = serde_yaml::from_str(r#"
//! output: compose
//! template_dir: templates
//! rules:
//!   auth: { template: hardened }
//!   "*": { template: default }
//! "#).unwrap();
//!
//! let generator = Generator::new(&config).unwrap();
//! let report = generator.run(&[
//!     "services/auth/authservice.js",
//!     "services/payment/paymentservice.js",
//! ]).unwrap();
//! ManifestWriter::write_all(&report).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod rules;
pub mod synth;
pub mod template;
pub mod writer;

pub use config::{GeneratorConfig, RuleConfig, TemplateSource, DEFAULT_SERVICE_MASK};
pub use error::{GenerateError, GenerateResult};
pub use generator::{service_name, GenerateReport, Generator};
pub use loader::TemplateLoader;
pub use rules::{Rule, RuleSet, Transform, TransformError};
pub use synth::{ManifestSynthesizer, RenderedManifest};
pub use template::{Template, TemplateRegistry, SERVICES_KEY};
pub use writer::ManifestWriter;
