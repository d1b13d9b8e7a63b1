//! Template loading.
//!
//! I/O collaborator of the synthesis core: reads templates from a directory
//! scan or from configured inline/path sources and parses them into
//! documents. The core itself only ever sees the resulting registry.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::TemplateSource;
use crate::error::{GenerateError, GenerateResult};
use crate::template::{Template, TemplateRegistry};

/// Template loader.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load every file in `dir` (one level deep) as a template. The
    /// template name is the file stem, so `templates/worker.yml` registers
    /// as `worker`. Duplicate stems are last-seen-wins.
    pub fn load_dir(dir: &Path) -> GenerateResult<TemplateRegistry> {
        let mut registry = TemplateRegistry::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let template = Self::parse_file(&name, path)?;
            info!("loaded template `{}` from {:?}", name, path);
            registry.register(template);
        }

        Ok(registry)
    }

    /// Load templates from configured sources. Inline text takes precedence
    /// over a path within one entry; an entry with neither is skipped.
    pub fn load_sources(sources: &[TemplateSource]) -> GenerateResult<TemplateRegistry> {
        let mut registry = TemplateRegistry::new();

        for source in sources {
            if let Some(inline) = &source.inline {
                let template = Self::parse_text(&source.name, inline)?;
                debug!("loaded inline template `{}`", source.name);
                registry.register(template);
            } else if let Some(path) = &source.path {
                let template = Self::parse_file(&source.name, path)?;
                debug!("loaded template `{}` from {:?}", source.name, path);
                registry.register(template);
            } else {
                warn!(
                    "template `{}` has neither `inline` nor `path`, skipping",
                    source.name
                );
            }
        }

        Ok(registry)
    }

    fn parse_file(name: &str, path: &Path) -> GenerateResult<Template> {
        let content = fs::read_to_string(path)?;
        Self::parse_text(name, &content)
    }

    fn parse_text(name: &str, content: &str) -> GenerateResult<Template> {
        let document = serde_yaml::from_str(content).map_err(|source| {
            GenerateError::TemplateParse {
                name: name.to_string(),
                source,
            }
        })?;
        Ok(Template::new(name, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_dir_uses_file_stems() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("default.yml"),
            "services:\n  app:\n    image: nginx\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("worker.yaml"),
            "services:\n  app:\n    image: worker\n",
        )
        .unwrap();

        let registry = TemplateLoader::load_dir(temp.path()).unwrap();
        assert!(registry.exists("default"));
        assert!(registry.exists("worker"));
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_load_dir_rejects_unparseable_template() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bad.yml"), "services: [unclosed").unwrap();

        let result = TemplateLoader::load_dir(temp.path());
        assert!(matches!(
            result,
            Err(GenerateError::TemplateParse { name, .. }) if name == "bad"
        ));
    }

    #[test]
    fn test_inline_takes_precedence_and_duplicates_override() {
        let sources = vec![
            TemplateSource {
                name: "default".to_string(),
                path: None,
                inline: Some("services: {app: {image: first}}".to_string()),
            },
            TemplateSource {
                name: "default".to_string(),
                path: None,
                inline: Some("services: {app: {image: second}}".to_string()),
            },
        ];

        let registry = TemplateLoader::load_sources(&sources).unwrap();
        let template = registry.get("default").unwrap();
        assert_eq!(
            template.document["services"]["app"]["image"],
            serde_yaml::Value::from("second")
        );
    }

    #[test]
    fn test_source_without_content_is_skipped() {
        let sources = vec![TemplateSource {
            name: "empty".to_string(),
            path: None,
            inline: None,
        }];

        let registry = TemplateLoader::load_sources(&sources).unwrap();
        assert!(registry.is_empty());
    }
}
