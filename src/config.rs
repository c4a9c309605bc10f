//! Configuration loaded from `~/.config/glosstrack/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analysis::{Analyzer, AutoAnnotator, MapperConfig};
use crate::render::{KindPriority, Renderer};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub analysis: AnalysisConfig,
    pub ingest: IngestConfig,
}

/// `[render]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Nesting order for identical or crossing ranges, outermost first
    pub kind_priority: KindPriority,
}

/// `[analysis]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub mapper: MapperConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mapper: MapperConfig::default(),
        }
    }
}

/// `[ingest]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Skip detection and treat every track as this language
    pub language: Option<String>,
}

impl Config {
    /// Load from `~/.config/glosstrack/config.toml`.
    ///
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.render.kind_priority.clone())
    }

    /// Auto-annotator over `analyzer`, or `None` when analysis is disabled
    pub fn annotator<'a>(&self, analyzer: &'a dyn Analyzer) -> Option<AutoAnnotator<'a>> {
        self.analysis
            .enabled
            .then(|| AutoAnnotator::new(analyzer, self.analysis.mapper.clone()))
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glosstrack")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::AnnotationKind;

    #[test]
    fn parse_empty_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.analysis.enabled);
        assert_eq!(config.analysis.mapper.placeholder, "*");
        assert!(config.ingest.language.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[render]
kind_priority = ["highlight", "ruby"]

[analysis]
enabled = false
skip_parts_of_speech = ["記号"]

[ingest]
language = "ja"
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(
            config.render.kind_priority,
            KindPriority::new(vec![AnnotationKind::Highlight, AnnotationKind::Ruby])
        );
        assert!(!config.analysis.enabled);
        assert_eq!(config.analysis.mapper.skip_parts_of_speech, vec!["記号"]);
        assert_eq!(config.analysis.mapper.placeholder, "*");
        assert_eq!(config.ingest.language.as_deref(), Some("ja"));
    }

    /// Reads every CJK ideograph as "カンジ" and tags it with `pos`
    struct IdeographAnalyzer {
        pos: &'static str,
    }

    impl Analyzer for IdeographAnalyzer {
        fn language(&self) -> &str {
            "ja"
        }

        fn position_base(&self) -> crate::analysis::PositionBase {
            crate::analysis::PositionBase::Zero
        }

        fn tokenize(&self, text: &str) -> crate::Result<Vec<crate::analysis::Token>> {
            Ok(text
                .chars()
                .enumerate()
                .map(|(position, c)| crate::analysis::Token {
                    position,
                    surface_form: c.to_string(),
                    basic_form: Some(c.to_string()),
                    reading: Some("カンジ".to_string()),
                    part_of_speech: self.pos.to_string(),
                })
                .collect())
        }
    }

    #[test]
    fn disabled_analysis_gives_no_annotator() {
        let analyzer = IdeographAnalyzer { pos: "名詞" };
        let config = Config::from_toml_str("[analysis]\nenabled = false").unwrap();
        assert!(config.annotator(&analyzer).is_none());
        assert!(Config::default().annotator(&analyzer).is_some());
    }

    #[test]
    fn configured_mapper_reaches_the_annotator() {
        let analyzer = IdeographAnalyzer { pos: "固有名詞" };

        let default = Config::default().annotator(&analyzer).unwrap();
        let text = default.annotate_or_plain("漢字", "ja");
        assert_eq!(text.get_kind_in_range(&AnnotationKind::Ruby, 0, 2).len(), 2);

        let config =
            Config::from_toml_str("[analysis]\nskip_parts_of_speech = [\"固有名詞\"]").unwrap();
        let skipping = config.annotator(&analyzer).unwrap();
        let text = skipping.annotate_or_plain("漢字", "ja");
        assert!(text.annotations().is_empty());

        let config = Config::from_toml_str("[analysis]\nplaceholder = \"漢\"").unwrap();
        let text = config
            .annotator(&analyzer)
            .unwrap()
            .annotate_or_plain("漢字", "ja");
        assert_eq!(text.get_kind_in_range(&AnnotationKind::Ruby, 0, 2).len(), 1);
    }

    #[test]
    fn configured_priority_reaches_the_renderer() {
        use crate::render::render_plain;
        use crate::text::{AnnotatedText, AnnotationData};

        let text = AnnotatedText::new("ab")
            .add_annotation(0, 2, AnnotationData::Ruby("r".into()))
            .unwrap()
            .add_annotation(0, 2, AnnotationData::Lemma("l".into()))
            .unwrap();
        let config = Config::from_toml_str("[render]\nkind_priority = [\"lemma\", \"ruby\"]").unwrap();
        let tree = config.renderer().render(&text);
        match &tree[0] {
            crate::render::RenderNode::Wrap { annotation, .. } => {
                assert_eq!(annotation.kind(), AnnotationKind::Lemma);
            }
            other => panic!("expected a wrapper, got {other:?}"),
        }
        assert_eq!(render_plain(&tree), "ab");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml_str("[analysis]\nenabled = \"yes\"").is_err());
    }

    #[test]
    fn load_from_missing_path_fails() {
        let err = Config::load_from(Path::new("/nonexistent/glosstrack.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        assert!(config_path().ends_with("glosstrack/config.toml"));
    }
}
