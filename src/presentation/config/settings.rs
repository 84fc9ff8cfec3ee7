use serde::Deserialize;

use crate::infrastructure::text_processing::TokenWindowSplitter;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub annotator: AnnotatorSettings,
    pub splitter: SplitterSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorSettings {
    pub provider: AnnotatorProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotatorProvider {
    Generative,
    Classifier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitterSettings {
    pub mode: SplitterMode,
    pub window_tokens: usize,
    pub tokenizer_model: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterMode {
    Paragraph,
    TokenWindow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub concurrency: usize,
}

const DEFAULT_GENERATIVE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_CLASSIFIER_MODEL: &str = "dmis-lab/biobert-base-cased-v1.1";
const DEFAULT_CONCURRENCY: usize = 4;

impl Settings {
    /// Builds settings from environment variables, with defaults suitable for
    /// local development.
    pub fn from_env() -> Result<Self, SettingsError> {
        let provider = match std::env::var("ANNOTATOR_PROVIDER") {
            Ok(value) => AnnotatorProvider::try_from(value).map_err(SettingsError::Invalid)?,
            Err(_) => AnnotatorProvider::Generative,
        };

        let model = std::env::var("ANNOTATOR_MODEL").unwrap_or_else(|_| {
            match provider {
                AnnotatorProvider::Generative => DEFAULT_GENERATIVE_MODEL,
                AnnotatorProvider::Classifier => DEFAULT_CLASSIFIER_MODEL,
            }
            .to_string()
        });

        // Paragraph units for the generative backend, fixed token windows for
        // the classifier, unless overridden.
        let mode = match std::env::var("SPLITTER_MODE") {
            Ok(value) => SplitterMode::try_from(value).map_err(SettingsError::Invalid)?,
            Err(_) => match provider {
                AnnotatorProvider::Generative => SplitterMode::Paragraph,
                AnnotatorProvider::Classifier => SplitterMode::TokenWindow,
            },
        };

        let tokenizer_model = std::env::var("TOKENIZER_MODEL").ok().or_else(|| {
            matches!(mode, SplitterMode::TokenWindow).then(|| model.clone())
        });

        Ok(Self {
            server: ServerSettings {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            annotator: AnnotatorSettings {
                provider,
                model,
                api_key: std::env::var("ANNOTATOR_API_KEY")
                    .or_else(|_| std::env::var("OPENAI_API_KEY"))
                    .ok(),
                base_url: std::env::var("ANNOTATOR_BASE_URL").ok(),
            },
            splitter: SplitterSettings {
                mode,
                window_tokens: std::env::var("WINDOW_TOKENS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(TokenWindowSplitter::DEFAULT_WINDOW_TOKENS),
                tokenizer_model,
            },
            pipeline: PipelineSettings {
                concurrency: std::env::var("ANNOTATION_CONCURRENCY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CONCURRENCY),
            },
        })
    }
}

impl TryFrom<String> for AnnotatorProvider {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "generative" => Ok(Self::Generative),
            "classifier" => Ok(Self::Classifier),
            other => Err(format!(
                "Invalid annotator provider: {}. Expected: generative or classifier",
                other
            )),
        }
    }
}

impl TryFrom<String> for SplitterMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "paragraph" => Ok(Self::Paragraph),
            "token_window" | "tokenwindow" => Ok(Self::TokenWindow),
            other => Err(format!(
                "Invalid splitter mode: {}. Expected: paragraph or token_window",
                other
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0}")]
    Invalid(String),
}
