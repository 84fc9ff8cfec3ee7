mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AnnotatorProvider, AnnotatorSettings, PipelineSettings, ServerSettings, Settings,
    SettingsError, SplitterMode, SplitterSettings,
};
