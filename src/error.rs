use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhiloError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    ExportRender(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<PhiloError>,
    },
}

impl PhiloError {
    /// Short remediation line shown under the error, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InputValidation(_) => Some("Write your idea, argument, or paradox first."),
            Self::Http(e) if e.is_timeout() => {
                Some("The model took too long to answer. Raise --timeout-secs or try again.")
            }
            Self::Http(_) => Some("Check your network connection and try again."),
            Self::Api(msg) if msg.contains("401") => {
                Some("Check that OPENAI_API_KEY holds a valid key.")
            }
            Self::Api(msg) if msg.contains("429") => {
                Some("Rate limit or quota reached. Wait a moment before generating again.")
            }
            Self::ExportRender(msg) if msg.contains("cannot be encoded") => {
                Some("Use --substitute-unsupported to replace such characters with '?'.")
            }
            Self::ExportRender(msg) if msg.contains("nothing to export") => {
                Some("Generate at least one concept before exporting.")
            }
            Self::Context { source, .. } => source.hint(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PhiloError>;
