use thiserror::Error;

/// Failure taxonomy shared by every pipeline stage.
///
/// Each variant carries a technical detail for logs; `user_message` gives the
/// short notification shown to the person who uploaded the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Carries the upstream message verbatim when the service provided one.
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Formato de arquivo não suportado. Use PDF ou Word (doc/docx).";
pub const DECODE_FAILURE_MESSAGE: &str = "Erro ao processar o arquivo. Tente novamente.";
pub const INVALID_INPUT_MESSAGE: &str = "Nenhum texto disponível para otimizar.";
pub const GENERIC_UPSTREAM_MESSAGE: &str = "Ocorreu um erro ao processar sua requisição.";
pub const RENDER_FAILURE_MESSAGE: &str = "Erro ao gerar o PDF otimizado. Tente novamente.";
pub const CONFIGURATION_MESSAGE: &str = "Configuração de API inválida no servidor.";

impl PipelineError {
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::UnsupportedFormat(_) => UNSUPPORTED_FORMAT_MESSAGE.to_string(),
            PipelineError::DecodeFailure(_) => DECODE_FAILURE_MESSAGE.to_string(),
            PipelineError::InvalidInput(_) => INVALID_INPUT_MESSAGE.to_string(),
            PipelineError::UpstreamError(msg) if !msg.trim().is_empty() => msg.clone(),
            PipelineError::UpstreamError(_) => GENERIC_UPSTREAM_MESSAGE.to_string(),
            PipelineError::RenderFailure(_) => RENDER_FAILURE_MESSAGE.to_string(),
            PipelineError::ConfigurationError(_) => CONFIGURATION_MESSAGE.to_string(),
        }
    }
}
