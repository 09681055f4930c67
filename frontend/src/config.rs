//! Application configuration.
//!
//! Centralized configuration for the Invoice Reader frontend.
//! The page is served by the backend, so the endpoint is a same-origin path.

/// Invoice processing endpoint.
pub const INVOICE_ENDPOINT: &str = "/api/v1/invoice";

/// Multipart field name repeated once per selected image.
pub const UPLOAD_FIELD: &str = "file";

/// Trigger opacity while a request is in flight.
pub const BUSY_OPACITY: f64 = 0.5;

/// Trigger opacity when idle.
pub const IDLE_OPACITY: f64 = 1.0;

/// User-facing messages (pt-BR).
pub mod messages {
    /// Alert shown when the handler runs with nothing selected.
    pub const EMPTY_SELECTION: &str = "Por favor, selecione ao menos uma imagem";

    /// Placeholder written to the output while the request runs.
    pub const PROCESSING: &str = "Processando...";

    /// Prefix for non-2xx responses, followed by the status text.
    pub const HTTP_ERROR_PREFIX: &str = "Erro ao processar a imagem: ";

    /// Prefix for transport or body parse failures, followed by the error.
    pub const REQUEST_ERROR_PREFIX: &str = "Erro na requisição: ";
}
