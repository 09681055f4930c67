//! REST API types and messages.
//!
//! The success body of `POST /api/v1/invoice` is a bare JSON array of
//! [`InvoiceEntry`](crate::models::InvoiceEntry); errors are `{"error": "..."}`.

use serde_json::{json, Value};

/// No `file` part in the request.
pub const NO_FILES_SENT: &str = "Nenhum arquivo enviado";

/// Every uploaded file was skipped.
pub const NO_FILE_PROCESSED: &str = "Nenhum arquivo processado com sucesso";

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}
