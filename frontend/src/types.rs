//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **API Types** - Typed view of the invoice endpoint response
//! - **Outcome Types** - What a single upload invocation ended with
//! - **Error Types** - Request failures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// API Response Types
// =============================================================================

/// Fields read from a single invoice.
///
/// Every field is optional: the backend returns `null` for anything it
/// could not find.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    /// Issuer company name
    pub nome_emissor: Option<String>,
    /// Issuer CNPJ
    #[serde(rename = "CNPJ_emissor")]
    pub cnpj_emissor: Option<String>,
    /// Issuer address
    pub endereco_emissor: Option<String>,
    /// Consumer CNPJ or CPF
    #[serde(rename = "CNPJ_CPF_consumidor")]
    pub cnpj_cpf_consumidor: Option<String>,
    /// Issue date
    pub data_emissao: Option<String>,
    /// Invoice number
    pub numero_nota_fiscal: Option<String>,
    /// Invoice series
    pub serie_nota_fiscal: Option<String>,
    /// Total amount as printed
    pub valor_total: Option<String>,
    /// Payment method
    pub forma_pgto: Option<String>,
}

/// One processed image in the endpoint response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEntry {
    /// Original file name
    pub arquivo: String,
    /// Extracted fields
    pub informacoes_nota: InvoiceInfo,
}

/// Successful response of `POST /api/v1/invoice`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceReport(pub Vec<InvoiceEntry>);

impl InvoiceReport {
    /// Interpret a raw response body, if it has the expected shape.
    ///
    /// Rendering never depends on this: the raw value is what gets shown.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries where a total amount was found.
    pub fn with_total(&self) -> usize {
        self.0
            .iter()
            .filter(|e| e.informacoes_nota.valor_total.is_some())
            .count()
    }
}

// =============================================================================
// Outcome Types
// =============================================================================

/// How one invocation of the upload handler ended.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    /// Nothing selected; only the alert was shown.
    Rejected,
    /// 2xx response, body rendered.
    Rendered(Value),
    /// Non-2xx response.
    HttpError {
        /// Status phrase reported by the server
        status_text: String,
    },
    /// The request or the body parse failed.
    RequestFailed(RequestError),
}

impl UploadOutcome {
    /// Whether the handler went past the empty-selection guard.
    pub fn was_submitted(&self) -> bool {
        !matches!(self, UploadOutcome::Rejected)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Request failures surfaced in the output as text.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestError {
    /// The request never produced a response.
    Network {
        /// Error class reported by the runtime (e.g. `TypeError`)
        name: String,
        /// Error message
        message: String,
    },
    /// The payload could not be built.
    Payload(String),
    /// The response body was not valid JSON.
    InvalidBody(String),
}

impl RequestError {
    /// Network failure with the generic `Error` class.
    pub fn network(message: impl Into<String>) -> Self {
        RequestError::Network {
            name: "Error".to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Network { name, message } => write!(f, "{}: {}", name, message),
            RequestError::Payload(msg) => write!(f, "Payload error: {}", msg),
            RequestError::InvalidBody(msg) => write!(f, "Invalid JSON body: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

/// Result type alias for request operations.
pub type RequestResult<T> = Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_deserialization() {
        let body = json!([
            {
                "arquivo": "nota1.png",
                "informacoes_nota": {
                    "nome_emissor": "PADARIA BOM PAO LTDA",
                    "CNPJ_emissor": "12.345.678/0001-90",
                    "endereco_emissor": null,
                    "CNPJ_CPF_consumidor": null,
                    "data_emissao": "01/02/2024",
                    "numero_nota_fiscal": "000123456",
                    "serie_nota_fiscal": "1",
                    "valor_total": "25,90",
                    "forma_pgto": "Dinheiro"
                }
            },
            {
                "arquivo": "nota2.png",
                "informacoes_nota": {}
            }
        ]);

        let report = InvoiceReport::from_value(&body).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.with_total(), 1);
        assert_eq!(
            report.0[0].informacoes_nota.cnpj_emissor.as_deref(),
            Some("12.345.678/0001-90")
        );
        assert_eq!(report.0[1].informacoes_nota, InvoiceInfo::default());
    }

    #[test]
    fn test_report_rejects_other_shapes() {
        assert!(InvoiceReport::from_value(&json!({"total": 42})).is_none());
    }

    #[test]
    fn test_request_error_display() {
        assert_eq!(
            RequestError::network("Failed to fetch").to_string(),
            "Error: Failed to fetch"
        );
        let err = RequestError::Network {
            name: "TypeError".into(),
            message: "NetworkError when attempting to fetch resource.".into(),
        };
        assert_eq!(
            err.to_string(),
            "TypeError: NetworkError when attempting to fetch resource."
        );
    }

    #[test]
    fn test_outcome_submitted() {
        assert!(!UploadOutcome::Rejected.was_submitted());
        assert!(UploadOutcome::HttpError { status_text: "Bad Request".into() }.was_submitted());
    }
}
