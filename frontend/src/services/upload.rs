//! HTTP service uploading invoice images to the backend.
//!
//! The handler only sees [`InvoiceTransport`]; [`GlooTransport`] is the
//! browser implementation on top of `gloo-net` and `FormData`.

use gloo_net::http::{Request, Response};
use serde_json::Value;
use web_sys::{File, FormData};

use crate::types::{RequestError, RequestResult};
use crate::UPLOAD_FIELD;

// =============================================================================
// Payload
// =============================================================================

/// A file picked by the user.
pub trait SelectedFile {
    /// Name sent as the multipart filename.
    fn file_name(&self) -> String;
}

impl SelectedFile for File {
    fn file_name(&self) -> String {
        self.name()
    }
}

/// One multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadPart<F> {
    pub field: &'static str,
    pub file: F,
}

/// Multipart body: every selected file under [`UPLOAD_FIELD`], in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload<F> {
    parts: Vec<PayloadPart<F>>,
}

impl<F: SelectedFile> UploadPayload<F> {
    /// Build the payload from the current selection.
    pub fn from_selection(files: impl IntoIterator<Item = F>) -> Self {
        let parts = files
            .into_iter()
            .map(|file| PayloadPart { field: UPLOAD_FIELD, file })
            .collect();
        Self { parts }
    }

    pub fn parts(&self) -> &[PayloadPart<F>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// File names in part order.
    pub fn file_names(&self) -> Vec<String> {
        self.parts.iter().map(|p| p.file.file_name()).collect()
    }
}

impl UploadPayload<File> {
    /// Convert to a browser `FormData`.
    pub fn to_form_data(&self) -> RequestResult<FormData> {
        let form_data = FormData::new()
            .map_err(|e| RequestError::Payload(format!("Failed to create FormData: {:?}", e)))?;

        for part in &self.parts {
            form_data
                .append_with_blob_and_filename(part.field, &part.file, &part.file.name())
                .map_err(|e| RequestError::Payload(format!("Failed to append file: {:?}", e)))?;
        }

        Ok(form_data)
    }
}

// =============================================================================
// Transport
// =============================================================================

/// A response whose status is known but whose body is not read yet.
#[allow(async_fn_in_trait)]
pub trait InvoiceResponse {
    /// Status is in the 2xx range.
    fn ok(&self) -> bool;

    /// Reason phrase sent with the status.
    fn status_text(&self) -> String;

    /// Read and parse the body as JSON.
    async fn json(self) -> RequestResult<Value>;
}

/// Sends one upload payload to the invoice endpoint.
#[allow(async_fn_in_trait)]
pub trait InvoiceTransport {
    type File: SelectedFile;
    type Response: InvoiceResponse;

    /// Issue a single `POST`; no retries.
    async fn post(&self, url: &str, payload: UploadPayload<Self::File>) -> RequestResult<Self::Response>;
}

/// Browser transport backed by `fetch` through `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl InvoiceResponse for Response {
    fn ok(&self) -> bool {
        Response::ok(self)
    }

    fn status_text(&self) -> String {
        Response::status_text(self)
    }

    async fn json(self) -> RequestResult<Value> {
        Response::json::<Value>(&self).await.map_err(request_error)
    }
}

impl InvoiceTransport for GlooTransport {
    type File = File;
    type Response = Response;

    async fn post(&self, url: &str, payload: UploadPayload<File>) -> RequestResult<Response> {
        let form_data = payload.to_form_data()?;

        let request = Request::post(url).body(form_data).map_err(request_error)?;

        request.send().await.map_err(request_error)
    }
}

/// Map `gloo-net` errors, keeping the JS error class and message.
fn request_error(err: gloo_net::Error) -> RequestError {
    match err {
        gloo_net::Error::JsError(js) => RequestError::Network {
            name: js.name,
            message: js.message,
        },
        gloo_net::Error::SerdeError(e) => RequestError::InvalidBody(e.to_string()),
        other => RequestError::network(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct NamedFile(&'static str);

    impl SelectedFile for NamedFile {
        fn file_name(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_payload_keeps_selection_order() {
        let payload = UploadPayload::from_selection(vec![NamedFile("a.png"), NamedFile("b.png")]);

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.file_names(), vec!["a.png", "b.png"]);
        assert!(payload.parts().iter().all(|p| p.field == "file"));
    }

    #[test]
    fn test_payload_from_empty_selection() {
        let payload = UploadPayload::<NamedFile>::from_selection(Vec::new());
        assert!(payload.is_empty());
    }
}
