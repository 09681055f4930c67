//! The invoice upload handler.
//!
//! Reads the current selection, toggles the trigger, sends one request and
//! renders the outcome into the output surface. UI surfaces are traits so the
//! same flow runs against Leptos signals in the browser and fakes in tests.

use serde_json::Value;

use super::upload::{InvoiceResponse, InvoiceTransport, UploadPayload};
use crate::config::messages;
use crate::types::{InvoiceReport, UploadOutcome};
use crate::{BUSY_OPACITY, IDLE_OPACITY, INVOICE_ENDPOINT};

// =============================================================================
// UI surfaces
// =============================================================================

/// The button that starts the upload.
pub trait TriggerControl {
    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
    fn set_opacity(&self, opacity: f64);
}

/// The file input.
pub trait FileSource {
    type File;

    /// Current selection, in selection order.
    fn selected_files(&self) -> Vec<Self::File>;
}

/// Plain-text output area.
pub trait OutputSurface {
    fn set_text(&self, text: &str);
}

/// Blocking user notification.
pub trait Notifier {
    fn alert(&self, message: &str);
}

// =============================================================================
// Busy guard
// =============================================================================

/// Keeps the trigger disabled and dimmed while alive.
///
/// Dropping the guard re-enables the trigger, so every exit path of the
/// handler restores it, unwinding included.
#[must_use = "the trigger is re-enabled as soon as the guard is dropped"]
pub struct BusyGuard<'a, B: TriggerControl> {
    trigger: &'a B,
}

impl<'a, B: TriggerControl> BusyGuard<'a, B> {
    pub fn acquire(trigger: &'a B) -> Self {
        trigger.set_disabled(true);
        trigger.set_opacity(BUSY_OPACITY);
        Self { trigger }
    }
}

impl<B: TriggerControl> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.trigger.set_disabled(false);
        self.trigger.set_opacity(IDLE_OPACITY);
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Render a JSON body with 2-space indentation, keys in received order.
pub fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Binds the UI surfaces to a transport.
pub struct UploadHandler<S, B, O, N, T> {
    files: S,
    trigger: B,
    output: O,
    notifier: N,
    transport: T,
    endpoint: String,
}

impl<S, B, O, N, T> UploadHandler<S, B, O, N, T>
where
    S: FileSource<File = T::File>,
    B: TriggerControl,
    O: OutputSurface,
    N: Notifier,
    T: InvoiceTransport,
{
    pub fn new(files: S, trigger: B, output: O, notifier: N, transport: T) -> Self {
        Self {
            files,
            trigger,
            output,
            notifier,
            transport,
            endpoint: INVOICE_ENDPOINT.to_string(),
        }
    }

    /// Post to another URL than [`INVOICE_ENDPOINT`].
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn trigger(&self) -> &B {
        &self.trigger
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload the current selection and render the result.
    pub async fn process_invoice(&self) -> UploadOutcome {
        let files = self.files.selected_files();
        if files.is_empty() {
            self.notifier.alert(messages::EMPTY_SELECTION);
            return UploadOutcome::Rejected;
        }

        let _busy = BusyGuard::acquire(&self.trigger);
        self.output.set_text(messages::PROCESSING);

        let payload = UploadPayload::from_selection(files);
        log::info!("📤 Uploading {} image(s) to {}", payload.len(), self.endpoint);

        let outcome = self.submit(payload).await;
        match &outcome {
            UploadOutcome::Rendered(body) => {
                let text = render_json(body);
                self.output.set_text(&text);
                match InvoiceReport::from_value(body) {
                    Some(report) => log::info!(
                        "✅ {} invoice(s) read, {} with a total",
                        report.len(),
                        report.with_total()
                    ),
                    None => log::info!("✅ Response rendered"),
                }
            }
            UploadOutcome::HttpError { status_text } => {
                self.output
                    .set_text(&format!("{}{}", messages::HTTP_ERROR_PREFIX, status_text));
                log::warn!("❌ Server rejected upload: {}", status_text);
            }
            UploadOutcome::RequestFailed(err) => {
                self.output
                    .set_text(&format!("{}{}", messages::REQUEST_ERROR_PREFIX, err));
                log::error!("❌ Request failed: {}", err);
            }
            UploadOutcome::Rejected => {}
        }

        outcome
    }

    async fn submit(&self, payload: UploadPayload<T::File>) -> UploadOutcome {
        let response = match self.transport.post(&self.endpoint, payload).await {
            Ok(response) => response,
            Err(e) => return UploadOutcome::RequestFailed(e),
        };

        if !response.ok() {
            return UploadOutcome::HttpError {
                status_text: response.status_text(),
            };
        }

        match response.json().await {
            Ok(body) => UploadOutcome::Rendered(body),
            Err(e) => UploadOutcome::RequestFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upload::SelectedFile;
    use crate::types::{RequestError, RequestResult};
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    // -------------------------------------------------------------------------
    // Fakes
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    struct FakeFile(&'static str);

    impl SelectedFile for FakeFile {
        fn file_name(&self) -> String {
            self.0.to_string()
        }
    }

    struct FakeInput(Vec<FakeFile>);

    impl FileSource for FakeInput {
        type File = FakeFile;

        fn selected_files(&self) -> Vec<FakeFile> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct FakeButton {
        disabled: Cell<bool>,
        opacity: Cell<f64>,
        history: RefCell<Vec<bool>>,
    }

    impl FakeButton {
        fn idle() -> Self {
            let button = Self::default();
            button.opacity.set(1.0);
            button
        }
    }

    impl TriggerControl for FakeButton {
        fn is_disabled(&self) -> bool {
            self.disabled.get()
        }

        fn set_disabled(&self, disabled: bool) {
            self.disabled.set(disabled);
            self.history.borrow_mut().push(disabled);
        }

        fn set_opacity(&self, opacity: f64) {
            self.opacity.set(opacity);
        }
    }

    #[derive(Default)]
    struct FakeOutput {
        writes: RefCell<Vec<String>>,
    }

    impl FakeOutput {
        fn with_text(text: &str) -> Self {
            Self {
                writes: RefCell::new(vec![text.to_string()]),
            }
        }

        fn text(&self) -> String {
            self.writes.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl OutputSurface for FakeOutput {
        fn set_text(&self, text: &str) {
            self.writes.borrow_mut().push(text.to_string());
        }
    }

    #[derive(Default)]
    struct FakeAlert {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for FakeAlert {
        fn alert(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    /// Scripted server reply.
    #[derive(Clone)]
    enum Reply {
        Status { ok: bool, status_text: &'static str, body: &'static str },
        Fail(RequestError),
    }

    struct FakeResponse {
        ok: bool,
        status_text: String,
        body: String,
        body_read: std::rc::Rc<Cell<bool>>,
    }

    impl InvoiceResponse for FakeResponse {
        fn ok(&self) -> bool {
            self.ok
        }

        fn status_text(&self) -> String {
            self.status_text.clone()
        }

        async fn json(self) -> RequestResult<Value> {
            self.body_read.set(true);
            serde_json::from_str(&self.body).map_err(|e| RequestError::InvalidBody(e.to_string()))
        }
    }

    struct FakeServer {
        reply: Reply,
        requests: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
        body_read: std::rc::Rc<Cell<bool>>,
    }

    impl FakeServer {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                requests: RefCell::new(Vec::new()),
                body_read: Default::default(),
            }
        }
    }

    impl InvoiceTransport for FakeServer {
        type File = FakeFile;
        type Response = FakeResponse;

        async fn post(&self, url: &str, payload: UploadPayload<FakeFile>) -> RequestResult<FakeResponse> {
            let parts = payload
                .parts()
                .iter()
                .map(|p| (p.field, p.file.file_name()))
                .collect();
            self.requests.borrow_mut().push((url.to_string(), parts));

            match self.reply.clone() {
                Reply::Status { ok, status_text, body } => Ok(FakeResponse {
                    ok,
                    status_text: status_text.to_string(),
                    body: body.to_string(),
                    body_read: self.body_read.clone(),
                }),
                Reply::Fail(e) => Err(e),
            }
        }
    }

    type TestHandler = UploadHandler<FakeInput, FakeButton, FakeOutput, FakeAlert, FakeServer>;

    fn handler(files: Vec<FakeFile>, reply: Reply) -> TestHandler {
        UploadHandler::new(
            FakeInput(files),
            FakeButton::idle(),
            FakeOutput::default(),
            FakeAlert::default(),
            FakeServer::new(reply),
        )
    }

    fn ok_reply(body: &'static str) -> Reply {
        Reply::Status { ok: true, status_text: "OK", body }
    }

    // -------------------------------------------------------------------------
    // Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_selection_only_alerts() {
        let h = UploadHandler::new(
            FakeInput(Vec::new()),
            FakeButton::idle(),
            FakeOutput::with_text("previous result"),
            FakeAlert::default(),
            FakeServer::new(ok_reply("{}")),
        );

        let outcome = block_on(h.process_invoice());

        assert_eq!(outcome, UploadOutcome::Rejected);
        assert_eq!(
            *h.notifier().messages.borrow(),
            vec!["Por favor, selecione ao menos uma imagem".to_string()]
        );
        assert!(h.transport().requests.borrow().is_empty());
        assert!(h.trigger().history.borrow().is_empty());
        assert!(!h.trigger().is_disabled());
        assert_eq!(h.output().text(), "previous result");
    }

    #[test]
    fn test_success_renders_pretty_json() {
        let h = handler(vec![FakeFile("nota.png")], ok_reply(r#"{"total": 42}"#));

        let outcome = block_on(h.process_invoice());

        assert_eq!(outcome, UploadOutcome::Rendered(json!({"total": 42})));
        assert_eq!(h.output().text(), "{\n  \"total\": 42\n}");
        assert!(!h.trigger().is_disabled());
        assert_eq!(h.trigger().opacity.get(), 1.0);
        assert!(h.notifier().messages.borrow().is_empty());
    }

    #[test]
    fn test_success_keeps_received_key_order() {
        let h = handler(
            vec![FakeFile("nota.png")],
            ok_reply(r#"{"valor_total": "10,00", "arquivo": "nota.png", "b": [1, 2]}"#),
        );

        block_on(h.process_invoice());

        assert_eq!(
            h.output().text(),
            "{\n  \"valor_total\": \"10,00\",\n  \"arquivo\": \"nota.png\",\n  \"b\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn test_processing_placeholder_is_replaced() {
        let h = handler(vec![FakeFile("nota.png")], ok_reply("[]"));

        block_on(h.process_invoice());

        let writes = h.output().writes.borrow().clone();
        assert_eq!(writes, vec!["Processando...".to_string(), "[]".to_string()]);
    }

    #[test]
    fn test_http_error_uses_status_text() {
        let h = handler(
            vec![FakeFile("nota.png")],
            Reply::Status {
                ok: false,
                status_text: "Internal Server Error",
                body: "not json at all",
            },
        );

        let outcome = block_on(h.process_invoice());

        assert_eq!(
            outcome,
            UploadOutcome::HttpError { status_text: "Internal Server Error".into() }
        );
        assert_eq!(h.output().text(), "Erro ao processar a imagem: Internal Server Error");
        assert!(!h.transport().body_read.get());
        assert!(!h.trigger().is_disabled());
        assert_eq!(h.trigger().opacity.get(), 1.0);
    }

    #[test]
    fn test_network_error_is_rendered() {
        let h = handler(
            vec![FakeFile("nota.png")],
            Reply::Fail(RequestError::network("Failed to fetch")),
        );

        let outcome = block_on(h.process_invoice());

        assert!(matches!(outcome, UploadOutcome::RequestFailed(_)));
        assert_eq!(h.output().text(), "Erro na requisição: Error: Failed to fetch");
        assert!(!h.trigger().is_disabled());
    }

    #[test]
    fn test_invalid_body_is_a_request_error() {
        let h = handler(vec![FakeFile("nota.png")], ok_reply("<html>oops</html>"));

        let outcome = block_on(h.process_invoice());

        assert!(matches!(outcome, UploadOutcome::RequestFailed(RequestError::InvalidBody(_))));
        assert!(h.output().text().starts_with("Erro na requisição: Invalid JSON body: "));
        assert!(!h.trigger().is_disabled());
    }

    #[test]
    fn test_disable_enable_always_paired() {
        let replies = vec![
            ok_reply(r#"{"total": 1}"#),
            Reply::Status { ok: false, status_text: "Bad Request", body: "" },
            Reply::Fail(RequestError::network("Failed to fetch")),
            ok_reply("{"),
        ];

        for reply in replies {
            let h = handler(vec![FakeFile("a.png")], reply);
            let before = h.trigger().is_disabled();

            block_on(h.process_invoice());

            assert_eq!(*h.trigger().history.borrow(), vec![true, false]);
            assert_eq!(h.trigger().is_disabled(), before);
        }
    }

    #[test]
    fn test_payload_has_one_part_per_file() {
        let h = handler(vec![FakeFile("a.png"), FakeFile("b.png")], ok_reply("[]"));

        block_on(h.process_invoice());

        let requests = h.transport().requests.borrow();
        assert_eq!(requests.len(), 1);
        let (url, parts) = &requests[0];
        assert_eq!(url, "/api/v1/invoice");
        assert_eq!(
            *parts,
            vec![("file", "a.png".to_string()), ("file", "b.png".to_string())]
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let h = handler(vec![FakeFile("a.png")], ok_reply("[]"))
            .with_endpoint("http://localhost:5000/api/v1/invoice");

        block_on(h.process_invoice());

        assert_eq!(
            h.transport().requests.borrow()[0].0,
            "http://localhost:5000/api/v1/invoice"
        );
    }

    #[test]
    fn test_guard_restores_on_unwind() {
        let button = FakeButton::idle();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _busy = BusyGuard::acquire(&button);
            assert!(button.is_disabled());
            panic!("render failed");
        }));

        assert!(result.is_err());
        assert!(!button.is_disabled());
        assert_eq!(button.opacity.get(), 1.0);
    }
}
