//! Invoice image upload form.
//!
//! Wires the upload handler to Leptos signals: the button state and the
//! output text live in signals, the selection is read from the file input.

use leptos::*;

use crate::services::{
    FileSource, GlooTransport, Notifier, OutputSurface, TriggerControl, UploadHandler,
};
use crate::IDLE_OPACITY;

// =============================================================================
// Signal-backed surfaces
// =============================================================================

/// Trigger button state.
#[derive(Clone, Copy)]
pub struct SignalTrigger {
    disabled: RwSignal<bool>,
    opacity: RwSignal<f64>,
}

impl SignalTrigger {
    pub fn new() -> Self {
        Self {
            disabled: create_rw_signal(false),
            opacity: create_rw_signal(IDLE_OPACITY),
        }
    }
}

impl Default for SignalTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerControl for SignalTrigger {
    fn is_disabled(&self) -> bool {
        self.disabled.get_untracked()
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    fn set_opacity(&self, opacity: f64) {
        self.opacity.set(opacity);
    }
}

/// Output `<pre>` text.
#[derive(Clone, Copy)]
pub struct SignalOutput(pub RwSignal<String>);

impl OutputSurface for SignalOutput {
    fn set_text(&self, text: &str) {
        self.0.set(text.to_string());
    }
}

/// The `<input type="file">` element.
#[derive(Clone, Copy)]
pub struct InputFiles(pub NodeRef<html::Input>);

impl FileSource for InputFiles {
    type File = web_sys::File;

    fn selected_files(&self) -> Vec<web_sys::File> {
        let Some(input) = self.0.get_untracked() else {
            return Vec::new();
        };
        let Some(list) = input.files() else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }
}

/// `window.alert`.
#[derive(Clone, Copy, Default)]
pub struct WindowAlert;

impl Notifier for WindowAlert {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                log::error!("Failed to show alert: {:?}", e);
            }
        }
    }
}

// =============================================================================
// Component
// =============================================================================

#[component]
pub fn UploadSection() -> impl IntoView {
    let file_input = create_node_ref::<html::Input>();
    let trigger = SignalTrigger::new();
    let output = create_rw_signal(String::new());

    let on_click = move |_| {
        let handler = UploadHandler::new(
            InputFiles(file_input),
            trigger,
            SignalOutput(output),
            WindowAlert,
            GlooTransport,
        );
        spawn_local(async move {
            let outcome = handler.process_invoice().await;
            log::debug!("Upload finished: submitted={}", outcome.was_submitted());
        });
    };

    view! {
        <div class="upload-section">
            <input
                type="file"
                id="fileInput"
                accept="image/*"
                multiple=true
                node_ref=file_input
            />

            <button
                class="btn"
                on:click=on_click
                prop:disabled=move || trigger.disabled.get()
                style:opacity=move || trigger.opacity.get().to_string()
            >
                "Processar nota fiscal"
            </button>

            <pre id="output" class="output">{move || output.get()}</pre>
        </div>
    }
}
