//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>
                "Invoice Reader v" {env!("CARGO_PKG_VERSION")} " • "
                <span class="rust-badge">"🦀 Rust + Leptos"</span>
            </div>
            <div class="footer-links">
                <a href="/health" class="footer-link" target="_blank">
                    "Status da API"
                </a>
            </div>
        </footer>
    }
}
