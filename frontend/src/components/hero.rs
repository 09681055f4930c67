//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Leitor de Notas Fiscais"</h1>
            <p class="subtitle">
                "Selecione uma ou mais fotos de notas fiscais. "
                "O texto é extraído e os dados da nota são devolvidos em JSON."
            </p>
        </div>
    }
}
