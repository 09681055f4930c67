//! Prompt for invoice field extraction.
//!
//! The model receives the OCR text flattened to one line and must answer
//! with a single JSON object holding the [`InvoiceInfo`](crate::models::InvoiceInfo) fields.

/// Field list with extraction hints, in response order.
pub const FIELDS: &[(&str, &str)] = &[
    ("nome_emissor", "Nome completo do emissor com razão social"),
    ("CNPJ_emissor", "CNPJ com 14 dígitos (formatado ou não)"),
    ("endereco_emissor", "Endereço completo com tipo de logradouro"),
    ("CNPJ_CPF_consumidor", "Números do CPF ou CNPJ do consumidor, se mencionado"),
    ("data_emissao", "Data em DD/MM/AAAA ou DD-MM-AAAA"),
    ("numero_nota_fiscal", "Número geralmente com 6 a 9 dígitos"),
    ("serie_nota_fiscal", "Série (1, 101, etc)"),
    ("valor_total", "Maior valor em R$"),
    ("forma_pgto", "Forma de pagamento (Dinheiro, Cartão, etc)"),
];

/// Build the extraction prompt for one invoice text.
pub fn invoice_prompt(text: &str) -> String {
    let fields = FIELDS
        .iter()
        .map(|(name, hint)| format!("- {}: {}", name, hint))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analise este texto extraído de uma nota fiscal e extraia as seguintes informações em formato JSON.\n\
         Retorne APENAS o JSON sem comentários ou formatação adicional. Use null para campos não encontrados.\n\
         \n\
         Texto:\n\
         {text}\n\
         \n\
         Campos requeridos:\n\
         {fields}\n"
    )
}
