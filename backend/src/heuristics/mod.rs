//! Offline invoice analysis with regular expressions.
//!
//! Used when no Gemini key is configured. Each field is the first match of
//! a pattern tuned on NFC-e / cupom fiscal layouts; anything not found stays
//! `None`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ai::InvoiceAnalyzer;
use crate::error::AiResult;
use crate::models::InvoiceInfo;

/// Longest address kept, in characters.
const MAX_ADDRESS_CHARS: usize = 70;

static COMPANY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)((?:\S+\s+){0,4}?\S+)\s+(LTDA|LIDA|LTDS|EIRELI|S\.A\.?|S/A|-\s?ME)(?:[\s,.]|$)").ok()
});

static CNPJ: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\d{2}[.\s_]?\d{3}[.\s_]?\d{3}[.\s_/]?\d{4}[.\s_-]?\d{2}").ok()
});

static ADDRESS: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:AVENIDA|AVE|AV|ALAMEDA|RODOVIA|ROD|RUA|RUR|TRECHO)[\s,.\-]+[\w\s,.\-]+").ok()
});

static CONSUMER: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)(\d{3}[.\s-]?\d{3}[.\s-]?\d{3}[.\s-]?\d{2}|\d{11}|n[aã]o\s*identificado|n[aã]o\s*informado)(?:\s|$)",
    )
    .ok()
});

static DATE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").ok());

static NUMBER_NINE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)(000[.\s-]?\d{3}[.\s-]?\d{3})(?:\s|$)").ok()
});

static NUMBER_SIX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?:^|\D)(\d{6})(?:\D|$)").ok());

static SERIES: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)s[ée]rie\s*[:\-]?\s*(\d{1,3})").ok());

static TOTAL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:valor\s+total|total)\s*[:\-]?\s*(?:R\$|RS)?\s*(\d{1,3}(?:[\s,.]?\d{3})*[.,]\d{2})",
    )
    .ok()
});

/// First capture group `group` of `pattern` in `text`.
fn capture(pattern: &Lazy<Option<Regex>>, text: &str, group: usize) -> Option<String> {
    let re = pattern.as_ref()?;
    re.captures(text)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str().trim().to_string())
}

pub fn company_name(text: &str) -> Option<String> {
    let re = COMPANY.as_ref()?;
    let caps = re.captures(text)?;
    Some(format!("{} {}", &caps[1], &caps[2]))
}

pub fn cnpj(text: &str) -> Option<String> {
    capture(&CNPJ, text, 0)
}

pub fn address(text: &str) -> Option<String> {
    let full = capture(&ADDRESS, text, 0)?;
    let truncated: String = full.chars().take(MAX_ADDRESS_CHARS).collect();
    Some(truncated.trim().to_string())
}

pub fn consumer_document(text: &str) -> Option<String> {
    capture(&CONSUMER, text, 1)
}

pub fn issue_date(text: &str) -> Option<String> {
    capture(&DATE, text, 0)
}

/// 9-digit number starting with `000` (separators dropped), else an isolated 6-digit number.
pub fn invoice_number(text: &str) -> Option<String> {
    if let Some(number) = capture(&NUMBER_NINE, text, 1) {
        return Some(number.chars().filter(|c| c.is_ascii_digit()).collect());
    }
    capture(&NUMBER_SIX, text, 1)
}

pub fn series(text: &str) -> Option<String> {
    capture(&SERIES, text, 1)
}

pub fn total(text: &str) -> Option<String> {
    capture(&TOTAL, text, 1)
}

/// `Dinheiro` when cash is mentioned, `Cartão` otherwise.
pub fn payment_method(text: &str) -> String {
    if text.to_lowercase().contains("dinheiro") {
        "Dinheiro".to_string()
    } else {
        "Cartão".to_string()
    }
}

/// Run every rule over the text.
pub fn extract_invoice_info(text: &str) -> InvoiceInfo {
    InvoiceInfo {
        nome_emissor: company_name(text),
        cnpj_emissor: cnpj(text),
        endereco_emissor: address(text),
        cnpj_cpf_consumidor: consumer_document(text),
        data_emissao: issue_date(text),
        numero_nota_fiscal: invoice_number(text),
        serie_nota_fiscal: series(text),
        valor_total: total(text),
        forma_pgto: Some(payment_method(text)),
    }
}

/// Regex based [`InvoiceAnalyzer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexAnalyzer;

#[async_trait]
impl InvoiceAnalyzer for RegexAnalyzer {
    fn name(&self) -> &'static str {
        "regex"
    }

    async fn analyze(&self, text: &str) -> AiResult<InvoiceInfo> {
        Ok(extract_invoice_info(text))
    }
}
