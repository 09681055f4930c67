//! Domain models for invoice reading.
//!
//! - [`InvoiceInfo`] - Fields read from one nota fiscal
//! - [`InvoiceEntry`] - One processed upload in the API response

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Invoice Fields
// =============================================================================

/// Fields of a Brazilian invoice (nota fiscal).
///
/// Field names are the wire names. Every field is nullable; numeric values
/// coming from the model are kept as their printed form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    /// Issuer company name
    #[serde(default, deserialize_with = "lenient_string")]
    pub nome_emissor: Option<String>,

    /// Issuer CNPJ (14 digits, formatted or not)
    #[serde(rename = "CNPJ_emissor", default, deserialize_with = "lenient_string")]
    pub cnpj_emissor: Option<String>,

    /// Issuer address
    #[serde(default, deserialize_with = "lenient_string")]
    pub endereco_emissor: Option<String>,

    /// Consumer CPF or CNPJ
    #[serde(rename = "CNPJ_CPF_consumidor", default, deserialize_with = "lenient_string")]
    pub cnpj_cpf_consumidor: Option<String>,

    /// Issue date (DD/MM/AAAA or DD-MM-AAAA)
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_emissao: Option<String>,

    /// Invoice number
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero_nota_fiscal: Option<String>,

    /// Invoice series
    #[serde(default, deserialize_with = "lenient_string")]
    pub serie_nota_fiscal: Option<String>,

    /// Total amount
    #[serde(default, deserialize_with = "lenient_string")]
    pub valor_total: Option<String>,

    /// Payment method
    #[serde(default, deserialize_with = "lenient_string")]
    pub forma_pgto: Option<String>,
}

impl InvoiceInfo {
    /// All fields `null`, used when analysis fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of fields that were found.
    pub fn filled_fields(&self) -> usize {
        [
            &self.nome_emissor,
            &self.cnpj_emissor,
            &self.endereco_emissor,
            &self.cnpj_cpf_consumidor,
            &self.data_emissao,
            &self.numero_nota_fiscal,
            &self.serie_nota_fiscal,
            &self.valor_total,
            &self.forma_pgto,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Accept strings, numbers and booleans; map `null` and blank strings to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// =============================================================================
// API Entry
// =============================================================================

/// One processed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEntry {
    /// Uploaded file name
    pub arquivo: String,
    /// Fields read from the image
    pub informacoes_nota: InvoiceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_serializes_all_nulls_in_order() {
        let json = serde_json::to_string(&InvoiceInfo::empty()).unwrap();
        assert_eq!(
            json,
            "{\"nome_emissor\":null,\"CNPJ_emissor\":null,\"endereco_emissor\":null,\
             \"CNPJ_CPF_consumidor\":null,\"data_emissao\":null,\"numero_nota_fiscal\":null,\
             \"serie_nota_fiscal\":null,\"valor_total\":null,\"forma_pgto\":null}"
        );
    }

    #[test]
    fn test_lenient_fields() {
        let info: InvoiceInfo = serde_json::from_value(json!({
            "nome_emissor": "MERCADO SOL LTDA",
            "CNPJ_emissor": 12345678000190u64,
            "valor_total": 25.9,
            "serie_nota_fiscal": "  ",
            "forma_pgto": null
        }))
        .unwrap();

        assert_eq!(info.nome_emissor.as_deref(), Some("MERCADO SOL LTDA"));
        assert_eq!(info.cnpj_emissor.as_deref(), Some("12345678000190"));
        assert_eq!(info.valor_total.as_deref(), Some("25.9"));
        assert_eq!(info.serie_nota_fiscal, None);
        assert_eq!(info.data_emissao, None);
        assert_eq!(info.filled_fields(), 3);
    }

    #[test]
    fn test_entry_wire_names() {
        let entry = InvoiceEntry {
            arquivo: "nota.jpg".into(),
            informacoes_nota: InvoiceInfo {
                forma_pgto: Some("Dinheiro".into()),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["arquivo"], "nota.jpg");
        assert_eq!(value["informacoes_nota"]["forma_pgto"], "Dinheiro");
        assert!(value["informacoes_nota"]["CNPJ_emissor"].is_null());
    }
}
