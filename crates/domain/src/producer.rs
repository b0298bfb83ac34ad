//! Producer and user details shown in the review detail view.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const NOT_INFORMED: &str = "Não informado";

static NON_DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\D").ok());
static CPF_GROUPS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d{3})(\d{3})(\d{3})(\d{2})$").ok());
static CNPJ_GROUPS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{3})(\d{3})(\d{4})(\d{2})$").ok());

/// A document attached to a producer registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerDocument {
    /// Document type, also used as the download file name.
    #[serde(default)]
    pub document_type: String,
    /// URL the document is downloaded from with the bearer token.
    #[serde(default)]
    pub download_url: String,
}

/// Full producer registration details, fetched when a detail view opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerDetail {
    /// Producer full name.
    #[serde(default)]
    pub name: Option<String>,
    /// CPF, when the registry sends it under that name.
    #[serde(default)]
    pub cpf: Option<String>,
    /// CPF or CNPJ.
    #[serde(default)]
    pub document_number: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// E-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Power plant name.
    #[serde(default)]
    pub power_plant_name: Option<String>,
    /// Power plant code.
    #[serde(default)]
    pub power_plant_code: Option<String>,
    /// Operation start date, as sent by the registry.
    #[serde(default)]
    pub operation_start: Option<String>,
    /// Documents in registry order.
    #[serde(default)]
    pub documents: Vec<ProducerDocument>,
}

impl ProducerDetail {
    /// Returns the producer's document, preferring `cpf` over `documentNumber`.
    #[must_use]
    pub fn document(&self) -> DocumentNumber {
        let raw = self
            .cpf
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.document_number.as_deref())
            .unwrap_or_default();
        DocumentNumber::classify(raw)
    }

    /// Returns a display value for an optional field.
    #[must_use]
    pub fn display(field: Option<&str>) -> &str {
        field.filter(|s| !s.trim().is_empty()).unwrap_or(NOT_INFORMED)
    }
}

/// User record from the user service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    /// User identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// E-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// CPF.
    #[serde(default)]
    pub cpf: Option<String>,
    /// CPF or CNPJ.
    #[serde(default)]
    pub document_number: Option<String>,
}

impl UserDetail {
    /// Returns the user's document, preferring `cpf` over `documentNumber`.
    #[must_use]
    pub fn document(&self) -> DocumentNumber {
        let raw = self
            .cpf
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.document_number.as_deref())
            .unwrap_or_default();
        DocumentNumber::classify(raw)
    }
}

/// A Brazilian taxpayer document classified by digit count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNumber {
    /// Individual taxpayer number, 11 digits.
    Cpf(String),
    /// Company taxpayer number, 14 digits.
    Cnpj(String),
    /// Anything else, kept verbatim.
    Other(String),
    /// No document was provided.
    Missing,
}

impl DocumentNumber {
    /// Classifies a raw document by the number of digits it contains.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Missing;
        }
        let digits = NON_DIGITS
            .as_ref()
            .map_or_else(|| raw.to_string(), |re| re.replace_all(raw, "").into_owned());
        match digits.len() {
            11 => Self::Cpf(digits),
            14 => Self::Cnpj(digits),
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Returns the label shown next to the number.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cpf(_) => "CPF",
            Self::Cnpj(_) => "CNPJ",
            Self::Other(_) | Self::Missing => "Documento",
        }
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpf(digits) => f.write_str(&regroup(CPF_GROUPS.as_ref(), digits, "$1.$2.$3-$4")),
            Self::Cnpj(digits) => {
                f.write_str(&regroup(CNPJ_GROUPS.as_ref(), digits, "$1.$2.$3/$4-$5"))
            }
            Self::Other(raw) => f.write_str(raw),
            Self::Missing => f.write_str(NOT_INFORMED),
        }
    }
}

fn regroup(pattern: Option<&Regex>, digits: &str, template: &str) -> String {
    pattern.map_or_else(
        || digits.to_string(),
        |re| re.replace(digits, template).into_owned(),
    )
}
