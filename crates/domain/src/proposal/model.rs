//! Proposal model and mapping from registry rows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::ProposalStatus;

const MISSING_NAME: &str = "Nome não informado";
const MISSING_EMAIL: &str = "E-mail não informado";
const MISSING_DATE: &str = "Data não informada";

/// Kind of registration being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    /// A new producer joining the platform.
    #[default]
    NovoProdutor,
    /// A new production unit for an existing producer.
    NovaUnidade,
}

impl ProposalKind {
    /// Returns the label shown on the proposal card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NovoProdutor => "Novo Produtor",
            Self::NovaUnidade => "Nova Unidade",
        }
    }
}

/// A production unit (power plant) attached to a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionUnit {
    /// Unit name.
    pub nome: String,
    /// Review status of this unit.
    pub status: ProposalStatus,
}

/// A producer-registration proposal as held in the working list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Identifier of the user who submitted the proposal. Unique.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Producer name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Producer e-mail.
    pub email: String,
    /// Submission date as `DD/MM/YYYY`, or a placeholder when unknown.
    #[serde(rename = "enviadoEm")]
    pub submitted_on: String,
    /// Kind of registration.
    #[serde(rename = "tipo")]
    pub kind: ProposalKind,
    /// Status the proposal was listed under.
    pub status: ProposalStatus,
    /// Production units, if the registry reported any.
    #[serde(rename = "unidades")]
    pub units: Option<Vec<ProductionUnit>>,
}

impl Proposal {
    /// Maps a registry row into a proposal listed under `status`.
    ///
    /// Missing or blank fields are replaced by placeholder text; a missing
    /// user id gets a generated `id-<uuid>` identifier so the row stays
    /// addressable in the list.
    #[must_use]
    pub fn from_row(row: ProposalRow, status: ProposalStatus) -> Self {
        Self {
            user_id: non_blank(row.user_id)
                .unwrap_or_else(|| format!("id-{}", Uuid::now_v7())),
            name: non_blank(row.user_name).unwrap_or_else(|| MISSING_NAME.to_string()),
            email: non_blank(row.email).unwrap_or_else(|| MISSING_EMAIL.to_string()),
            submitted_on: non_blank(row.sent_at).unwrap_or_else(|| MISSING_DATE.to_string()),
            kind: row.kind.unwrap_or_default(),
            status,
            units: row.units,
        }
    }

    /// Returns the unit shown on the card: the first pending unit, otherwise
    /// the first unit, otherwise none.
    #[must_use]
    pub fn unit_under_review(&self) -> Option<&ProductionUnit> {
        let units = self.units.as_deref()?;
        units
            .iter()
            .find(|u| u.status == ProposalStatus::Pending)
            .or_else(|| units.first())
    }
}

/// A row of the registry listing endpoint.
///
/// Every field is optional; absent values are filled in by
/// [`Proposal::from_row`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRow {
    /// User identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Producer name.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Producer e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Submission date, `DD/MM/YYYY`.
    #[serde(default)]
    pub sent_at: Option<String>,
    /// Registration kind, when the registry reports it.
    #[serde(default, alias = "tipo")]
    pub kind: Option<ProposalKind>,
    /// Production units, when the registry reports them.
    #[serde(default, alias = "unidades")]
    pub units: Option<Vec<ProductionUnit>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
