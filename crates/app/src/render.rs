//! Plain-text rendering of proposals and producer details.

use std::fmt::Write;

use powershare_domain::{ProducerDetail, Proposal, ProposalStatus};

const NO_UNIT: &str = "N/D";

/// Renders one status tab: a header line and a card per proposal.
#[must_use]
pub fn proposal_list(status: ProposalStatus, proposals: &[Proposal]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", status.label(), proposals.len());
    if proposals.is_empty() {
        out.push_str("Não há propostas nesta categoria.\n");
        return out;
    }
    for proposal in proposals {
        out.push('\n');
        out.push_str(&proposal_card(proposal));
    }
    out
}

/// Renders a proposal the way it appears on its card.
#[must_use]
pub fn proposal_card(proposal: &Proposal) -> String {
    let unit = proposal
        .unit_under_review()
        .map_or(NO_UNIT, |u| u.nome.as_str());
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", proposal.name, proposal.kind.label());
    let _ = writeln!(out, "  E-mail: {}", proposal.email);
    let _ = writeln!(out, "  Enviado em: {}", proposal.submitted_on);
    let _ = writeln!(out, "  Unidade Produtora: {unit}");
    let _ = writeln!(out, "  Id: {}", proposal.user_id);
    if let Some(actions) = actions(proposal.status) {
        let _ = writeln!(out, "  Ações: {actions}");
    }
    out
}

fn actions(status: ProposalStatus) -> Option<&'static str> {
    if status.is_open() {
        Some("approve, reject")
    } else if status.can_reopen() {
        Some("reopen")
    } else {
        None
    }
}

/// Renders the producer information and document list of a detail view.
#[must_use]
pub fn producer_detail(detail: &ProducerDetail) -> String {
    let field = |value: &Option<String>| ProducerDetail::display(value.as_deref()).to_string();
    let document = detail.document();

    let mut out = String::from("Dados do Produtor\n");
    let _ = writeln!(out, "  Nome completo: {}", field(&detail.name));
    let _ = writeln!(out, "  {}: {document}", document.label());
    let _ = writeln!(out, "  Celular: {}", field(&detail.phone));
    let _ = writeln!(out, "  E-mail: {}", field(&detail.email));

    out.push_str("\nDados da Usina\n");
    let _ = writeln!(out, "  Nome da Usina: {}", field(&detail.power_plant_name));
    let _ = writeln!(out, "  Código da Usina: {}", field(&detail.power_plant_code));
    let _ = writeln!(out, "  Início da Operação: {}", field(&detail.operation_start));

    out.push_str("\nDocumentos da Usina\n");
    if detail.documents.is_empty() {
        out.push_str("  Nenhum documento encontrado para esta proposta.\n");
    }
    for document in &detail.documents {
        let _ = writeln!(out, "  - {}: {}", document.document_type, document.download_url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use powershare_domain::{ProducerDocument, ProductionUnit, ProposalKind, ProposalRow};
    use pretty_assertions::assert_eq;

    fn proposal() -> Proposal {
        let mut proposal = Proposal::from_row(
            ProposalRow {
                user_id: Some("u-1".to_string()),
                user_name: Some("Fazenda Sol".to_string()),
                email: Some("sol@x.com".to_string()),
                sent_at: Some("15/06/2024".to_string()),
                ..ProposalRow::default()
            },
            ProposalStatus::Pending,
        );
        proposal.kind = ProposalKind::NovaUnidade;
        proposal.units = Some(vec![ProductionUnit {
            nome: "Usina Norte".to_string(),
            status: ProposalStatus::Pending,
        }]);
        proposal
    }

    #[test]
    fn test_card() {
        assert_eq!(
            proposal_card(&proposal()),
            "Fazenda Sol  [Nova Unidade]\n  E-mail: sol@x.com\n  Enviado em: 15/06/2024\n  Unidade Produtora: Usina Norte\n  Id: u-1\n  Ações: approve, reject\n"
        );
    }

    #[test]
    fn test_card_actions_follow_status() {
        let mut approved = proposal();
        approved.status = ProposalStatus::Approved;
        assert!(proposal_card(&approved).ends_with("  Ações: reopen\n"));

        approved.status = ProposalStatus::Rejected;
        assert!(proposal_card(&approved).ends_with("  Ações: reopen\n"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            proposal_list(ProposalStatus::Rejected, &[]),
            "Rejeitados (0)\nNão há propostas nesta categoria.\n"
        );
    }

    #[test]
    fn test_list_header_counts_cards() {
        let rendered = proposal_list(ProposalStatus::Pending, &[proposal()]);
        assert!(rendered.starts_with("Pendentes (1)\n\nFazenda Sol"));
    }

    #[test]
    fn test_detail() {
        let detail = ProducerDetail {
            name: Some("Fazenda Sol".to_string()),
            document_number: Some("12345678000195".to_string()),
            power_plant_name: Some("Usina Sol".to_string()),
            documents: vec![ProducerDocument {
                document_type: "Contrato Social".to_string(),
                download_url: "http://files/1".to_string(),
            }],
            ..ProducerDetail::default()
        };

        let rendered = producer_detail(&detail);

        assert!(rendered.contains("  CNPJ: 12.345.678/0001-95\n"));
        assert!(rendered.contains("  Celular: Não informado\n"));
        assert!(rendered.contains("  Nome da Usina: Usina Sol\n"));
        assert!(rendered.contains("  - Contrato Social: http://files/1\n"));
    }

    #[test]
    fn test_detail_without_documents() {
        let rendered = producer_detail(&ProducerDetail::default());
        assert!(rendered.contains("  Documento: Não informado\n"));
        assert!(rendered.contains("Nenhum documento encontrado para esta proposta."));
    }
}
