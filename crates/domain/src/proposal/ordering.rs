//! Search filtering and submission-date ordering for display.

use std::cmp::Reverse;

use chrono::NaiveDate;

use super::model::Proposal;

/// Submission date parsed from the registry's `DD/MM/YYYY` text.
///
/// Missing or malformed dates compare as the Unix epoch, so they sort as
/// the oldest entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmissionDate(NaiveDate);

impl SubmissionDate {
    /// Parses `DD/MM/YYYY`, falling back to the epoch.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y")
            .map_or_else(|_| Self::epoch(), Self)
    }

    /// The fallback date, 1970-01-01.
    #[must_use]
    pub fn epoch() -> Self {
        Self(NaiveDate::default())
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

/// Returns true if the proposal's name or e-mail contains `term`,
/// ignoring case. An empty term matches everything.
#[must_use]
pub fn matches_search(proposal: &Proposal, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    proposal.name.to_lowercase().contains(&term) || proposal.email.to_lowercase().contains(&term)
}

/// Sorts proposals by submission date, newest first. Stable.
pub fn sort_by_submission_desc(proposals: &mut [Proposal]) {
    proposals.sort_by_cached_key(|p| Reverse(SubmissionDate::parse(&p.submitted_on)));
}

/// Filters `proposals` by `search` and orders the result for display.
#[must_use]
pub fn visible_proposals(proposals: &[Proposal], search: &str) -> Vec<Proposal> {
    let mut visible: Vec<Proposal> = proposals
        .iter()
        .filter(|p| matches_search(p, search))
        .cloned()
        .collect();
    sort_by_submission_desc(&mut visible);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::{ProposalRow, ProposalStatus};
    use pretty_assertions::assert_eq;

    fn proposal(id: &str, name: &str, email: &str, sent_at: &str) -> Proposal {
        let mut p = Proposal::from_row(
            ProposalRow {
                user_id: Some(id.to_string()),
                user_name: Some(name.to_string()),
                email: Some(email.to_string()),
                ..ProposalRow::default()
            },
            ProposalStatus::Pending,
        );
        p.submitted_on = sent_at.to_string();
        p
    }

    fn ids(proposals: &[Proposal]) -> Vec<&str> {
        proposals.iter().map(|p| p.user_id.as_str()).collect()
    }

    #[test]
    fn test_parse_submission_date() {
        assert_eq!(
            SubmissionDate::parse("15/06/2024").date(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default()
        );
        assert_eq!(SubmissionDate::parse(""), SubmissionDate::epoch());
        assert_eq!(SubmissionDate::parse("Data não informada"), SubmissionDate::epoch());
        assert_eq!(SubmissionDate::parse("31/02/2024"), SubmissionDate::epoch());
        assert_eq!(SubmissionDate::parse("2024-06-15"), SubmissionDate::epoch());
    }

    #[test]
    fn test_sort_newest_first_and_missing_last() {
        let mut list = vec![
            proposal("jan", "A", "a@x", "01/01/2024"),
            proposal("empty", "B", "b@x", ""),
            proposal("jun", "C", "c@x", "15/06/2024"),
        ];

        sort_by_submission_desc(&mut list);

        assert_eq!(ids(&list), vec!["jun", "jan", "empty"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut list = vec![
            proposal("first", "A", "a@x", "bad"),
            proposal("second", "B", "b@x", ""),
            proposal("third", "C", "c@x", "01/01/1970"),
        ];

        sort_by_submission_desc(&mut list);

        assert_eq!(ids(&list), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_search_matches_name_case_insensitive() {
        let list = vec![
            proposal("1", "Fazenda Sol", "contato@fazenda.com", "01/01/2024"),
            proposal("2", "Usina Vento", "usina@vento.com", "02/01/2024"),
        ];

        let visible = visible_proposals(&list, "SoL");

        assert_eq!(ids(&visible), vec!["1"]);
    }

    #[test]
    fn test_search_matches_email() {
        let list = vec![
            proposal("1", "Fazenda Sol", "contato@fazenda.com", "01/01/2024"),
            proposal("2", "Usina Vento", "usina@vento.com", "02/01/2024"),
        ];

        assert_eq!(ids(&visible_proposals(&list, "vento.com")), vec!["2"]);
        assert_eq!(ids(&visible_proposals(&list, "")), vec!["2", "1"]);
        assert!(visible_proposals(&list, "nada").is_empty());
    }
}
