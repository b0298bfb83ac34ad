//! Base URLs of the remote services and the endpoint paths built on them.

use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::proposal::ProposalStatus;

const DEFAULT_AUTH_URL: &str = "http://localhost:8081/auth";
const DEFAULT_PRODUCERS_URL: &str = "http://localhost:8086/admin/producers";
const DEFAULT_USERS_URL: &str = "http://localhost:8081/users";

/// Base URLs of the auth service, the producer registry and the user service.
///
/// Every base is an absolute http(s) URL; the only constructors validate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Auth service base, e.g. `http://localhost:8081/auth`.
    pub auth: Url,
    /// Producer registry base, e.g. `http://localhost:8086/admin/producers`.
    pub producers: Url,
    /// User service base, e.g. `http://localhost:8081/users`.
    pub users: Url,
}

impl ApiEndpoints {
    /// Creates endpoints from three base URL strings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if any base is not an absolute
    /// http(s) URL.
    pub fn parse(auth: &str, producers: &str, users: &str) -> DomainResult<Self> {
        Ok(Self {
            auth: parse_base(auth)?,
            producers: parse_base(producers)?,
            users: parse_base(users)?,
        })
    }

    /// Endpoints of a local stack: auth and users on port 8081, the
    /// producer registry on 8086.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if a built-in base does not parse.
    pub fn localhost() -> DomainResult<Self> {
        Self::parse(DEFAULT_AUTH_URL, DEFAULT_PRODUCERS_URL, DEFAULT_USERS_URL)
    }

    /// `POST {auth}/login`
    #[must_use]
    pub fn login(&self) -> String {
        join(&self.auth, &["login"])
    }

    /// `POST {auth}/refresh`
    #[must_use]
    pub fn refresh(&self) -> String {
        join(&self.auth, &["refresh"])
    }

    /// `GET {producers}?status={status}`
    #[must_use]
    pub fn proposals(&self, status: ProposalStatus) -> String {
        let mut url = self.producers.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("status", status.as_str());
        url.into()
    }

    /// `GET {producers}/{user_id}`
    #[must_use]
    pub fn producer(&self, user_id: &str) -> String {
        join(&self.producers, &[user_id])
    }

    /// `POST {producers}/{user_id}/approve`
    #[must_use]
    pub fn approve(&self, user_id: &str) -> String {
        join(&self.producers, &[user_id, "approve"])
    }

    /// `POST {producers}/{user_id}/reject`
    #[must_use]
    pub fn reject(&self, user_id: &str) -> String {
        join(&self.producers, &[user_id, "reject"])
    }

    /// `POST {producers}/{user_id}/reopen`
    #[must_use]
    pub fn reopen(&self, user_id: &str) -> String {
        join(&self.producers, &[user_id, "reopen"])
    }

    /// `GET {users}/{user_id}`
    #[must_use]
    pub fn user(&self, user_id: &str) -> String {
        join(&self.users, &[user_id])
    }
}

/// Parses and validates a service base URL.
///
/// # Errors
///
/// Returns `DomainError::InvalidUrl` for unparsable or non-http(s) URLs.
pub fn parse_base(raw: &str) -> DomainResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::InvalidUrl(format!(
            "URL must start with http:// or https://: {raw}"
        )));
    }
    Ok(url)
}

/// Appends path segments to a base, percent-encoding each one.
fn join(base: &Url, segments: &[&str]) -> String {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_localhost_endpoints() {
        let endpoints = ApiEndpoints::localhost().expect("built-in bases parse");
        assert_eq!(endpoints.login(), "http://localhost:8081/auth/login");
        assert_eq!(endpoints.refresh(), "http://localhost:8081/auth/refresh");
        assert_eq!(
            endpoints.proposals(ProposalStatus::Pending),
            "http://localhost:8086/admin/producers?status=PENDING"
        );
        assert_eq!(
            endpoints.approve("u-1"),
            "http://localhost:8086/admin/producers/u-1/approve"
        );
        assert_eq!(
            endpoints.reopen("u-1"),
            "http://localhost:8086/admin/producers/u-1/reopen"
        );
        assert_eq!(endpoints.user("u-1"), "http://localhost:8081/users/u-1");
    }

    #[test]
    fn test_trailing_slash_base() {
        let endpoints = ApiEndpoints::parse(
            "https://auth.example.com/auth/",
            "https://api.example.com/admin/producers/",
            "https://auth.example.com/users",
        )
        .expect("valid bases");
        assert_eq!(endpoints.login(), "https://auth.example.com/auth/login");
        assert_eq!(
            endpoints.producer("abc"),
            "https://api.example.com/admin/producers/abc"
        );
    }

    #[test]
    fn test_user_id_is_encoded_as_single_segment() {
        let endpoints = ApiEndpoints::localhost().expect("built-in bases parse");
        assert_eq!(
            endpoints.reject("a/b c"),
            "http://localhost:8086/admin/producers/a%2Fb%20c/reject"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        let result = ApiEndpoints::parse("ftp://x", "http://y", "http://z");
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }
}
