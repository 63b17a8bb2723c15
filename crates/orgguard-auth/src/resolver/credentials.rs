//! Credential extraction from raw request parts.

use crate::api_key::is_valid_api_key_format;

/// Raw credential-bearing values of one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialSources<'a> {
    /// `X-API-Key` header value.
    pub api_key_header: Option<&'a str>,
    /// `Authorization` header value.
    pub authorization: Option<&'a str>,
    /// `api_key` query parameter.
    pub api_key_query: Option<&'a str>,
}

/// The credential a request will be authenticated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// An API key value, not yet format-checked.
    ApiKey(String),
    /// A session token.
    SessionToken(String),
}

type Source = fn(&CredentialSources<'_>) -> Option<Credential>;

/// Sources in precedence order. Every API key source outranks the session token.
const SOURCES: [Source; 4] = [
    from_api_key_header,
    from_bearer_api_key,
    from_api_key_query,
    from_bearer_session_token,
];

/// Pick the single credential to authenticate with, if any.
pub fn extract_credential(sources: &CredentialSources<'_>) -> Option<Credential> {
    SOURCES.iter().find_map(|source| source(sources))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn bearer<'a>(sources: &CredentialSources<'a>) -> Option<&'a str> {
    let value = non_empty(sources.authorization)?;
    let (scheme, rest) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    non_empty(Some(rest))
}

fn from_api_key_header(sources: &CredentialSources<'_>) -> Option<Credential> {
    non_empty(sources.api_key_header).map(|v| Credential::ApiKey(v.to_string()))
}

fn from_bearer_api_key(sources: &CredentialSources<'_>) -> Option<Credential> {
    bearer(sources)
        .filter(|v| is_valid_api_key_format(v))
        .map(|v| Credential::ApiKey(v.to_string()))
}

fn from_api_key_query(sources: &CredentialSources<'_>) -> Option<Credential> {
    non_empty(sources.api_key_query).map(|v| Credential::ApiKey(v.to_string()))
}

fn from_bearer_session_token(sources: &CredentialSources<'_>) -> Option<Credential> {
    bearer(sources).map(|v| Credential::SessionToken(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_nothing_presented() {
        assert_eq!(extract_credential(&CredentialSources::default()), None);
        let blank = CredentialSources {
            api_key_header: Some("  "),
            authorization: Some("Bearer "),
            api_key_query: Some(""),
        };
        assert_eq!(extract_credential(&blank), None);
    }

    #[test]
    fn test_header_key_wins_over_everything() {
        let sources = CredentialSources {
            api_key_header: Some("from-header"),
            authorization: Some("Bearer some.jwt.token"),
            api_key_query: Some(KEY),
        };
        assert_eq!(
            extract_credential(&sources),
            Some(Credential::ApiKey("from-header".to_string()))
        );
    }

    #[test]
    fn test_bearer_key_shaped_value_is_an_api_key() {
        let header = format!("Bearer {KEY}");
        let sources = CredentialSources {
            authorization: Some(header.as_str()),
            ..Default::default()
        };
        assert_eq!(
            extract_credential(&sources),
            Some(Credential::ApiKey(KEY.to_string()))
        );
    }

    #[test]
    fn test_query_key_outranks_session_token() {
        let sources = CredentialSources {
            authorization: Some("Bearer header.payload.sig"),
            api_key_query: Some(KEY),
            ..Default::default()
        };
        assert_eq!(
            extract_credential(&sources),
            Some(Credential::ApiKey(KEY.to_string()))
        );
    }

    #[test]
    fn test_bearer_token_falls_through_to_session() {
        let sources = CredentialSources {
            authorization: Some("bearer header.payload.sig"),
            ..Default::default()
        };
        assert_eq!(
            extract_credential(&sources),
            Some(Credential::SessionToken("header.payload.sig".to_string()))
        );
    }

    #[test]
    fn test_non_bearer_scheme_is_ignored() {
        let sources = CredentialSources {
            authorization: Some("Basic dXNlcjpwYXNz"),
            ..Default::default()
        };
        assert_eq!(extract_credential(&sources), None);
    }
}
