//! Extracting tokens from their carriers.
//!
//! Clients receive tokens either bare or embedded in a URL as the
//! `token` query parameter. The caller names the carrier it expects;
//! [`TokenSource::Auto`] keeps the historical leading-digit sniff for
//! callers that accept both, as a convenience rather than a security
//! boundary (the quota field always starts with a digit).

use crate::error::TokenError;
use url::Url;

/// How a token is carried in an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenSource {
    /// The input is the bare encoded token.
    Bare,
    /// The input is a URL carrying the token as a `token` query parameter.
    CarrierUrl,
    /// Sniff: a leading ASCII digit means bare, anything else is a URL.
    #[default]
    Auto,
}

/// Extract the bare token string from a carrier.
///
/// Fails with [`TokenError::MissingToken`] when a URL carrier has no
/// `token` parameter or cannot be parsed at all.
pub fn extract_token(input: &str, source: TokenSource) -> Result<String, TokenError> {
    match source {
        TokenSource::Bare => Ok(input.to_string()),
        TokenSource::CarrierUrl => extract_from_url(input),
        TokenSource::Auto => {
            if input.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                Ok(input.to_string())
            } else {
                extract_from_url(input)
            }
        }
    }
}

fn extract_from_url(input: &str) -> Result<String, TokenError> {
    let url = Url::parse(input).map_err(|_| TokenError::MissingToken)?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .ok_or(TokenError::MissingToken)
}

/// Build the carrier URL handed out at issuance. The token is
/// percent-encoded into the `token` query parameter.
pub fn carrier_url(base: &Url, token: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("token", token);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_passthrough() {
        let token = "5|936da01f-9abd-4d9d-80c7-02af85c822a8|AAAA";
        assert_eq!(extract_token(token, TokenSource::Bare).unwrap(), token);
        assert_eq!(extract_token(token, TokenSource::Auto).unwrap(), token);
    }

    #[test]
    fn test_url_extraction_round_trip() {
        let base = Url::parse("https://gate.example.org/").unwrap();
        let token = "5|936da01f-9abd-4d9d-80c7-02af85c822a8|c2ln=";

        let url = carrier_url(&base, token);
        // The delimiter and padding must survive percent-encoding.
        let extracted = extract_token(url.as_str(), TokenSource::CarrierUrl).unwrap();
        assert_eq!(extracted, token);

        let sniffed = extract_token(url.as_str(), TokenSource::Auto).unwrap();
        assert_eq!(sniffed, token);
    }

    #[test]
    fn test_url_without_token_parameter() {
        let err = extract_token("https://gate.example.org/?other=1", TokenSource::CarrierUrl)
            .unwrap_err();
        assert!(matches!(err, TokenError::MissingToken));
    }

    #[test]
    fn test_unparseable_carrier() {
        assert!(matches!(
            extract_token("", TokenSource::Auto),
            Err(TokenError::MissingToken)
        ));
        assert!(matches!(
            extract_token("not a url", TokenSource::CarrierUrl),
            Err(TokenError::MissingToken)
        ));
    }
}
