//! The individual checks, in the order the pipeline runs them.

use axum::http::{HeaderMap, Method};
use intake_common::UserIdentity;
use intake_common::constants::{BEARER_PREFIX, headers as header_names};

use super::Rejection;
use crate::recaptcha::RecaptchaVerifier;
use crate::storage::{AnswerStore, IdentityLookup};

/// Tokens presented by the caller. Both are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Credentials {
    pub bearer_token: String,
    pub recaptcha_token: String,
}

/// Stage 1
pub(super) fn check_method(method: &Method) -> Result<(), Rejection> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(Rejection::MethodNotAllowed)
    }
}

/// Stage 2. An absent body parses like an empty one, and fails.
pub(super) fn parse_body(body: Option<&[u8]>) -> Result<serde_json::Value, Rejection> {
    serde_json::from_slice(body.unwrap_or_default()).map_err(Rejection::InvalidBody)
}

/// Stage 3
pub(super) fn extract_credentials(headers: &HeaderMap) -> Result<Credentials, Rejection> {
    let bearer_token = header_str(headers, header_names::AUTHORIZATION)
        .map(|value| value.replacen(BEARER_PREFIX, "", 1))
        .filter(|token| !token.is_empty());
    let recaptcha_token = header_str(headers, header_names::X_RECAPTCHA_TOKEN)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    match (bearer_token, recaptcha_token) {
        (Some(bearer_token), Some(recaptcha_token)) => Ok(Credentials {
            bearer_token,
            recaptcha_token,
        }),
        _ => Err(Rejection::MissingCredentials),
    }
}

/// Any UTF-8 value is accepted; invalid UTF-8 counts as absent
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
}

/// Stage 4
pub(super) async fn verify_recaptcha(
    verifier: &dyn RecaptchaVerifier,
    token: &str,
) -> Result<(), Rejection> {
    let result = verifier
        .verify(token)
        .await
        .map_err(Rejection::RecaptchaUnavailable)?;

    if result.success {
        Ok(())
    } else {
        Err(Rejection::RecaptchaRejected(result))
    }
}

/// Stage 5. Lookup and storage fail the same way.
pub(super) async fn persist(
    identities: &dyn IdentityLookup,
    answers: &dyn AnswerStore,
    bearer_token: &str,
    payload: serde_json::Value,
) -> Result<UserIdentity, Rejection> {
    let user = identities
        .get_user(bearer_token)
        .await
        .map_err(Rejection::Persistence)?;

    answers
        .save_answer(&user.uid, payload)
        .await
        .map_err(Rejection::Persistence)?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{FailingIdentities, RecordingStore, StubIdentities, StubVerifier};
    use axum::http::HeaderValue;
    use intake_common::VerificationResult;
    use tokio_test::{assert_err, assert_ok};

    fn headers_with(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_only_post_passes() {
        assert_ok!(check_method(&Method::POST));
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS] {
            assert!(matches!(
                check_method(&method),
                Err(Rejection::MethodNotAllowed)
            ));
        }
    }

    #[test]
    fn test_parse_body_accepts_any_json() {
        assert_eq!(
            parse_body(Some(br#"{"q1":"answer"}"#)).unwrap(),
            serde_json::json!({"q1": "answer"})
        );
        assert_eq!(parse_body(Some(b"42")).unwrap(), serde_json::json!(42));
        assert_eq!(parse_body(Some(b"null")).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_parse_body_rejects_malformed() {
        for body in [None, Some(&b""[..]), Some(&b"{\"q1\":"[..]), Some(&b"hello"[..])] {
            assert!(matches!(parse_body(body), Err(Rejection::InvalidBody(_))));
        }
    }

    #[test]
    fn test_parse_body_rejects_out_of_range_numbers() {
        assert!(matches!(
            parse_body(Some(b"1e400")),
            Err(Rejection::InvalidBody(_))
        ));
    }

    #[test]
    fn test_non_ascii_tokens_are_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_bytes("Bearer jetón-ü".as_bytes()).unwrap(),
        );
        headers.insert(
            "x-recaptcha-token",
            HeaderValue::from_bytes("rc-ñ".as_bytes()).unwrap(),
        );

        let credentials = extract_credentials(&headers).unwrap();
        assert_eq!(credentials.bearer_token, "jetón-ü");
        assert_eq!(credentials.recaptcha_token, "rc-ñ");
    }

    #[test]
    fn test_invalid_utf8_token_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer tok123"));
        headers.insert(
            "x-recaptcha-token",
            HeaderValue::from_bytes(&[0xff, 0xfe, b'a']).unwrap(),
        );

        assert!(matches!(
            extract_credentials(&headers),
            Err(Rejection::MissingCredentials)
        ));
    }

    #[test]
    fn test_extract_credentials() {
        let headers = headers_with(&[
            ("authorization", "Bearer tok123"),
            ("x-recaptcha-token", "rc456"),
        ]);
        assert_eq!(
            extract_credentials(&headers).unwrap(),
            Credentials {
                bearer_token: "tok123".to_string(),
                recaptcha_token: "rc456".to_string(),
            }
        );
    }

    #[test]
    fn test_authorization_without_prefix_is_used_verbatim() {
        let headers = headers_with(&[("authorization", "tok123"), ("x-recaptcha-token", "rc")]);
        assert_eq!(extract_credentials(&headers).unwrap().bearer_token, "tok123");
    }

    #[test]
    fn test_missing_or_empty_credentials_rejected() {
        let cases = [
            headers_with(&[("x-recaptcha-token", "rc456")]),
            headers_with(&[("authorization", "Bearer tok123")]),
            headers_with(&[("authorization", "Bearer "), ("x-recaptcha-token", "rc456")]),
            headers_with(&[("authorization", "Bearer tok123"), ("x-recaptcha-token", "")]),
            HeaderMap::new(),
        ];
        for headers in cases {
            assert!(matches!(
                extract_credentials(&headers),
                Err(Rejection::MissingCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_verify_recaptcha_outcomes() {
        let ok = StubVerifier::answering(VerificationResult::passed());
        assert_ok!(verify_recaptcha(&ok, "rc").await);

        let refused = StubVerifier::answering(VerificationResult::rejected(&["bad-request"]));
        assert!(matches!(
            verify_recaptcha(&refused, "rc").await,
            Err(Rejection::RecaptchaRejected(_))
        ));

        let down = StubVerifier::failing("connect timeout");
        assert!(matches!(
            verify_recaptcha(&down, "rc").await,
            Err(Rejection::RecaptchaUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_persist_lookup_failure_skips_store() {
        let store = RecordingStore::default();
        assert_err!(persist(&FailingIdentities, &store, "tok", serde_json::json!({})).await);
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_persist_saves_under_uid() {
        let store = RecordingStore::default();
        let user = persist(&StubIdentities::new("u1"), &store, "tok", serde_json::json!({"a": 1}))
            .await
            .unwrap();

        assert_eq!(user.uid, "u1");
        assert_eq!(store.saved(), vec![("u1".to_string(), serde_json::json!({"a": 1}))]);
    }
}
