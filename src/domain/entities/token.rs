//! Claims and credential value objects for bearer-token authentication.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `Authorization` header prefix stripped before decoding.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried inside a bearer token.
///
/// Every recognized key is optional on decode; tokens minted by this
/// crate always carry `username`, `password`, and `createTime`. Claim
/// keys this crate does not interpret land in `extra` and survive a
/// refresh untouched. A claims value is built fresh per operation and
/// never mutated after encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject; mirrors the `username` claim on emit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiry instant in seconds since the Unix epoch. Absent on
    /// continuous tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Subject identity; may be the empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Opaque credential carried in the token; may be the empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Mint timestamp in milliseconds since the Unix epoch.
    #[serde(rename = "createTime", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,

    /// Unrecognized claim keys, preserved across decode and refresh.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Builds mint-time claims. Absent credentials are stored as the
    /// empty string, not omitted.
    pub fn for_user(username: Option<&str>, password: Option<&str>, now_millis: i64) -> Self {
        Self {
            username: Some(username.unwrap_or_default().to_string()),
            password: Some(password.unwrap_or_default().to_string()),
            create_time: Some(now_millis),
            ..Self::default()
        }
    }

    /// Seeds a fresh claims value from these claims with a new mint
    /// time. `sub` and `exp` are cleared; the encoder re-derives them.
    pub fn refreshed(&self, now_millis: i64) -> Self {
        let mut next = self.clone();
        next.create_time = Some(now_millis);
        next.sub = None;
        next.exp = None;
        next
    }
}

/// Credential pair handed to the mint operations by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub username: String,
    pub password: String,
}

impl TokenInfo {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user_preserves_empty_credentials() {
        let claims = Claims::for_user(None, None, 1_000);

        assert_eq!(claims.username, Some(String::new()));
        assert_eq!(claims.password, Some(String::new()));
        assert_eq!(claims.create_time, Some(1_000));
        assert_eq!(claims.sub, None);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_refreshed_advances_create_time_only() {
        let mut claims = Claims::for_user(Some("alice"), Some("pw"), 1_000);
        claims.sub = Some("alice".to_string());
        claims.exp = Some(2);
        claims
            .extra
            .insert("tenant".to_string(), Value::String("acme".to_string()));

        let next = claims.refreshed(5_000);

        assert_eq!(next.create_time, Some(5_000));
        assert_eq!(next.sub, None);
        assert_eq!(next.exp, None);
        assert_eq!(next.username, claims.username);
        assert_eq!(next.password, claims.password);
        assert_eq!(next.extra, claims.extra);
    }

    #[test]
    fn test_claims_serialization_uses_wire_keys() {
        let claims = Claims::for_user(Some("alice"), Some("pw"), 1_700_000_000_000);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["createTime"], 1_700_000_000_000_i64);
        assert_eq!(json["username"], "alice");
        // Absent keys are omitted, not serialized as null
        assert!(json.get("sub").is_none());
        assert!(json.get("exp").is_none());
    }

    #[test]
    fn test_unknown_claim_keys_round_trip() {
        let json = r#"{"username":"a","password":"b","createTime":1,"role":"admin"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.extra["role"], "admin");

        let back = serde_json::to_value(&claims).unwrap();
        assert_eq!(back["role"], "admin");
    }

    #[test]
    fn test_token_info_creation() {
        let info = TokenInfo::new("svc", "x");
        assert_eq!(info.username, "svc");
        assert_eq!(info.password, "x");
    }
}
