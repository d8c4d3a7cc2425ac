use serde::Deserialize;
use std::collections::HashMap;

/// The `auth` stanza of a login response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthInfo {
    pub client_token: String,
    #[serde(default)]
    pub accessor: Option<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub entity_id: Option<String>,
}

impl AuthInfo {
    /// Auth info for a token obtained outside a login exchange
    /// (Token method, Custom token-only delegate).
    pub fn for_raw_token(token: impl Into<String>) -> Self {
        Self {
            client_token: token.into(),
            accessor: None,
            lease_duration: 0,
            renewable: false,
            policies: Vec::new(),
            metadata: None,
            entity_id: None,
        }
    }
}

/// Response-wrapping envelope returned instead of the raw payload
/// when the request carried a wrap TTL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WrapInfo {
    pub token: String,
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub creation_path: Option<String>,
}

/// Generic envelope around every Vault API response.
///
/// Created fresh per request and never mutated after deserialization.
/// An empty 2xx body deserializes to `Secret::default()`.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub lease_id: Option<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub wrap_info: Option<WrapInfo>,
    #[serde(default)]
    pub auth: Option<AuthInfo>,
}

// Manual impl: `T: Default` is not required for an absent payload.
impl<T> Default for Secret<T> {
    fn default() -> Self {
        Self {
            request_id: None,
            lease_id: None,
            lease_duration: 0,
            renewable: false,
            data: None,
            warnings: None,
            wrap_info: None,
            auth: None,
        }
    }
}

/// Result of a successful login: the bearer token plus the full auth
/// stanza it came from. Returned by every login provider instead of
/// being written back onto the auth method value object.
#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub client_token: String,
    pub auth: AuthInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_deserialize() {
        let json = r#"{
            "request_id": "r1",
            "lease_id": "",
            "renewable": false,
            "lease_duration": 0,
            "data": null,
            "wrap_info": null,
            "warnings": null,
            "auth": {
                "client_token": "t1",
                "accessor": "acc",
                "policies": ["default", "web"],
                "lease_duration": 2764800,
                "renewable": true
            }
        }"#;
        let secret: Secret<serde_json::Value> = serde_json::from_str(json).unwrap();
        let auth = secret.auth.unwrap();
        assert_eq!(auth.client_token, "t1");
        assert_eq!(auth.policies, vec!["default", "web"]);
        assert!(auth.renewable);
        assert!(secret.data.is_none());
    }

    #[test]
    fn test_secret_all_fields_optional() {
        let secret: Secret<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(secret.auth.is_none());
        assert!(secret.wrap_info.is_none());
        assert_eq!(secret.lease_duration, 0);
    }

    #[test]
    fn test_wrap_info_deserialize() {
        let json = r#"{
            "wrap_info": {
                "token": "wrap-token",
                "ttl": 60,
                "creation_time": "2024-01-01T00:00:00Z",
                "creation_path": "sys/wrapping/wrap"
            }
        }"#;
        let secret: Secret<serde_json::Value> = serde_json::from_str(json).unwrap();
        let wrap = secret.wrap_info.unwrap();
        assert_eq!(wrap.token, "wrap-token");
        assert_eq!(wrap.ttl, 60);
    }

    #[test]
    fn test_for_raw_token() {
        let auth = AuthInfo::for_raw_token("abc");
        assert_eq!(auth.client_token, "abc");
        assert_eq!(auth.lease_duration, 0);
        assert!(!auth.renewable);
        assert!(auth.policies.is_empty());
    }
}
