//! Wire-level payloads pushed over `/ws/auth`.

use serde::Serialize;

use crate::domain::Identity;
use crate::inbound::http::dto::IdentityResponse;

/// Auth-state snapshot. `user` is `null` once the session signs out.
///
/// ```json
/// {"type":"authState","user":{"userId":"…","email":"jane@example.com"}}
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStateMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user: Option<IdentityResponse>,
}

impl From<Option<&Identity>> for AuthStateMessage {
    fn from(identity: Option<&Identity>) -> Self {
        Self {
            kind: "authState",
            user: identity.map(IdentityResponse::from),
        }
    }
}
