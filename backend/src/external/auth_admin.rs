use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthAdminError {
    #[error("auth provider is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("auth provider rejected request: {0}")]
    Rejected(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

/// Client for the hosted auth provider's admin API. Users created here are
/// confirmed immediately.
#[derive(Clone)]
pub struct AuthAdminClient {
    client: reqwest::Client,
    base_url: Option<String>,
    service_role_key: Option<String>,
}

impl AuthAdminClient {
    pub fn new(base_url: Option<String>, service_role_key: Option<String>) -> Result<Self, AuthAdminError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthAdminError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            service_role_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.service_role_key.is_some()
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<CreatedUser, AuthAdminError> {
        let (Some(base_url), Some(key)) = (&self.base_url, &self.service_role_key) else {
            return Err(AuthAdminError::NotConfigured);
        };

        let url = format!("{}/auth/v1/admin/users", base_url.trim_end_matches('/'));
        let body = json!({
            "email": email,
            "password": password,
            "email_confirm": true,
            "user_metadata": { "display_name": display_name },
        });

        let resp = self
            .client
            .post(url)
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthAdminError::Network(e.to_string()))?;

        let status = resp.status();
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| AuthAdminError::Parse(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthAdminError::Rejected(error_message(&payload, status.as_u16())));
        }

        // Some API versions wrap the user object, some don't
        let user = payload.get("user").cloned().unwrap_or(payload);
        serde_json::from_value(user).map_err(|e| AuthAdminError::Parse(e.to_string()))
    }
}

fn error_message(payload: &Value, status: u16) -> String {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
