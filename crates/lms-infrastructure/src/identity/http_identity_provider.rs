// ============================================================================
// LMS Infrastructure - Identity Provider Client
// File: crates/lms-infrastructure/src/identity/http_identity_provider.rs
// ============================================================================
//! Creates sign-in accounts through the identity provider's admin endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use lms_core::error::DomainError;
use lms_core::ports::IdentityProvider;
use lms_shared::config::IdentitySettings;
use lms_shared::utils::mask_email;

#[derive(Debug, Serialize)]
struct CreateAccountRequest<'a> {
    email: &'a str,
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateAccountResponse {
    uid: String,
}

pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_settings(settings: &IdentitySettings) -> Result<Self, DomainError> {
        Self::new(
            settings.admin_url.clone(),
            settings.admin_api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn create_account(&self, email: &str, display_name: &str) -> Result<String, DomainError> {
        let url = format!("{}/accounts", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateAccountRequest { email, display_name })
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider unreachable: {}", e);
                DomainError::IdentityProviderError(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Identity provider rejected account creation ({}): {}", status, body);
            return Err(DomainError::IdentityProviderError(format!("status {}", status)));
        }

        let created: CreateAccountResponse = response.json().await.map_err(|e| {
            error!("Unreadable identity provider response: {}", e);
            DomainError::IdentityProviderError(e.to_string())
        })?;

        info!("Identity account created for {}", mask_email(email));
        Ok(created.uid)
    }
}
