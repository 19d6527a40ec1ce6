//! HTTP implementation of the provisioning contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use staffhub_core::AccountId;

use crate::bind::{BindType, canonical_bind_value};
use crate::client::ProvisioningClient;
use crate::error::ProvisioningError;
use crate::sign::{Account, SignUpForm, SignUpResult};

/// Client for the remote identity service.
///
/// Every request carries a bounded timeout; a timeout surfaces as
/// [`ProvisioningError::Timeout`] and is never retried here.
#[derive(Debug, Clone)]
pub struct HttpProvisioningClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpProvisioningClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProvisioningError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProvisioningError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn remote_error(response: reqwest::Response) -> ProvisioningError {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
        ProvisioningError::Rejected(message)
    } else {
        ProvisioningError::Remote {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ProvisioningClient for HttpProvisioningClient {
    async fn find_account_by_bind(
        &self,
        bind_type: BindType,
        iso: &str,
        value: &str,
    ) -> Result<Option<Account>, ProvisioningError> {
        let canonical = canonical_bind_value(bind_type, iso, value);
        tracing::debug!(%bind_type, iso, value = %canonical, "find account by bind");

        let response = self
            .http
            .get(self.url("/account/bind"))
            .query(&[
                ("type", bind_type.as_str()),
                ("iso", iso),
                ("value", canonical.as_str()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<Account>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(remote_error(response).await),
        }
    }

    async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpResult, ProvisioningError> {
        tracing::debug!(account = %form.account, "sign up");

        let response = self
            .http
            .post(self.url("/passport/sign-up"))
            .json(form)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<SignUpResult>().await?)
        } else {
            Err(remote_error(response).await)
        }
    }

    async fn sign_down(&self, account_id: AccountId) -> Result<bool, ProvisioningError> {
        tracing::debug!(%account_id, "sign down");

        let response = self
            .http
            .post(self.url(&format!("/passport/sign-down/{account_id}")))
            .send()
            .await?;

        match response.status() {
            // An already-absent account still counts as signed down.
            StatusCode::NOT_FOUND => Ok(true),
            status if status.is_success() => Ok(response.json::<bool>().await?),
            _ => Err(remote_error(response).await),
        }
    }
}
