//! Provisioning client contract.

use std::sync::Arc;

use async_trait::async_trait;

use staffhub_core::AccountId;

use crate::bind::BindType;
use crate::error::ProvisioningError;
use crate::sign::{Account, SignUpForm, SignUpResult};

/// External capability to look up, create, and remove authentication
/// accounts keyed by a bind value.
///
/// Callers serialize per staff member; the client itself carries no
/// concurrency control.
#[async_trait]
pub trait ProvisioningClient: Send + Sync {
    /// Look up the account bound to `value` on the given channel.
    /// `value` need not be canonical; matching happens on the canonical
    /// bind value for the channel.
    async fn find_account_by_bind(
        &self,
        bind_type: BindType,
        iso: &str,
        value: &str,
    ) -> Result<Option<Account>, ProvisioningError>;

    /// Register a new account. Fails with [`ProvisioningError::Rejected`]
    /// if the bind value is already registered.
    async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpResult, ProvisioningError>;

    /// Deactivate an account. Idempotent: reports success even when the
    /// account is already absent.
    async fn sign_down(&self, account_id: AccountId) -> Result<bool, ProvisioningError>;
}

#[async_trait]
impl<C> ProvisioningClient for Arc<C>
where
    C: ProvisioningClient + ?Sized,
{
    async fn find_account_by_bind(
        &self,
        bind_type: BindType,
        iso: &str,
        value: &str,
    ) -> Result<Option<Account>, ProvisioningError> {
        (**self).find_account_by_bind(bind_type, iso, value).await
    }

    async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpResult, ProvisioningError> {
        (**self).sign_up(form).await
    }

    async fn sign_down(&self, account_id: AccountId) -> Result<bool, ProvisioningError> {
        (**self).sign_down(account_id).await
    }
}
