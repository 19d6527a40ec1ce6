//! Staff lifecycle coordination: the join/leave workflow.
//!
//! The coordinator is the only writer of assignment records and post
//! occupancy. Each operation validates its inputs, takes the per-staff
//! lock, commits local registry mutations, then performs the remote
//! provisioning step. The remote step is idempotent (lookup before
//! sign-up, lookup before sign-down), so a provisioning failure leaves
//! local state committed and the operation safe to repeat.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Utc;
use thiserror::Error;

use staffhub_core::{DomainError, PostId, StaffId};
use staffhub_org::Staff;
use staffhub_provisioning::{BindType, ProvisioningClient, ProvisioningError, SignUpForm};

use crate::keyed_lock::KeyedLocks;
use crate::registry::{PostRegistry, StaffRegistry};

/// What `join` does with a requested post already held by someone else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OccupancyPolicy {
    /// Last-writer-wins: detach the previous holder's assignment record
    /// and take the post.
    #[default]
    Reassign,
    /// Reject the join with a conflict before any mutation.
    Exclusive,
}

impl FromStr for OccupancyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reassign" => Ok(OccupancyPolicy::Reassign),
            "exclusive" => Ok(OccupancyPolicy::Exclusive),
            other => Err(format!("unknown occupancy policy: {other}")),
        }
    }
}

/// Defaults applied when signing up an account for a staff member.
#[derive(Debug, Clone)]
pub struct SignUpDefaults {
    /// ISO-3166 alpha-2 fallback when the staff fragment carries none.
    pub iso: String,
    /// System-default initial password.
    pub password: String,
}

/// Application-level error for the join/leave workflow.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Rejected before any mutation (bad ids, empty post set).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced staff or post does not exist; no mutation happened.
    #[error("not found: {0}")]
    NotFound(String),

    /// Occupancy conflict under the exclusive policy; no mutation happened.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The remote provisioning step failed after local state was
    /// committed. Repeating the operation finishes provisioning.
    #[error("provisioning failed: {0}")]
    Provisioning(#[from] ProvisioningError),
}

impl From<DomainError> for LifecycleError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                LifecycleError::Validation(msg)
            }
            DomainError::InvariantViolation(msg) => LifecycleError::Invariant(msg),
            DomainError::Conflict(msg) => LifecycleError::Conflict(msg),
            DomainError::NotFound => LifecycleError::NotFound("record".to_string()),
        }
    }
}

/// Coordinates join/leave across the staff registry, the post registry,
/// and the identity provisioning client.
pub struct StaffLifecycle<S, P, C> {
    staff: S,
    posts: P,
    passport: C,
    locks: KeyedLocks<StaffId>,
    policy: OccupancyPolicy,
    defaults: SignUpDefaults,
}

impl<S, P, C> StaffLifecycle<S, P, C>
where
    S: StaffRegistry,
    P: PostRegistry,
    C: ProvisioningClient,
{
    pub fn new(staff: S, posts: P, passport: C, policy: OccupancyPolicy, defaults: SignUpDefaults) -> Self {
        Self {
            staff,
            posts,
            passport,
            locks: KeyedLocks::new(),
            policy,
            defaults,
        }
    }

    pub fn policy(&self) -> OccupancyPolicy {
        self.policy
    }

    /// Place a staff member on exactly the given set of posts and make
    /// sure an authentication account exists for them.
    ///
    /// Assignments outside `post_ids` are removed, already-linked posts
    /// are untouched, missing links are created. Calling again with the
    /// same set is a no-op apart from the date stamps.
    pub async fn join(
        &self,
        staff_id: StaffId,
        post_ids: &BTreeSet<PostId>,
    ) -> Result<bool, LifecycleError> {
        if !staff_id.is_positive() {
            return Err(LifecycleError::Validation("staff id must be positive".to_string()));
        }
        if post_ids.is_empty() {
            return Err(LifecycleError::Validation("post ids must not be empty".to_string()));
        }

        tracing::info!(%staff_id, ?post_ids, "join");
        let _guard = self.locks.acquire(staff_id).await;

        let mut staff = self
            .staff
            .get(staff_id)
            .ok_or_else(|| LifecycleError::NotFound(format!("staff {staff_id}")))?;
        let existing = self.staff.find_active_assignments(staff_id);

        // Validate every referenced post before touching any state.
        for &post_id in post_ids {
            let post = self
                .posts
                .get(post_id)
                .ok_or_else(|| LifecycleError::NotFound(format!("post {post_id}")))?;
            if self.policy == OccupancyPolicy::Exclusive && !existing.contains(&post_id) {
                if let Some(holder) = post.holder() {
                    if holder != staff_id {
                        return Err(LifecycleError::Conflict(format!(
                            "post {post_id} is held by staff {holder}"
                        )));
                    }
                }
            }
        }

        staff.mark_joined(Utc::now());
        self.staff.save(staff.clone());

        // Drop assignments outside the requested set, freeing their posts.
        for &post_id in existing.difference(post_ids) {
            self.posts.set_occupant(post_id, None);
            self.staff.unlink(staff_id, post_id);
        }

        // Create the missing links; already-linked posts stay untouched.
        for &post_id in post_ids.difference(&existing) {
            if self.policy == OccupancyPolicy::Reassign {
                if let Some(previous) = self.posts.get(post_id).and_then(|p| p.holder()) {
                    if previous != staff_id {
                        // Keep the one-holder invariant: the ousted
                        // holder's record goes away with the post.
                        self.staff.unlink(previous, post_id);
                    }
                }
            }
            self.posts.set_occupant(post_id, Some(staff_id));
            self.staff.link(staff_id, post_id);
        }

        self.ensure_account(&mut staff).await?;
        Ok(true)
    }

    /// Mark a staff member as having left, release every post they hold,
    /// and deactivate their authentication account if one is bound.
    pub async fn leave(&self, staff_id: StaffId) -> Result<bool, LifecycleError> {
        if !staff_id.is_positive() {
            return Err(LifecycleError::Validation("staff id must be positive".to_string()));
        }

        tracing::info!(%staff_id, "leave");
        let _guard = self.locks.acquire(staff_id).await;

        let mut staff = self
            .staff
            .get(staff_id)
            .ok_or_else(|| LifecycleError::NotFound(format!("staff {staff_id}")))?;

        staff.mark_left(Utc::now());
        self.staff.save(staff.clone());

        for post_id in self.staff.find_active_assignments(staff_id) {
            self.posts.set_occupant(post_id, None);
            self.staff.unlink(staff_id, post_id);
        }

        self.retire_account(&staff).await?;
        Ok(true)
    }

    /// Idempotent sign-up: look up the account bound to the staff email
    /// and only register when none exists.
    async fn ensure_account(&self, staff: &mut Staff) -> Result<(), LifecycleError> {
        let fragment = staff.fragment().clone();
        let iso = fragment.iso.clone().unwrap_or_else(|| self.defaults.iso.clone());

        let bound = self
            .passport
            .find_account_by_bind(BindType::Email, &iso, &fragment.email)
            .await?;

        if let Some(account) = bound {
            tracing::debug!(username = %account.username, "account already bound");
            if staff.account_id() != Some(account.id) {
                staff.set_account_id(Some(account.id));
                self.staff.save(staff.clone());
            }
            return Ok(());
        }

        let form = SignUpForm {
            account_type: BindType::Email,
            iso,
            account: fragment.email.clone(),
            password: self.defaults.password.clone(),
            first_name: fragment.first_name.clone(),
            last_name: fragment.last_name.clone(),
        };
        let result = self.passport.sign_up(&form).await?;
        tracing::info!(user_id = %result.user_id, username = %result.username, "account signed up");

        staff.set_account_id(Some(result.user_id));
        self.staff.save(staff.clone());
        Ok(())
    }

    /// Idempotent sign-down: absence of a bound account is a no-op.
    async fn retire_account(&self, staff: &Staff) -> Result<(), LifecycleError> {
        let fragment = staff.fragment();
        let iso = fragment.iso.clone().unwrap_or_else(|| self.defaults.iso.clone());

        let bound = self
            .passport
            .find_account_by_bind(BindType::Email, &iso, &fragment.email)
            .await?;

        if let Some(account) = bound {
            let done = self.passport.sign_down(account.id).await?;
            tracing::debug!(username = %account.username, done, "account signed down");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_policy_parses_known_values() {
        assert_eq!("reassign".parse::<OccupancyPolicy>().unwrap(), OccupancyPolicy::Reassign);
        assert_eq!("Exclusive".parse::<OccupancyPolicy>().unwrap(), OccupancyPolicy::Exclusive);
        assert!("both".parse::<OccupancyPolicy>().is_err());
    }

    #[test]
    fn domain_errors_map_onto_lifecycle_classes() {
        assert!(matches!(
            LifecycleError::from(DomainError::validation("bad")),
            LifecycleError::Validation(_)
        ));
        assert!(matches!(
            LifecycleError::from(DomainError::not_found()),
            LifecycleError::NotFound(_)
        ));
        assert!(matches!(
            LifecycleError::from(DomainError::conflict("taken")),
            LifecycleError::Conflict(_)
        ));
    }
}
