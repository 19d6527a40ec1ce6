use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffhub_core::{AccountId, DomainError, DomainResult, Entity, PostId, StaffId, ValueObject};

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Record exists but the person has not been placed on a post yet.
    Pending,
    Employed,
    Left,
}

/// Personal contact fragment carried by a staff record.
///
/// `no` is the human-assigned staff number; it is unique across the
/// directory when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffFragment {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// ISO-3166 alpha-2 country code; falls back to the system default
    /// when absent.
    pub iso: Option<String>,
    pub no: Option<String>,
}

impl StaffFragment {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl ValueObject for StaffFragment {}

/// A person tracked for employment purposes, independent of their
/// authentication identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    id: StaffId,
    fragment: StaffFragment,
    post_status: PostStatus,
    joined_date: Option<DateTime<Utc>>,
    left_date: Option<DateTime<Utc>>,
    /// External authentication account, once provisioned.
    account_id: Option<AccountId>,
    disabled: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    /// Denormalized post view, rebuilt on read by roster queries. Never
    /// authoritative; the assignment records are.
    post_ids: Vec<PostId>,
    post_names: Vec<String>,
}

impl Staff {
    pub fn new(id: StaffId, fragment: StaffFragment) -> Self {
        Self {
            id,
            fragment,
            post_status: PostStatus::Pending,
            joined_date: None,
            left_date: None,
            account_id: None,
            disabled: false,
            created_at: None,
            updated_at: None,
            post_ids: Vec::new(),
            post_names: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> StaffId {
        self.id
    }

    pub fn fragment(&self) -> &StaffFragment {
        &self.fragment
    }

    pub fn set_fragment(&mut self, fragment: StaffFragment) {
        self.fragment = fragment;
    }

    pub fn post_status(&self) -> PostStatus {
        self.post_status
    }

    pub fn joined_date(&self) -> Option<DateTime<Utc>> {
        self.joined_date
    }

    pub fn left_date(&self) -> Option<DateTime<Utc>> {
        self.left_date
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    pub fn set_account_id(&mut self, account_id: Option<AccountId>) {
        self.account_id = account_id;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }

    pub fn stamp_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    /// Transition to `employed` as of `at`. Clears any previous left date.
    pub fn mark_joined(&mut self, at: DateTime<Utc>) {
        self.post_status = PostStatus::Employed;
        self.joined_date = Some(at);
        self.left_date = None;
    }

    /// Transition to `left` as of `at`.
    pub fn mark_left(&mut self, at: DateTime<Utc>) {
        self.post_status = PostStatus::Left;
        self.left_date = Some(at);
    }

    pub fn post_ids(&self) -> &[PostId] {
        &self.post_ids
    }

    pub fn post_names(&self) -> &[String] {
        &self.post_names
    }

    /// Replace the denormalized post view (roster reads only).
    pub fn set_post_view(&mut self, post_ids: Vec<PostId>, post_names: Vec<String>) {
        self.post_ids = post_ids;
        self.post_names = post_names;
    }

    /// Check the employment invariant against the count of active
    /// assignment records for this staff member.
    ///
    /// employed ⇒ no left date and at least one active assignment;
    /// left ⇒ left date set and no active assignments.
    pub fn employment_invariant(&self, active_assignments: usize) -> DomainResult<()> {
        match self.post_status {
            PostStatus::Employed => {
                if self.left_date.is_some() {
                    return Err(DomainError::invariant("employed staff has a left date"));
                }
                if active_assignments == 0 {
                    return Err(DomainError::invariant("employed staff holds no post"));
                }
            }
            PostStatus::Left => {
                if self.left_date.is_none() {
                    return Err(DomainError::invariant("left staff has no left date"));
                }
                if active_assignments != 0 {
                    return Err(DomainError::invariant("left staff still holds a post"));
                }
            }
            PostStatus::Pending => {}
        }
        Ok(())
    }
}

impl Entity for Staff {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
