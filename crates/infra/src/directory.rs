//! Administrative staff directory: create/update records and status
//! listings. Post placement is the lifecycle coordinator's job; records
//! created here start pending.

use chrono::Utc;

use staffhub_core::{DomainError, DomainResult, StaffId};
use staffhub_org::{PostStatus, Staff, StaffFragment};

use crate::registry::StaffRegistry;

/// Create-or-update request for a staff record.
#[derive(Debug, Clone)]
pub struct StaffUpsert {
    /// Present on update, absent on create.
    pub id: Option<StaffId>,
    pub fragment: StaffFragment,
}

/// Staff directory service over a staff registry.
#[derive(Debug)]
pub struct StaffDirectory<S> {
    staff: S,
}

impl<S> StaffDirectory<S>
where
    S: StaffRegistry,
{
    pub fn new(staff: S) -> Self {
        Self { staff }
    }

    /// Create a pending staff record, or update an existing one's
    /// fragment. A staff number, when present, must be unique across
    /// the directory.
    pub fn upsert(&self, req: StaffUpsert) -> DomainResult<StaffId> {
        if let Some(no) = req.fragment.no.as_deref() {
            if !no.is_empty() {
                if let Some(existing) = self.staff.find_by_no(no) {
                    if req.id != Some(existing.id_typed()) {
                        return Err(DomainError::conflict(format!(
                            "staff number {no} already in use"
                        )));
                    }
                }
            }
        }

        match req.id {
            Some(id) => {
                let mut staff = self.staff.get(id).ok_or_else(DomainError::not_found)?;
                staff.set_fragment(req.fragment);
                staff.stamp_updated(Utc::now());
                self.staff.save(staff);
                Ok(id)
            }
            None => {
                let id = self.staff.allocate_id();
                let mut staff = Staff::new(id, req.fragment);
                staff.stamp_created(Utc::now());
                self.staff.save(staff);
                Ok(id)
            }
        }
    }

    pub fn get(&self, id: StaffId) -> Option<Staff> {
        self.staff.get(id)
    }

    pub fn list(&self) -> Vec<Staff> {
        self.staff.list()
    }

    /// Staff created but never placed on a post.
    pub fn find_pendings(&self) -> Vec<Staff> {
        self.staff.find_by_status(PostStatus::Pending)
    }

    /// Staff who have left.
    pub fn find_lefts(&self) -> Vec<Staff> {
        self.staff.find_by_status(PostStatus::Left)
    }
}
