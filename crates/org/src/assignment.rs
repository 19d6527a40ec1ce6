use serde::{Deserialize, Serialize};

use staffhub_core::{PostId, StaffId};

/// Assignment record linking one staff member to one post.
///
/// Created on join and destroyed on leave or reassignment, exclusively by
/// the lifecycle coordinator. A given (staff, post) pair appears at most
/// once among active records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffPost {
    pub staff_id: StaffId,
    pub post_id: PostId,
}

impl StaffPost {
    pub fn new(staff_id: StaffId, post_id: PostId) -> Self {
        Self { staff_id, post_id }
    }

    pub fn key(&self) -> (StaffId, PostId) {
        (self.staff_id, self.post_id)
    }
}
