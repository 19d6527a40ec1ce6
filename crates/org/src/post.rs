use serde::{Deserialize, Serialize};

use staffhub_core::{DeptId, Entity, PostId, StaffId};

/// An organizational position that can be held by at most one staff
/// member at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    dept_id: DeptId,
    name: String,
    /// Current exclusive occupant. Set and cleared only by the lifecycle
    /// coordinator.
    assign_for: Option<StaffId>,
}

impl Post {
    pub fn new(id: PostId, dept_id: DeptId, name: impl Into<String>) -> Self {
        Self {
            id,
            dept_id,
            name: name.into(),
            assign_for: None,
        }
    }

    pub fn id_typed(&self) -> PostId {
        self.id
    }

    pub fn dept_id(&self) -> DeptId {
        self.dept_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn holder(&self) -> Option<StaffId> {
        self.assign_for
    }

    pub fn is_vacant(&self) -> bool {
        self.assign_for.is_none()
    }

    pub fn is_held_by(&self, staff_id: StaffId) -> bool {
        self.assign_for == Some(staff_id)
    }

    pub fn assign_to(&mut self, staff_id: StaffId) {
        self.assign_for = Some(staff_id);
    }

    pub fn clear_assignment(&mut self) {
        self.assign_for = None;
    }
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
