//! Registry contracts for staff and posts.
//!
//! Registries are passive key-value stores: no concurrency control of
//! their own, no cross-record invariants. Serialization of the join/leave
//! workflow is the lifecycle coordinator's job.

use std::collections::BTreeSet;
use std::sync::Arc;

use staffhub_core::{DeptId, PostId, StaffId};
use staffhub_org::{Post, PostStatus, Staff, StaffPost};

/// Store of staff records and their post assignment records.
pub trait StaffRegistry: Send + Sync {
    /// Allocate a fresh store-assigned staff id.
    fn allocate_id(&self) -> StaffId;

    fn get(&self, staff_id: StaffId) -> Option<Staff>;

    fn save(&self, staff: Staff);

    fn list(&self) -> Vec<Staff>;

    /// Read-only status projection (pending / left listings).
    fn find_by_status(&self, status: PostStatus) -> Vec<Staff>;

    fn find_by_no(&self, no: &str) -> Option<Staff>;

    /// Post ids of this staff member's active assignment records.
    fn find_active_assignments(&self, staff_id: StaffId) -> BTreeSet<PostId>;

    /// Active assignment records touching any of the given posts.
    fn find_assignments_by_posts(&self, post_ids: &BTreeSet<PostId>) -> BTreeSet<StaffPost>;

    /// Create an assignment record. Upsert semantics: linking an already
    /// linked pair is a no-op (the pair stays unique).
    fn link(&self, staff_id: StaffId, post_id: PostId);

    /// Delete an assignment record, if present.
    fn unlink(&self, staff_id: StaffId, post_id: PostId);
}

/// Store of posts and their current exclusive occupant.
pub trait PostRegistry: Send + Sync {
    /// Allocate a fresh store-assigned post id.
    fn allocate_id(&self) -> PostId;

    fn get(&self, post_id: PostId) -> Option<Post>;

    fn save(&self, post: Post);

    /// Set or clear a post's occupant back-reference. No-op when the
    /// post does not exist.
    fn set_occupant(&self, post_id: PostId, staff_id: Option<StaffId>);

    fn list_by_department(&self, dept_id: DeptId) -> Vec<Post>;
}

impl<S> StaffRegistry for Arc<S>
where
    S: StaffRegistry + ?Sized,
{
    fn allocate_id(&self) -> StaffId {
        (**self).allocate_id()
    }

    fn get(&self, staff_id: StaffId) -> Option<Staff> {
        (**self).get(staff_id)
    }

    fn save(&self, staff: Staff) {
        (**self).save(staff)
    }

    fn list(&self) -> Vec<Staff> {
        (**self).list()
    }

    fn find_by_status(&self, status: PostStatus) -> Vec<Staff> {
        (**self).find_by_status(status)
    }

    fn find_by_no(&self, no: &str) -> Option<Staff> {
        (**self).find_by_no(no)
    }

    fn find_active_assignments(&self, staff_id: StaffId) -> BTreeSet<PostId> {
        (**self).find_active_assignments(staff_id)
    }

    fn find_assignments_by_posts(&self, post_ids: &BTreeSet<PostId>) -> BTreeSet<StaffPost> {
        (**self).find_assignments_by_posts(post_ids)
    }

    fn link(&self, staff_id: StaffId, post_id: PostId) {
        (**self).link(staff_id, post_id)
    }

    fn unlink(&self, staff_id: StaffId, post_id: PostId) {
        (**self).unlink(staff_id, post_id)
    }
}

impl<P> PostRegistry for Arc<P>
where
    P: PostRegistry + ?Sized,
{
    fn allocate_id(&self) -> PostId {
        (**self).allocate_id()
    }

    fn get(&self, post_id: PostId) -> Option<Post> {
        (**self).get(post_id)
    }

    fn save(&self, post: Post) {
        (**self).save(post)
    }

    fn set_occupant(&self, post_id: PostId, staff_id: Option<StaffId>) {
        (**self).set_occupant(post_id, staff_id)
    }

    fn list_by_department(&self, dept_id: DeptId) -> Vec<Post> {
        (**self).list_by_department(dept_id)
    }
}
