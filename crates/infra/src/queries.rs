//! Read-side queries spanning both registries.

use std::collections::BTreeSet;

use staffhub_core::{DeptId, PostId, StaffId};
use staffhub_org::Staff;

use crate::registry::{PostRegistry, StaffRegistry};

/// Staff currently assigned to any post of the given department.
///
/// Rebuilds each member's denormalized post view (ids + names) from
/// their active assignment records; the view covers all of the member's
/// posts, not only those inside the department.
pub fn department_roster<S, P>(staff: &S, posts: &P, dept_id: DeptId) -> Vec<Staff>
where
    S: StaffRegistry,
    P: PostRegistry,
{
    let dept_posts = posts.list_by_department(dept_id);
    let post_ids: BTreeSet<PostId> = dept_posts.iter().map(|p| p.id_typed()).collect();
    if post_ids.is_empty() {
        return Vec::new();
    }

    let links = staff.find_assignments_by_posts(&post_ids);
    let staff_ids: BTreeSet<StaffId> = links.iter().map(|sp| sp.staff_id).collect();

    let mut roster = Vec::new();
    for staff_id in staff_ids {
        let Some(mut member) = staff.get(staff_id) else {
            continue;
        };

        let mut ids = Vec::new();
        let mut names = Vec::new();
        for post_id in staff.find_active_assignments(staff_id) {
            if let Some(post) = posts.get(post_id) {
                ids.push(post_id);
                names.push(post.name().to_string());
            }
        }
        member.set_post_view(ids, names);
        roster.push(member);
    }
    roster
}
