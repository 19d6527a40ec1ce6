//! In-memory registries for tests/dev.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use staffhub_core::{DeptId, PostId, StaffId};
use staffhub_org::{Post, PostStatus, Staff, StaffPost};

use crate::registry::{PostRegistry, StaffRegistry};

/// In-memory staff + assignment store.
#[derive(Debug)]
pub struct InMemoryStaffRegistry {
    staff: RwLock<HashMap<StaffId, Staff>>,
    links: RwLock<BTreeSet<StaffPost>>,
    next_id: AtomicI64,
}

impl InMemoryStaffRegistry {
    pub fn new() -> Self {
        Self {
            staff: RwLock::new(HashMap::new()),
            links: RwLock::new(BTreeSet::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStaffRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StaffRegistry for InMemoryStaffRegistry {
    fn allocate_id(&self) -> StaffId {
        StaffId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn get(&self, staff_id: StaffId) -> Option<Staff> {
        let map = self.staff.read().ok()?;
        map.get(&staff_id).cloned()
    }

    fn save(&self, staff: Staff) {
        // Keep the id sequence ahead of explicitly keyed records.
        let id = staff.id_typed().get();
        self.next_id.fetch_max(id + 1, Ordering::Relaxed);
        if let Ok(mut map) = self.staff.write() {
            map.insert(staff.id_typed(), staff);
        }
    }

    fn list(&self) -> Vec<Staff> {
        let map = match self.staff.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().cloned().collect()
    }

    fn find_by_status(&self, status: PostStatus) -> Vec<Staff> {
        let map = match self.staff.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values()
            .filter(|s| s.post_status() == status)
            .cloned()
            .collect()
    }

    fn find_by_no(&self, no: &str) -> Option<Staff> {
        let map = self.staff.read().ok()?;
        map.values()
            .find(|s| s.fragment().no.as_deref() == Some(no))
            .cloned()
    }

    fn find_active_assignments(&self, staff_id: StaffId) -> BTreeSet<PostId> {
        let links = match self.links.read() {
            Ok(l) => l,
            Err(_) => return BTreeSet::new(),
        };
        links
            .iter()
            .filter(|sp| sp.staff_id == staff_id)
            .map(|sp| sp.post_id)
            .collect()
    }

    fn find_assignments_by_posts(&self, post_ids: &BTreeSet<PostId>) -> BTreeSet<StaffPost> {
        let links = match self.links.read() {
            Ok(l) => l,
            Err(_) => return BTreeSet::new(),
        };
        links
            .iter()
            .filter(|sp| post_ids.contains(&sp.post_id))
            .copied()
            .collect()
    }

    fn link(&self, staff_id: StaffId, post_id: PostId) {
        if let Ok(mut links) = self.links.write() {
            links.insert(StaffPost::new(staff_id, post_id));
        }
    }

    fn unlink(&self, staff_id: StaffId, post_id: PostId) {
        if let Ok(mut links) = self.links.write() {
            links.remove(&StaffPost::new(staff_id, post_id));
        }
    }
}

/// In-memory post store.
#[derive(Debug)]
pub struct InMemoryPostRegistry {
    posts: RwLock<HashMap<PostId, Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRegistry {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryPostRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PostRegistry for InMemoryPostRegistry {
    fn allocate_id(&self) -> PostId {
        PostId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn get(&self, post_id: PostId) -> Option<Post> {
        let map = self.posts.read().ok()?;
        map.get(&post_id).cloned()
    }

    fn save(&self, post: Post) {
        let id = post.id_typed().get();
        self.next_id.fetch_max(id + 1, Ordering::Relaxed);
        if let Ok(mut map) = self.posts.write() {
            map.insert(post.id_typed(), post);
        }
    }

    fn set_occupant(&self, post_id: PostId, staff_id: Option<StaffId>) {
        if let Ok(mut map) = self.posts.write() {
            if let Some(post) = map.get_mut(&post_id) {
                match staff_id {
                    Some(id) => post.assign_to(id),
                    None => post.clear_assignment(),
                }
            }
        }
    }

    fn list_by_department(&self, dept_id: DeptId) -> Vec<Post> {
        let map = match self.posts.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut posts: Vec<Post> = map
            .values()
            .filter(|p| p.dept_id() == dept_id)
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.id_typed());
        posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_org::StaffFragment;

    fn fragment(no: &str) -> StaffFragment {
        StaffFragment {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: format!("{}@example.com", no.to_lowercase()),
            phone: None,
            iso: None,
            no: Some(no.to_string()),
        }
    }

    #[test]
    fn allocate_id_stays_ahead_of_explicit_keys() {
        let reg = InMemoryStaffRegistry::new();
        reg.save(Staff::new(StaffId::new(42), fragment("E-042")));
        assert!(reg.allocate_id().get() > 42);
    }

    #[test]
    fn link_is_idempotent_per_pair() {
        let reg = InMemoryStaffRegistry::new();
        reg.link(StaffId::new(1), PostId::new(101));
        reg.link(StaffId::new(1), PostId::new(101));
        assert_eq!(reg.find_active_assignments(StaffId::new(1)).len(), 1);
    }

    #[test]
    fn find_assignments_by_posts_filters_by_post_set() {
        let reg = InMemoryStaffRegistry::new();
        reg.link(StaffId::new(1), PostId::new(101));
        reg.link(StaffId::new(2), PostId::new(102));
        reg.link(StaffId::new(3), PostId::new(103));

        let wanted: BTreeSet<PostId> = [PostId::new(101), PostId::new(103)].into();
        let found = reg.find_assignments_by_posts(&wanted);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|sp| wanted.contains(&sp.post_id)));
    }

    #[test]
    fn find_by_no_matches_fragment_number() {
        let reg = InMemoryStaffRegistry::new();
        reg.save(Staff::new(StaffId::new(1), fragment("E-001")));
        assert!(reg.find_by_no("E-001").is_some());
        assert!(reg.find_by_no("E-002").is_none());
    }

    #[test]
    fn list_by_department_is_ordered_and_scoped() {
        let reg = InMemoryPostRegistry::new();
        reg.save(Post::new(PostId::new(103), DeptId::new(1), "Analyst"));
        reg.save(Post::new(PostId::new(101), DeptId::new(1), "Dispatcher"));
        reg.save(Post::new(PostId::new(102), DeptId::new(2), "Auditor"));

        let dept1 = reg.list_by_department(DeptId::new(1));
        let ids: Vec<i64> = dept1.iter().map(|p| p.id_typed().get()).collect();
        assert_eq!(ids, vec![101, 103]);
    }

    #[test]
    fn set_occupant_updates_and_clears() {
        let reg = InMemoryPostRegistry::new();
        reg.save(Post::new(PostId::new(101), DeptId::new(1), "Dispatcher"));

        reg.set_occupant(PostId::new(101), Some(StaffId::new(42)));
        assert_eq!(reg.get(PostId::new(101)).unwrap().holder(), Some(StaffId::new(42)));

        reg.set_occupant(PostId::new(101), None);
        assert!(reg.get(PostId::new(101)).unwrap().is_vacant());
    }
}
