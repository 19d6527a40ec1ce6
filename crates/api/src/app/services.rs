use std::collections::BTreeSet;
use std::sync::Arc;

use staffhub_core::{DeptId, PostId, StaffId};
use staffhub_infra::{
    AppConfig, InMemoryPostRegistry, InMemoryStaffRegistry, LifecycleError, PostRegistry,
    SignUpDefaults, StaffDirectory, StaffLifecycle, StaffRegistry, department_roster,
};
use staffhub_org::{Post, Staff};
use staffhub_provisioning::{HttpProvisioningClient, ProvisioningClient};

type Passport = Arc<dyn ProvisioningClient>;
type Lifecycle = StaffLifecycle<Arc<InMemoryStaffRegistry>, Arc<InMemoryPostRegistry>, Passport>;

/// Wired application services shared by all handlers.
pub struct AppServices {
    staff: Arc<InMemoryStaffRegistry>,
    posts: Arc<InMemoryPostRegistry>,
    directory: StaffDirectory<Arc<InMemoryStaffRegistry>>,
    lifecycle: Lifecycle,
}

/// Wire registries, the provisioning client, and the coordinator from
/// process configuration.
pub fn build_services(config: &AppConfig) -> AppServices {
    let staff = Arc::new(InMemoryStaffRegistry::new());
    let posts = Arc::new(InMemoryPostRegistry::new());

    let passport: Passport = Arc::new(
        HttpProvisioningClient::new(
            config.provisioning.base_url.clone(),
            config.provisioning.timeout,
        )
        .expect("failed to build provisioning client"),
    );

    let lifecycle = StaffLifecycle::new(
        staff.clone(),
        posts.clone(),
        passport,
        config.occupancy,
        SignUpDefaults {
            iso: config.provisioning.default_iso.clone(),
            password: config.provisioning.default_password.clone(),
        },
    );

    AppServices {
        staff: staff.clone(),
        posts,
        directory: StaffDirectory::new(staff),
        lifecycle,
    }
}

impl AppServices {
    pub fn directory(&self) -> &StaffDirectory<Arc<InMemoryStaffRegistry>> {
        &self.directory
    }

    pub async fn join(
        &self,
        staff_id: StaffId,
        post_ids: &BTreeSet<PostId>,
    ) -> Result<bool, LifecycleError> {
        self.lifecycle.join(staff_id, post_ids).await
    }

    pub async fn leave(&self, staff_id: StaffId) -> Result<bool, LifecycleError> {
        self.lifecycle.leave(staff_id).await
    }

    /// Staff record with its denormalized post view rebuilt.
    pub fn staff_with_posts(&self, staff_id: StaffId) -> Option<Staff> {
        let mut member = self.staff.get(staff_id)?;
        let mut ids = Vec::new();
        let mut names = Vec::new();
        for post_id in self.staff.find_active_assignments(staff_id) {
            if let Some(post) = self.posts.get(post_id) {
                ids.push(post_id);
                names.push(post.name().to_string());
            }
        }
        member.set_post_view(ids, names);
        Some(member)
    }

    pub fn create_post(&self, dept_id: DeptId, name: String) -> Post {
        let post = Post::new(self.posts.allocate_id(), dept_id, name);
        self.posts.save(post.clone());
        post
    }

    pub fn posts_by_department(&self, dept_id: DeptId) -> Vec<Post> {
        self.posts.list_by_department(dept_id)
    }

    pub fn roster(&self, dept_id: DeptId) -> Vec<Staff> {
        department_roster(&self.staff, &self.posts, dept_id)
    }
}
