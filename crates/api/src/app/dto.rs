use serde::Deserialize;
use serde_json::{Value, json};

use staffhub_core::StaffId;
use staffhub_org::{Post, PostStatus, Staff, StaffFragment};

use staffhub_infra::StaffUpsert;

/// Create-or-update request for a staff record.
#[derive(Debug, Deserialize)]
pub struct UpsertStaffRequest {
    /// Present on update, absent on create.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub iso: Option<String>,
    pub no: Option<String>,
}

impl UpsertStaffRequest {
    pub fn into_upsert(self) -> StaffUpsert {
        StaffUpsert {
            id: self.id.map(StaffId::new),
            fragment: StaffFragment {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                iso: self.iso,
                no: self.no,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub post_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub dept_id: i64,
    pub name: String,
}

fn status_str(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Pending => "pending",
        PostStatus::Employed => "employed",
        PostStatus::Left => "left",
    }
}

pub fn staff_to_json(staff: &Staff) -> Value {
    json!({
        "id": staff.id_typed().get(),
        "name": staff.fragment().display_name(),
        "first_name": staff.fragment().first_name,
        "last_name": staff.fragment().last_name,
        "email": staff.fragment().email,
        "no": staff.fragment().no,
        "disabled": staff.is_disabled(),
        "post_status": status_str(staff.post_status()),
        "joined_date": staff.joined_date(),
        "left_date": staff.left_date(),
        "account_id": staff.account_id().map(|id| id.get()),
        "post_ids": staff.post_ids().iter().map(|id| id.get()).collect::<Vec<_>>(),
        "post_names": staff.post_names(),
    })
}

pub fn post_to_json(post: &Post) -> Value {
    json!({
        "id": post.id_typed().get(),
        "dept_id": post.dept_id().get(),
        "name": post.name(),
        "assign_for": post.holder().map(|id| id.get()),
    })
}
