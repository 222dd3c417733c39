use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    Leader,
    Lecturer,
    Academic,
    Admin,
}

impl Role {
    /// Roles that may open borrowing requests.
    pub fn can_request(self) -> bool {
        matches!(self, Role::Member | Role::Leader | Role::Lecturer)
    }

    /// Roles that may approve, reject, hand over and check in kits.
    pub fn can_approve(self) -> bool {
        matches!(self, Role::Admin | Role::Academic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
}
