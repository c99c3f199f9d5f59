use serde::{Deserialize, Serialize};

/// Opaque user identifier issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Which side of the marketplace the signed-in user acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Partner,
    Admin,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Partner => "Pickup Partner",
            Role::Admin => "Admin",
        }
    }
}

/// Read-only auth context for the signed-in user.
///
/// Populated once at sign-in and cleared at sign-out; passed into the
/// views that need it rather than read from ambient globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub phone: String,
    pub display_name: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_partner(&self) -> bool {
        self.role == Role::Partner
    }
}
