use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The authenticated identity a realtime connection is bound to.
///
/// Supplied by the auth layer; the channel actor only ever reads it to build the
/// connection handshake. A change of identity always means a fresh connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}

/// User roles as issued by the auth backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Restaurant,
    DeliveryPartner,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Customer => "CUSTOMER",
            Role::Restaurant => "RESTAURANT",
            Role::DeliveryPartner => "DELIVERY_PARTNER",
            Role::Admin => "ADMIN",
        };
        write!(f, "{s}")
    }
}
