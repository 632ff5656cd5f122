//! Session and client models.

use serde::{Deserialize, Serialize};
use tradeflow_store::clients::ClientRow;
use tradeflow_store::session::UserDetailsRow;

use crate::role::{Actor, Role};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub company: Option<String>,
}

impl UserDetails {
    /// Returns `None` when the stored role is not recognized.
    pub fn from_row(row: UserDetailsRow) -> Option<Self> {
        let role = row.role.parse().ok()?;
        Some(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            company: row.company,
        })
    }

    pub fn to_row(&self) -> UserDetailsRow {
        UserDetailsRow {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.as_str().to_string(),
            company: self.company.clone(),
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::named(self.role, self.display_name())
    }

    /// Company name when set, otherwise the person's name.
    pub fn display_name(&self) -> String {
        self.company.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// A marketplace participant managed by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub company: Option<String>,
    pub active: bool,
    pub joined_at: String,
}

impl Client {
    pub fn from_row(row: ClientRow) -> Option<Self> {
        let role = row.role.parse().ok()?;
        Some(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            company: row.company,
            active: row.active,
            joined_at: row.joined_at,
        })
    }

    pub fn to_row(&self) -> ClientRow {
        ClientRow {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.as_str().to_string(),
            company: self.company.clone(),
            active: self.active,
            joined_at: self.joined_at.clone(),
        }
    }
}

/// Input for registering a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub company: Option<String>,
}
