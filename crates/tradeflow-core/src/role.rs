//! Marketplace roles and the actor performing an action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TradeflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Admin,
    Financier,
    Buyer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Seller, Role::Admin, Role::Financier, Role::Buyer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Admin => "admin",
            Self::Financier => "financier",
            Self::Buyer => "buyer",
        }
    }

    /// Parse a list of stored role names, dropping unknown ones.
    pub fn parse_list(values: &[String]) -> Vec<Role> {
        values.iter().filter_map(|v| v.parse().ok()).collect()
    }

    pub fn to_strings(roles: &[Role]) -> Vec<String> {
        roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl FromStr for Role {
    type Err = TradeflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            "financier" => Ok(Self::Financier),
            "buyer" => Ok(Self::Buyer),
            other => Err(TradeflowError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub role: Role,
    pub name: Option<String>,
}

impl Actor {
    pub fn new(role: Role) -> Self {
        Self { role, name: None }
    }

    pub fn named(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: Some(name.into()),
        }
    }

    /// Display label: the name if known, otherwise the role.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.role.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!("Seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!(" financier ".parse::<Role>().unwrap(), Role::Financier);
        assert!(matches!(
            "auditor".parse::<Role>(),
            Err(TradeflowError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_parse_list_drops_unknown() {
        let stored = vec!["buyer".to_string(), "ghost".to_string(), "ADMIN".to_string()];
        assert_eq!(Role::parse_list(&stored), vec![Role::Buyer, Role::Admin]);
    }
}
