//! Storage keys. These are the only persisted interface.

pub const CONTRACTS: &str = "contracts";
pub const PROJECTS: &str = "projects";
pub const INVOICES: &str = "invoices";
pub const FUNDED_INVOICES: &str = "fundedInvoices";
pub const NOTIFICATIONS: &str = "notifications";
pub const FINANCIER_NOTIFICATIONS: &str = "financierNotifications";
pub const ACTIVE_CLIENTS: &str = "activeClients";
pub const USER_DETAILS: &str = "userDetails";

pub const BUYER_PENDING_PREFIX: &str = "buyer_pending_contracts_";

/// Per-buyer queue of contracts awaiting a decision.
pub fn buyer_pending_contracts(buyer_id: &str) -> String {
    format!("{}{}", BUYER_PENDING_PREFIX, buyer_id)
}

/// Inverse of [`buyer_pending_contracts`].
pub fn buyer_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(BUYER_PENDING_PREFIX)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_key_roundtrip() {
        let key = buyer_pending_contracts("buyer-42");
        assert_eq!(key, "buyer_pending_contracts_buyer-42");
        assert_eq!(buyer_id_from_key(&key), Some("buyer-42"));
        assert_eq!(buyer_id_from_key("buyer_pending_contracts_"), None);
        assert_eq!(buyer_id_from_key("contracts"), None);
    }
}
