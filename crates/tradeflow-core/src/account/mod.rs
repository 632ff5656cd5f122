//! Mock sessions and the client registry.

pub mod model;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{TradeflowError, TradeflowResult};
use crate::role::{Actor, Role};
use model::{Client, NewClient, UserDetails};
use tradeflow_store::{clients, session, StorePool};

/// Sign in as a role. Replaces any existing session.
pub async fn sign_in(
    pool: &StorePool,
    name: &str,
    role: Role,
    email: Option<&str>,
    company: Option<&str>,
) -> TradeflowResult<UserDetails> {
    if name.trim().is_empty() {
        return Err(TradeflowError::validation("Name is required"));
    }
    let user = UserDetails {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email: email.map(str::to_string),
        role,
        company: company.map(str::to_string),
    };
    session::save_user_details(pool, &user.to_row()).await?;
    info!(role = %role, name = %user.name, "Signed in");
    Ok(user)
}

pub async fn sign_out(pool: &StorePool) -> TradeflowResult<()> {
    session::clear_user_details(pool).await?;
    Ok(())
}

/// The current session, if any.
pub async fn current_user(pool: &StorePool) -> TradeflowResult<Option<UserDetails>> {
    let Some(row) = session::get_user_details(pool).await? else {
        return Ok(None);
    };
    let role = row.role.clone();
    let user = UserDetails::from_row(row);
    if user.is_none() {
        warn!(role = %role, "Ignoring session with unknown role");
    }
    Ok(user)
}

/// Work out who is acting.
///
/// An explicit role wins; the session name is kept when it has the same role.
pub async fn resolve_actor(pool: &StorePool, role_override: Option<Role>) -> TradeflowResult<Actor> {
    let user = current_user(pool).await?;
    match (role_override, user) {
        (Some(role), Some(user)) if user.role == role => Ok(user.actor()),
        (Some(role), _) => Ok(Actor::new(role)),
        (None, Some(user)) => Ok(user.actor()),
        (None, None) => Err(TradeflowError::NotSignedIn),
    }
}

fn require_admin(actor: &Actor, action: &str) -> TradeflowResult<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(TradeflowError::Unauthorized {
            role: actor.role.as_str().to_string(),
            action: action.to_string(),
        })
    }
}

/// Register a new client.
pub async fn add_client(pool: &StorePool, actor: &Actor, input: NewClient) -> TradeflowResult<Client> {
    require_admin(actor, "manage clients")?;
    if input.name.trim().is_empty() {
        return Err(TradeflowError::validation("Client name is required"));
    }

    let mut rows = clients::list_clients(pool).await?;
    if let Some(email) = &input.email {
        if rows
            .iter()
            .any(|r| r.active && r.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)))
        {
            return Err(TradeflowError::validation(format!(
                "An active client with email {} already exists",
                email
            )));
        }
    }

    let client = Client {
        id: Uuid::new_v4().to_string(),
        name: input.name.trim().to_string(),
        email: input.email,
        role: input.role,
        company: input.company,
        active: true,
        joined_at: Utc::now().to_rfc3339(),
    };
    rows.push(client.to_row());
    clients::save_clients(pool, &rows).await?;
    info!(client = %client.name, role = %client.role, "Client added");
    Ok(client)
}

/// List clients, optionally including deactivated ones.
pub async fn list_clients(pool: &StorePool, include_inactive: bool) -> TradeflowResult<Vec<Client>> {
    let rows = clients::list_clients(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(Client::from_row)
        .filter(|c| include_inactive || c.active)
        .collect())
}

/// Deactivate a client by id or email.
pub async fn deactivate_client(pool: &StorePool, actor: &Actor, key: &str) -> TradeflowResult<Client> {
    require_admin(actor, "manage clients")?;
    let mut rows = clients::list_clients(pool).await?;
    let row = rows
        .iter_mut()
        .find(|r| r.id == key || r.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(key)))
        .ok_or_else(|| TradeflowError::ClientNotFound(key.to_string()))?;
    row.active = false;
    let updated = row.clone();
    clients::save_clients(pool, &rows).await?;

    Client::from_row(updated).ok_or_else(|| TradeflowError::ClientNotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let pool = StorePool::in_memory();
        assert!(current_user(&pool).await.unwrap().is_none());
        assert!(matches!(
            resolve_actor(&pool, None).await,
            Err(TradeflowError::NotSignedIn)
        ));

        sign_in(&pool, "Priya", Role::Buyer, None, Some("Meridian Retail"))
            .await
            .unwrap();
        let actor = resolve_actor(&pool, None).await.unwrap();
        assert_eq!(actor, Actor::named(Role::Buyer, "Meridian Retail"));

        // Override with another role drops the session name
        let actor = resolve_actor(&pool, Some(Role::Admin)).await.unwrap();
        assert_eq!(actor, Actor::new(Role::Admin));

        sign_out(&pool).await.unwrap();
        assert!(current_user(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_registry() {
        let pool = StorePool::in_memory();
        let admin = Actor::new(Role::Admin);
        let input = NewClient {
            name: "Northwind Capital".to_string(),
            email: Some("ops@northwind.example".to_string()),
            role: Role::Financier,
            company: None,
        };

        let err = add_client(&pool, &Actor::new(Role::Seller), input.clone()).await;
        assert!(matches!(err, Err(TradeflowError::Unauthorized { .. })));

        add_client(&pool, &admin, input.clone()).await.unwrap();
        assert!(add_client(&pool, &admin, input).await.is_err());

        let client = deactivate_client(&pool, &admin, "OPS@northwind.example").await.unwrap();
        assert!(!client.active);
        assert!(list_clients(&pool, false).await.unwrap().is_empty());
        assert_eq!(list_clients(&pool, true).await.unwrap().len(), 1);

        let err = deactivate_client(&pool, &admin, "missing").await;
        assert!(matches!(err, Err(TradeflowError::ClientNotFound(_))));
    }
}
