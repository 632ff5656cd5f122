//! Role-targeted notifications.

pub mod model;

use crate::error::TradeflowResult;
use crate::role::{Actor, Role};
use crate::workflow::{Action, Engine};
use model::Notification;
use tradeflow_store::notifications as queries;
use tradeflow_store::StorePool;

/// All notifications, oldest first.
pub async fn list_notifications(pool: &StorePool) -> TradeflowResult<Vec<Notification>> {
    let rows = queries::list_notifications(pool).await?;
    Ok(rows.into_iter().map(Notification::from_row).collect())
}

/// Notifications addressed to a role, newest first.
pub async fn list_for_role(
    pool: &StorePool,
    role: Role,
    unread_only: bool,
) -> TradeflowResult<Vec<Notification>> {
    let rows = queries::list_notifications_for_role(pool, role.as_str()).await?;
    Ok(rows
        .into_iter()
        .map(Notification::from_row)
        .filter(|n| !unread_only || !n.read)
        .collect())
}

/// Mark one notification as read on behalf of a role.
pub async fn mark_read(engine: &Engine, actor: &Actor, id: &str) -> TradeflowResult<()> {
    engine
        .dispatch(Action::MarkNotificationRead {
            id: id.to_string(),
            actor: actor.clone(),
        })
        .await?;
    Ok(())
}

/// Mark every notification addressed to the actor's role as read.
pub async fn mark_all_read(engine: &Engine, actor: &Actor) -> TradeflowResult<()> {
    engine
        .dispatch(Action::MarkAllNotificationsRead {
            actor: actor.clone(),
        })
        .await?;
    Ok(())
}
