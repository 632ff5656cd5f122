//! Tradeflow Web Server
//!
//! Axum-based REST API and WebSocket event stream for the role dashboards.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tradeflow_core::Engine;

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Dashboards
        .route("/dashboard/{role}", get(routes::dashboard::get_dashboard))
        // Contracts
        .route(
            "/contracts",
            get(routes::contracts::list_contracts).post(routes::contracts::create_contract),
        )
        .route("/contracts/{id}", get(routes::contracts::get_contract))
        .route("/contracts/{id}/decision", post(routes::contracts::decide_contract))
        .route("/contracts/{id}/revision", post(routes::contracts::revise_contract))
        .route(
            "/buyers/{buyer_id}/pending-contracts",
            get(routes::contracts::pending_for_buyer),
        )
        // Projects
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route("/projects/{id}", get(routes::projects::get_project))
        .route("/projects/{id}/decision", post(routes::projects::decide_project))
        .route("/projects/{id}/activate", post(routes::projects::activate_project))
        .route("/projects/{id}/finance", post(routes::projects::finance_project))
        // Invoices
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route("/invoices/{number}", get(routes::invoices::get_invoice))
        .route("/invoices/{number}/submit", post(routes::invoices::submit_invoice))
        .route("/invoices/{number}/decision", post(routes::invoices::decide_invoice))
        .route("/invoices/{number}/quote", post(routes::invoices::quote_invoice))
        .route("/invoices/{number}/fund", post(routes::invoices::fund_invoice))
        .route("/invoices/{number}/settle", post(routes::invoices::settle_invoice))
        // Funding
        .route("/funded", get(routes::funding::list_funded))
        .route("/opportunities", get(routes::funding::list_opportunities))
        // Notifications
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/read-all", post(routes::notifications::mark_all_read))
        .route("/notifications/{id}/read", post(routes::notifications::mark_read))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/internal/notify", post(routes::internal::notify))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(engine: Engine, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(engine);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tradeflow_store::{StorePool, WorkflowEvent};

    fn app() -> (Router, AppState) {
        let state = AppState::new(Engine::new(StorePool::in_memory()));
        (create_router(state.clone()), state)
    }

    async fn call(app: &Router, method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header(routes::ROLE_HEADER, role);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn contract_body() -> Value {
        json!({
            "title": "Cotton yarn supply",
            "code": "CTR-9",
            "contractType": "Supply",
            "value": 2500000,
            "paymentTerms": "Net 60",
            "startDate": "2026-03-01",
            "endDate": "2027-02-28",
            "buyerId": "b1"
        })
    }

    #[tokio::test]
    async fn test_contract_lifecycle_over_http() {
        let (app, _) = app();

        let (status, created) = call(&app, "POST", "/api/contracts", Some("seller"), Some(contract_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Pending");

        let (status, queue) = call(&app, "GET", "/api/buyers/b1/pending-contracts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(queue.as_array().unwrap().len(), 1);

        let (status, _) = call(
            &app,
            "POST",
            "/api/contracts/CTR-9/decision",
            Some("seller"),
            Some(json!({"decision": "approve"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, decided) = call(
            &app,
            "POST",
            "/api/contracts/CTR-9/decision",
            Some("buyer"),
            Some(json!({"decision": "approve", "comment": "ok"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decided["status"], "Approved");

        let (status, _) = call(
            &app,
            "POST",
            "/api/contracts/CTR-9/decision",
            Some("buyer"),
            Some(json!({"decision": "reject"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, financier_view) = call(&app, "GET", "/api/contracts?role=financier", None, None).await;
        assert_eq!(financier_view.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_map_to_statuses() {
        let (app, _) = app();

        let (status, _) = call(&app, "GET", "/api/contracts/missing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "POST", "/api/contracts", None, Some(contract_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, "GET", "/api/dashboard/auditor", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invoice_funding_over_http() {
        let (app, _) = app();
        let invoice = json!({
            "invoiceNumber": "INV-77",
            "totalAmount": 1000000,
            "buyerName": "Meridian Retail",
            "sellerName": "Asha Textiles",
            "dueDate": "2099-01-01",
            "submit": true
        });
        let (status, _) = call(&app, "POST", "/api/invoices", Some("seller"), Some(invoice)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            &app,
            "POST",
            "/api/invoices/INV-77/decision",
            Some("buyer"),
            Some(json!({"decision": "approve"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, quote) = call(
            &app,
            "POST",
            "/api/invoices/INV-77/quote",
            None,
            Some(json!({"discountRate": 12, "tenureDays": 90})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quote["discountAmount"], json!(29589.04));

        let (_, opportunities) = call(&app, "GET", "/api/opportunities", None, None).await;
        assert_eq!(opportunities.as_array().unwrap().len(), 1);

        let (status, funded) = call(
            &app,
            "POST",
            "/api/invoices/INV-77/fund",
            Some("financier"),
            Some(json!({"discountRate": 12, "tenureDays": 90})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(funded["status"], "Funded");

        let (_, portfolio) = call(&app, "GET", "/api/funded", None, None).await;
        assert_eq!(portfolio["summary"]["positions"], 1);

        let (_, opportunities) = call(&app, "GET", "/api/opportunities", None, None).await;
        assert!(opportunities.as_array().unwrap().is_empty());

        let (_, dashboard) = call(&app, "GET", "/api/dashboard/seller", None, None).await;
        assert_eq!(dashboard["fundedInvoices"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notifications_read_flow() {
        let (app, _) = app();
        call(&app, "POST", "/api/contracts", Some("seller"), Some(contract_body())).await;

        let (_, unread) = call(&app, "GET", "/api/notifications?unread=true", Some("buyer"), None).await;
        let unread = unread.as_array().unwrap();
        assert_eq!(unread.len(), 1);
        let id = unread[0]["id"].as_str().unwrap().to_string();

        let (status, _) = call(&app, "POST", &format!("/api/notifications/{}/read", id), Some("buyer"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, unread) = call(&app, "GET", "/api/notifications?role=buyer&unread=true", None, None).await;
        assert!(unread.as_array().unwrap().is_empty());

        // Financiers were never addressed
        let (status, _) = call(&app, "POST", &format!("/api/notifications/{}/read", id), Some("financier"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_internal_notify_rebroadcasts() {
        let (app, state) = app();
        let mut rx = state.tx.subscribe();

        let (status, _) = call(&app, "POST", "/internal/notify", None, Some(json!({"type": "storeRefresh"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.recv().await.unwrap(), WorkflowEvent::StoreRefresh);
    }
}
