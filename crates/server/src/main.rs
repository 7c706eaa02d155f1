use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use server_api::{apply_update, ApiContext};
use shared::{
    domain::OrderLine,
    error::ApiError,
    protocol::{UpdateOutcome, UpdateTrigger},
};
use storage::TsvStore;
use tokio::sync::RwLock;
use tracing::info;

mod config;
mod loader;

use config::{load_settings, parse_remote_url};

const INDEX_HTML: &str = include_str!("../assets/index.html");

struct AppState {
    api: ApiContext,
    /// Authoritative in-memory dataset. Handlers thread it through each
    /// interaction; there is no other mutable process state.
    table: RwLock<Vec<OrderLine>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let remote_url = parse_remote_url(&settings.remote_url)?;
    let store = TsvStore::new(&settings.cache_path);
    let rows = loader::load_dataset(&store, &remote_url).await?;
    info!(
        rows = rows.len(),
        cache = %store.path().display(),
        "dataset ready"
    );

    let state = AppState {
        api: ApiContext { store },
        table: RwLock::new(rows),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/orders", get(list_orders))
        .route("/api/orders/update", post(update_orders))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<OrderLine>> {
    Json(state.table.read().await.clone())
}

/// One full interaction cycle. The write lock is held until the outcome is
/// committed, so updates are processed strictly one at a time.
async fn update_orders(
    State(state): State<Arc<AppState>>,
    Json(trigger): Json<UpdateTrigger>,
) -> Result<Json<UpdateOutcome>, (StatusCode, Json<ApiError>)> {
    let mut table = state.table.write().await;
    let result = apply_update(&state.api, trigger)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(e)))?;
    if let Some(rows) = result.committed {
        *table = rows;
    }
    Ok(Json(result.outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use server_api::{MSG_CHANGES_SAVED, MSG_FILL_ALL_FIELDS, MSG_ORDER_ADDED};
    use shared::domain::OrderId;
    use shared::protocol::OrderDraft;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn line(order_id: i64, item_name: &str) -> OrderLine {
        OrderLine {
            order_id: OrderId(order_id),
            quantity: "1".to_string(),
            item_name: item_name.to_string(),
            choice_description: String::new(),
            item_price: "$2.39 ".to_string(),
        }
    }

    fn test_app(dir: &TempDir, rows: Vec<OrderLine>) -> (Router, Arc<AppState>) {
        let store = TsvStore::new(dir.path().join("orders.tsv"));
        let state = Arc::new(AppState {
            api: ApiContext { store },
            table: RwLock::new(rows),
        });
        (build_router(state.clone()), state)
    }

    fn update_request(trigger: &UpdateTrigger) -> Request<Body> {
        Request::post("/api/orders/update")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(trigger).expect("encode")))
            .expect("request")
    }

    async fn outcome_json(response: axum::response::Response) -> UpdateOutcome {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("decode outcome")
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = test_app(&dir, Vec::new());
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_serves_the_grid_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = test_app(&dir, Vec::new());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let page = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(page.contains("orders-table"));
        assert!(page.contains("add-button"));
    }

    #[tokio::test]
    async fn list_orders_returns_current_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = test_app(&dir, vec![line(1, "Izze"), line(2, "Chicken Bowl")]);
        let response = app
            .oneshot(
                Request::get("/api/orders")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let rows: Vec<OrderLine> = serde_json::from_slice(&bytes).expect("decode rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].item_name, "Chicken Bowl");
    }

    #[tokio::test]
    async fn add_order_updates_state_and_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, state) = test_app(&dir, vec![line(1, "Izze")]);

        let trigger = UpdateTrigger::AddRequested {
            rows: vec![line(1, "Izze")],
            form: OrderDraft {
                item_name: Some("Canned Soda".to_string()),
                quantity: Some("2".to_string()),
                item_price: Some("$2.18".to_string()),
            },
        };
        let response = app
            .oneshot(update_request(&trigger))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let outcome = outcome_json(response).await;
        let rows = outcome.rows.expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].order_id, OrderId(2));
        assert_eq!(outcome.message.as_deref(), Some(MSG_ORDER_ADDED));

        assert_eq!(state.table.read().await.len(), 2);
        assert_eq!(state.api.store.load().expect("cache").len(), 2);
    }

    #[tokio::test]
    async fn incomplete_add_changes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, state) = test_app(&dir, vec![line(1, "Izze")]);

        let trigger = UpdateTrigger::AddRequested {
            rows: vec![line(1, "Izze")],
            form: OrderDraft::default(),
        };
        let response = app
            .oneshot(update_request(&trigger))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let outcome = outcome_json(response).await;
        assert!(outcome.rows.is_none());
        assert_eq!(outcome.message.as_deref(), Some(MSG_FILL_ALL_FIELDS));

        assert_eq!(state.table.read().await.len(), 1);
        assert!(!state.api.store.exists());
    }

    #[tokio::test]
    async fn edit_commit_installs_rows_without_echoing_them() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, state) = test_app(&dir, vec![line(1, "Izze"), line(2, "Chicken Bowl")]);

        let mut edited = vec![line(1, "Izze"), line(2, "Chicken Bowl")];
        edited[0].quantity = "4".to_string();
        edited.remove(1);

        let trigger = UpdateTrigger::EditCommitted {
            rows: edited.clone(),
        };
        let response = app
            .oneshot(update_request(&trigger))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let outcome = outcome_json(response).await;
        assert!(outcome.rows.is_none());
        assert_eq!(outcome.message.as_deref(), Some(MSG_CHANGES_SAVED));

        assert_eq!(*state.table.read().await, edited);
        assert_eq!(state.api.store.load().expect("cache"), edited);
    }

    #[tokio::test]
    async fn unwritable_cache_surfaces_internal_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TsvStore::new(dir.path().join("missing").join("orders.tsv"));
        let state = Arc::new(AppState {
            api: ApiContext { store },
            table: RwLock::new(vec![line(1, "Izze")]),
        });
        let app = build_router(state.clone());

        let trigger = UpdateTrigger::EditCommitted {
            rows: vec![line(1, "Izze")],
        };
        let response = app
            .oneshot(update_request(&trigger))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // State stays on the last committed dataset.
        assert_eq!(state.table.read().await.len(), 1);
    }
}
