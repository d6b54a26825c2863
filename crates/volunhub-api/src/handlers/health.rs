//! Health endpoint

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// Liveness plus a store round-trip.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    // Any read exercises the store connection; the probe id never exists.
    let store_ok = state.store.find_by_id("health-probe").await.is_ok();

    Json(json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "store": store_ok,
    }))
}
