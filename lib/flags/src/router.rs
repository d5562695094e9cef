//! The HTTP control plane. Runs on its own thread/runtime and never calls
//! into the engine directly — it only ever touches the `FlagStore`, which
//! the engine consults through `FlagOracle`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::error::FlagParseError;
use crate::store::{parse_enabled, parse_flag_name, parse_profile_id, FlagStore};

#[allow(deprecated)]
pub fn router(store: Arc<FlagStore>) -> Router {
    Router::new()
        .route("/flags/status", get(status))
        .route("/flags/set/{profile_id}/{flag_name}/{enabled}", put(set))
        .route("/flags/enable/{profile_id}/{flag_name}", put(enable))
        .route("/flags/disable/{profile_id}/{flag_name}", put(disable))
        .fallback(not_found)
        .with_state(store)
}

impl IntoResponse for FlagParseError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn status(State(store): State<Arc<FlagStore>>) -> Json<HashMap<Uuid, HashMap<&'static str, bool>>> {
    Json(store.status())
}

async fn set(
    State(store): State<Arc<FlagStore>>,
    Path((profile_id, flag_name, enabled)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, FlagParseError> {
    let profile_id = parse_profile_id(&profile_id)?;
    let flag = parse_flag_name(&flag_name)?;
    let enabled = parse_enabled(&enabled)?;

    store.set(profile_id, flag, enabled);
    log::debug!("set {flag:?} for profile {profile_id} to {enabled}");

    Ok(Json(json!({
        "profileId": profile_id,
        "flag": flag.as_str(),
        "enabled": enabled,
    })))
}

/// Equivalent to `set .../true`. Kept alongside `/flags/set` for backwards
/// compatibility; prefer `/flags/set` in new clients.
#[deprecated(since = "0.1.0", note = "use the /flags/set route instead")]
async fn enable(
    State(store): State<Arc<FlagStore>>,
    Path((profile_id, flag_name)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, FlagParseError> {
    set(State(store), Path((profile_id, flag_name, "true".to_string()))).await
}

/// Equivalent to `set .../false`. Kept alongside `/flags/set` for backwards
/// compatibility; prefer `/flags/set` in new clients.
#[deprecated(since = "0.1.0", note = "use the /flags/set route instead")]
async fn disable(
    State(store): State<Arc<FlagStore>>,
    Path((profile_id, flag_name)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, FlagParseError> {
    set(State(store), Path((profile_id, flag_name, "false".to_string()))).await
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown method or path" }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use engine::{FlagOracle, ProfileFlag};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn router_builds_without_panicking() {
        let _ = router(Arc::new(FlagStore::new()));
    }

    #[tokio::test]
    async fn put_set_dispatches_and_updates_the_store() {
        let store = Arc::new(FlagStore::new());
        let app = router(store.clone());

        let uri = format!("/flags/set/{}/AutoPlay/true", Uuid::nil());
        let response = app
            .oneshot(Request::builder().method("PUT").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["enabled"], true);
        assert_eq!(json["flag"], "AutoPlay");
        assert!(store.is_flag_set(Uuid::nil(), ProfileFlag::AutoPlay));
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_404() {
        let app = router(Arc::new(FlagStore::new()));
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
