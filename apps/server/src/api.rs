use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use eventgen_lookup::LookupPolicyConfig;
use eventgen_protocol::MessageService;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub async fn healthz() -> &'static str {
    "ok"
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateQuery {
    msg_type: String,
    #[serde(default)]
    fail_if_multiple_found: bool,
    #[serde(default)]
    fail_if_none_found: bool,
    #[serde(rename = "connectToExternalERs", default = "default_true")]
    connect_to_external_ers: bool,
    #[serde(default = "default_limit")]
    limit: u32,
}

impl GenerateQuery {
    fn policy(&self) -> ApiResult<LookupPolicyConfig> {
        if self.limit == 0 {
            return Err(ApiError::BadRequest(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(LookupPolicyConfig {
            fail_if_multiple_found: self.fail_if_multiple_found,
            fail_if_none_found: self.fail_if_none_found,
            connect_to_external_ers: self.connect_to_external_ers,
            limit: self.limit,
        })
    }
}

fn service(state: &AppState, protocol: &str) -> ApiResult<Arc<dyn MessageService>> {
    state
        .services
        .get(protocol)
        .cloned()
        .ok_or_else(|| ApiError::UnknownProtocol(protocol.to_string()))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Path(protocol): Path<String>,
    query: Result<Query<GenerateQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Query(q) = query?;
    let Json(body) = body?;
    if !body.is_object() {
        return Err(ApiError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    }
    let policy = q.policy()?;
    let service = service(&state, &protocol)?;

    let body = state.lookup.resolve(body, &policy).await?;
    let message = service.generate(&q.msg_type, &body)?;
    Ok(Json(message))
}

async fn event_types(
    State(state): State<Arc<AppState>>,
    Path(protocol): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let service = service(&state, &protocol)?;
    Ok(Json(service.supported_event_types()))
}

async fn template(
    State(state): State<Arc<AppState>>,
    Path((event_type, protocol)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let service = service(&state, &protocol)?;
    service
        .template(&event_type)
        .map(Json)
        .ok_or(ApiError::TemplateNotFound)
}

async fn versions(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "serviceVersion": {"eventgen": env!("CARGO_PKG_VERSION")},
        "endpointVersions": state.services.versions(),
    }))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/versions", get(versions))
        .route("/event_types/{protocol}", get(event_types))
        .route("/template/{event_type}/{protocol}", get(template))
        .route("/{protocol}", post(generate))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
