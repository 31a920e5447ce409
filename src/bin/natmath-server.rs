use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use natmath::banner;
use natmath::config::ServerConfig;
use natmath::engine::{Failure, Pipeline, Success};
use natmath::types::{AngleMode, EvaluationResult, RawInput};

/* -------------------------- App state -------------------------- */

struct AppState {
    pipeline: Arc<Pipeline>,
}

/* -------------------------- Request/Response ------------------- */

#[derive(Deserialize, Debug)]
struct EvalReq {
    #[serde(default)]
    expression: Option<String>,
    #[serde(default, rename = "angleMode")]
    angle_mode: Option<AngleMode>,
}

#[derive(Serialize)]
struct EvalResp {
    result: EvaluationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
}

#[derive(Serialize)]
struct ErrorResp {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
}

impl From<Success> for EvalResp {
    fn from(done: Success) -> Self {
        Self {
            result: done.result,
            normalized: done.normalized,
        }
    }
}

impl From<Failure> for ErrorResp {
    fn from(failure: Failure) -> Self {
        Self {
            error: failure.error.to_string(),
            kind: Some(failure.error.kind()),
            normalized: failure.normalized,
        }
    }
}

fn bad_request(body: ErrorResp) -> Response {
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/* -------------------------- Server main ------------------------ */

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    banner::print_server_banner();
    natmath::logging::init("info,tower_http=info");

    let config = ServerConfig::from_env()?;
    let pipeline = Pipeline::from_env(config.local_only);
    info!(mode = ?pipeline.mode(), "pipeline ready");

    let state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
    });

    let api = Router::new()
        .route("/eval", post(api_eval))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = config.addr()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("bind failed for address {addr}: {e}");
            error!(
                "hint: is the port already in use? e.g. `ss -tulpn | grep :{}`",
                config.port
            );
            return Err(e.into());
        }
    };
    info!("natmath API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/* -------------------------- Handlers --------------------------- */

async fn api_eval(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<EvalReq>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return bad_request(ErrorResp {
                error: format!("invalid request body: {}", rejection.body_text()),
                kind: Some("invalid_request"),
                normalized: None,
            })
        }
    };

    let text = req.expression.unwrap_or_default();
    let input = match RawInput::new(&text, req.angle_mode.unwrap_or_default()) {
        Ok(input) => input,
        // Missing and blank `expression` both land here as EmptyInput.
        Err(e) => return bad_request(Failure::from(e).into()),
    };

    // A panic inside the pipeline surfaces as a JoinError and a 500.
    let pipeline = s.pipeline.clone();
    let task = tokio::spawn(async move { pipeline.run(&input).await });

    match task.await {
        Ok(Ok(done)) => (StatusCode::OK, Json(EvalResp::from(done))).into_response(),
        Ok(Err(failure)) => bad_request(failure.into()),
        Err(e) => {
            error!("evaluation task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResp {
                    error: "internal error while evaluating".into(),
                    kind: None,
                    normalized: None,
                }),
            )
                .into_response()
        }
    }
}
