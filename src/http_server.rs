//! HTTP front end: `POST /api/save` replaces the profile document, `OPTIONS` answers CORS
//! preflight on any path, anything else is 404.

use crate::store::ProfileStore;
use crate::tools::timestamp;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const SAVE_PATH: &str = "/api/save";

const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

type SharedStore = Arc<Mutex<ProfileStore>>;

pub fn router(store: SharedStore) -> Router {
    // Routing looks at the path only, so `/api/save?draft=1` still saves.
    Router::new()
        .route(
            SAVE_PATH,
            post(save_profile).options(preflight).fallback(fallback),
        )
        .fallback(fallback)
        .layer(middleware::from_fn(cors_and_log))
        .layer(DefaultBodyLimit::disable())
        .with_state(store)
}

pub async fn serve<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({"status": "error", "message": message.into()})),
    )
        .into_response()
}

async fn save_profile(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if !content_type.to_ascii_lowercase().contains("application/json") {
        return error(
            StatusCode::BAD_REQUEST,
            "Bad Request: Content-Type must be application/json",
        );
    }

    match save(&body, &store).await {
        Ok(()) => Json(json!({"status": "success", "message": "文件保存成功"})).into_response(),
        Err(e) => {
            println!("{}  保存错误: {}", timestamp(), e);
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {}", e),
            )
        }
    }
}

async fn save(body: &[u8], store: &Mutex<ProfileStore>) -> Result<(), anyhow::Error> {
    let value: Value = serde_json::from_str(std::str::from_utf8(body)?)?;
    // Held across the write so saves never interleave.
    let store = store.lock().await;
    store.save(&value)?;
    Ok(())
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        error(StatusCode::NOT_FOUND, "Not Found")
    }
}

async fn cors_and_log(request: Request, next: Next) -> Response {
    let line = format!("\"{} {}\"", request.method(), request.uri());
    let mut response = next.run(request).await;
    println!("[{}] {} {}", timestamp(), line, response.status().as_u16());

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}
