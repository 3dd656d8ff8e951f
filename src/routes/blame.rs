//! Blame panel endpoints.
//!
//! - POST /api/v1/blame/open { path?: string }
//!   Blames the active file (optionally switching to `path` first) at the
//!   working tree and returns the panel.
//!
//! - POST /api/v1/blame/back { cursor: usize }
//!   Re-blames at the parent of the commit owning the entry under `cursor`.
//!
//! - POST /api/v1/blame/copy-hash { cursor: usize }
//!   Copies the full hash under `cursor`; returns `{ hash, copied }`.
//!
//! - POST /api/v1/blame/key { key: string, cursor: usize }
//!   Runs whatever the blame key mode binds `key` to.
//!
//! - POST /api/v1/blame/close
//!
//! - GET /api/v1/blame/view
//!   Current panel: entries, flattened text, highlight spans, mode, status.
//!
//! Operations are serialised: a request that arrives while another one holds
//! the engine is rejected with 409 instead of waiting.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::blame::highlight::LAYER;
use crate::blame::{BlameEngine, BlameHost, PanelHost};
use crate::error::{AppError, BlameError, Result};
use crate::git::ProcessRunner;
use crate::models::{CopyResponse, PanelSnapshot};

pub type SharedEngine<R> = Arc<Mutex<BlameEngine<R, PanelHost>>>;

pub fn routes<R: ProcessRunner>(engine: SharedEngine<R>) -> Router {
    Router::new()
        .route("/api/v1/blame/open", post(open_blame::<R>))
        .route("/api/v1/blame/back", post(go_back::<R>))
        .route("/api/v1/blame/copy-hash", post(copy_hash::<R>))
        .route("/api/v1/blame/key", post(press_key::<R>))
        .route("/api/v1/blame/close", post(close_blame::<R>))
        .route("/api/v1/blame/view", get(get_view::<R>))
        .with_state(engine)
}

#[derive(Debug, Default, Deserialize)]
struct OpenRequest {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CursorRequest {
    cursor: usize,
}

#[derive(Debug, Deserialize)]
struct KeyRequest {
    key: String,
    #[serde(default)]
    cursor: usize,
}

fn acquire<R>(engine: &SharedEngine<R>) -> Result<MutexGuard<'_, BlameEngine<R, PanelHost>>> {
    engine.try_lock().map_err(|_| AppError::Busy)
}

async fn open_blame<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<PanelSnapshot>> {
    let mut engine = acquire(&engine)?;
    let previous = request
        .path
        .map(|path| engine.host_mut().set_active_file(Some(PathBuf::from(path))));
    if let Err(e) = engine.open().await {
        // A rejected path must not become the file later opens fall back to.
        if let Some(previous) = previous {
            engine.host_mut().set_active_file(previous);
        }
        return Err(e.into());
    }
    Ok(Json(snapshot(&engine)))
}

async fn go_back<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
    Json(request): Json<CursorRequest>,
) -> Result<Json<PanelSnapshot>> {
    let mut engine = acquire(&engine)?;
    engine.go_back(request.cursor).await?;
    Ok(Json(snapshot(&engine)))
}

async fn copy_hash<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
    Json(request): Json<CursorRequest>,
) -> Result<Json<CopyResponse>> {
    let mut engine = acquire(&engine)?;
    let response = engine.copy_hash(request.cursor).await?;
    Ok(Json(response))
}

async fn press_key<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
    Json(request): Json<KeyRequest>,
) -> Result<Json<PanelSnapshot>> {
    let mut engine = acquire(&engine)?;
    let Some(mode) = engine.host().mode() else {
        let err = BlameError::NotOpen;
        engine.host_mut().status(err.to_string());
        return Err(err.into());
    };
    let action = mode
        .action_for(&request.key)
        .ok_or_else(|| AppError::UnboundKey(request.key.clone()))?;
    engine.dispatch(action, request.cursor).await?;
    Ok(Json(snapshot(&engine)))
}

async fn close_blame<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
) -> Result<Json<PanelSnapshot>> {
    let mut engine = acquire(&engine)?;
    engine.close()?;
    Ok(Json(snapshot(&engine)))
}

async fn get_view<R: ProcessRunner>(
    State(engine): State<SharedEngine<R>>,
) -> Result<Json<PanelSnapshot>> {
    let engine = acquire(&engine)?;
    Ok(Json(snapshot(&engine)))
}

fn snapshot<R: ProcessRunner>(engine: &BlameEngine<R, PanelHost>) -> PanelSnapshot {
    let host = engine.host();
    let state = engine.state();
    PanelSnapshot {
        open: engine.is_open(),
        active_file: host
            .active_file()
            .map(|p| p.to_string_lossy().to_string()),
        commit_ref: state.and_then(|s| s.commit_ref.clone()),
        depth: state.map_or(0, |s| s.depth()),
        entries: host.entries().to_vec(),
        content: state.map(|s| s.rendered.clone()).unwrap_or_default(),
        highlights: host.highlights(LAYER).to_vec(),
        mode: host.mode().map(|m| m.info()),
        status: host.status_messages(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::blame::clipboard::ClipboardCommand;
    use crate::blame::keymap::BLAME_MODE;
    use crate::blame::BlameConfig;
    use crate::test_utils::{porcelain, ScriptedRunner, TestRepo, ALICE, NOW};

    fn app(repo: &TestRepo) -> (Router, SharedEngine<ScriptedRunner>) {
        let host = PanelHost::new(Some(repo.path("lib.rs")));
        let config = BlameConfig {
            git: "git".to_string(),
            clipboard: ClipboardCommand::parse("pbcopy").unwrap(),
        };
        let engine = Arc::new(Mutex::new(BlameEngine::new(ScriptedRunner::new(), host, config)));
        (routes(engine.clone()), engine)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn script(engine: &SharedEngine<ScriptedRunner>, stdout: String) {
        engine.lock().await.runner().push_stdout(stdout);
    }

    #[tokio::test]
    async fn test_open_and_view() {
        let repo = TestRepo::with_file("lib.rs", "a\nb\n");
        let (router, engine) = app(&repo);
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a", "b"])).await;

        let (status, body) = send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["open"], true);
        assert_eq!(body["entries"][0]["text"], "lib.rs @ HEAD");
        assert_eq!(body["entries"][2]["kind"], "block-header");
        assert_eq!(body["entries"][3]["kind"], "content");
        assert_eq!(body["entries"][3]["hash"], ALICE);
        assert_eq!(body["mode"]["name"], BLAME_MODE.name);

        let (status, view) = send(&router, "GET", "/api/v1/blame/view", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["entries"], body["entries"]);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, _engine) = app(&repo);
        let missing = repo.path("nope.rs").to_string_lossy().to_string();

        let (status, body) = send(&router, "POST", "/api/v1/blame/open", Some(json!({ "path": missing }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().starts_with("File not found"));
    }

    #[tokio::test]
    async fn test_failed_open_keeps_previous_file() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, engine) = app(&repo);
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a"])).await;
        send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;
        let missing = repo.path("nope.rs").to_string_lossy().to_string();

        let (status, _) = send(&router, "POST", "/api/v1/blame/open", Some(json!({ "path": missing }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, view) = send(&router, "GET", "/api/v1/blame/view", None).await;
        let original = repo.path("lib.rs").to_string_lossy().to_string();
        assert_eq!(view["open"], true);
        assert_eq!(view["entries"][0]["text"], "lib.rs @ HEAD");
        assert_eq!(view["active_file"], original.as_str());

        // A plain re-open goes back to the file that worked.
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a"])).await;
        let (status, _) = send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_key_when_closed_reports_status() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, _engine) = app(&repo);

        let (status, body) = send(&router, "POST", "/api/v1/blame/key", Some(json!({ "key": "b" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Blame view is not open");

        let (_, view) = send(&router, "GET", "/api/v1/blame/view", None).await;
        assert_eq!(view["status"][0], "Blame view is not open");
    }

    #[tokio::test]
    async fn test_back_rejects_title_line() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, engine) = app(&repo);
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a"])).await;
        send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;

        let (status, body) = send(&router, "POST", "/api/v1/blame/back", Some(json!({ "cursor": 0 }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Move the cursor onto a blamed line first");
    }

    #[tokio::test]
    async fn test_key_dispatch() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, engine) = app(&repo);
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a"])).await;
        send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;

        let (status, _) = send(&router, "POST", "/api/v1/blame/key", Some(json!({ "key": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&router, "POST", "/api/v1/blame/key", Some(json!({ "key": "q" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["open"], false);
        assert!(body["mode"].is_null());
    }

    #[tokio::test]
    async fn test_copy_hash_endpoint() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, engine) = app(&repo);
        script(&engine, porcelain(ALICE, "Alice", NOW, "Fix bug", 1, &["a"])).await;
        send(&router, "POST", "/api/v1/blame/open", Some(json!({}))).await;
        script(&engine, String::new()).await;

        let (status, body) = send(&router, "POST", "/api/v1/blame/copy-hash", Some(json!({ "cursor": 3 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hash"], ALICE);
        assert_eq!(body["copied"], true);
    }

    #[tokio::test]
    async fn test_close_when_not_open() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, _engine) = app(&repo);

        let (status, body) = send(&router, "POST", "/api/v1/blame/close", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Blame view is not open");
    }

    #[tokio::test]
    async fn test_busy_engine_rejects_requests() {
        let repo = TestRepo::with_file("lib.rs", "a\n");
        let (router, engine) = app(&repo);
        let _held = engine.lock().await;

        let (status, body) = send(&router, "GET", "/api/v1/blame/view", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Another blame operation is in progress");
    }
}
