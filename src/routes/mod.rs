//! API route handlers - maps HTTP endpoints to blame engine commands.
//!
//! - `blame`: open / step back / copy hash / key dispatch / close / view

pub mod blame;

use axum::Router;

use crate::git::ProcessRunner;

pub use blame::SharedEngine;

pub fn create_router<R: ProcessRunner>(engine: SharedEngine<R>) -> Router {
    Router::new().merge(blame::routes(engine))
}
