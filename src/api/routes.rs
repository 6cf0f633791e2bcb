use axum::Router;

use crate::api::state::AppState;

pub mod entry;
pub mod hei;
pub mod system;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(hei::routes())
        .merge(entry::routes())
}
