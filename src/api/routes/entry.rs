use axum::{routing::get, Router};

use crate::api::handlers::entry;
use crate::api::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entry", get(entry::list_entries).post(entry::add_entry))
        .route(
            "/entry/{id}",
            get(entry::get_entry)
                .delete(entry::delete_entry)
                .put(entry::replace_entry)
                .patch(entry::patch_entry),
        )
}
