use axum::{routing::get, Router};

use crate::api::handlers::hei;
use crate::api::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hei", get(hei::list_heis).post(hei::add_hei))
        .route(
            "/hei/{ukprn}",
            get(hei::get_hei)
                .delete(hei::delete_hei)
                .put(hei::replace_hei)
                .patch(hei::patch_hei),
        )
}
