pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, get_service, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::web::middleware::auth as auth_middleware;
use crate::web::routes::{draw, history, pages, roster};
use crate::web::state::AppState;

pub fn app(state: AppState) -> Router {
    // Everything tenant-scoped sits behind one auth layer
    let protected_routes = Router::new()
        .route("/", get(pages::lineup_page))
        .route("/draw", get(pages::draw_page))
        .route(
            "/api/confirmations",
            get(roster::list_handler)
                .post(roster::confirm_handler)
                .delete(roster::clear_handler),
        )
        .route(
            "/api/confirmations/:participant_id",
            delete(roster::remove_handler),
        )
        .route("/api/draw", post(draw::draw_handler))
        .route("/api/history/ranking", get(history::ranking_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(protected_routes)
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
