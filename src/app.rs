//! HTTP router assembly.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, middleware, state::AppState};

/// Build the full application router.
///
/// Admin routes sit behind the admin API key middleware; user-facing and
/// diagnostic routes are public.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/admin/users",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/api/admin/users/{id}",
            put(handlers::accounts::patch_account).delete(handlers::accounts::delete_account),
        )
        .route(
            "/api/admin/transactions",
            get(handlers::transfers::list_transfers).post(handlers::transfers::create_transfer),
        )
        .route(
            "/api/admin/transactions/{id}",
            put(handlers::transfers::patch_transfer),
        )
        .route(
            "/api/admin/bank-links",
            get(handlers::bank_links::list_bank_links)
                .post(handlers::bank_links::create_bank_link),
        )
        .route(
            "/api/admin/bank-links/{id}",
            put(handlers::bank_links::patch_bank_link)
                .delete(handlers::bank_links::delete_bank_link),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/users",
            get(handlers::accounts::get_account).post(handlers::accounts::login),
        )
        .route(
            "/api/users/{id}",
            put(handlers::accounts::patch_account).delete(handlers::accounts::delete_account),
        )
        .route(
            "/api/mpin",
            get(handlers::mpin::mpin_status).post(handlers::mpin::mpin_action),
        )
        .route("/api/test-db", get(handlers::diagnostics::store_status))
        .route(
            "/api/connection-info",
            get(handlers::diagnostics::connection_info),
        )
        .route("/api/test-mpin", get(handlers::diagnostics::mpin_diagnostic))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        // The browser client is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
