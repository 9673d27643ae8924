mod cors;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use partnerdesk_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/navigation",
            get(handlers::navigation::navigation_handler),
        )
        .route(
            "/api/approvals",
            get(handlers::approvals::list_approvals_handler)
                .post(handlers::approvals::create_approval_handler),
        )
        .route(
            "/api/approvals/pending",
            get(handlers::approvals::pending_approvals_handler),
        )
        .route(
            "/api/approvals/summary",
            get(handlers::approvals::approval_summary_handler),
        )
        .route(
            "/api/approvals/{approval_id}",
            get(handlers::approvals::get_approval_handler)
                .patch(handlers::approvals::update_approval_handler),
        )
        .route(
            "/api/approvals/{approval_id}/approve",
            post(handlers::approvals::approve_approval_handler),
        )
        .route(
            "/api/approvals/{approval_id}/reject",
            post(handlers::approvals::reject_approval_handler),
        )
        .route(
            "/api/audit-log",
            get(handlers::audit::list_audit_log_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
