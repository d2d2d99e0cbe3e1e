use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{docs::ApiDoc, handlers, middleware, state::AppState};

pub fn app_router(state: AppState) -> Router {
    // Build public routes (no auth)
    let public_routes = Router::new().route("/health", get(handlers::health));

    // Build user-protected routes (auth required)
    let check_in_routes = Router::new()
        .route(
            "/api/v1/check-in",
            post(handlers::create_check_in).get(handlers::list_check_ins),
        )
        .route("/api/v1/check-in/test", get(handlers::auth_probe))
        .route("/api/v1/check-in/today", get(handlers::get_today_check_in))
        .route("/api/v1/check-in/{id}", get(handlers::get_check_in))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(check_in_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
