use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(ai_routes())
        .merge(user_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(api)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security.cors_origins));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn ai_routes() -> Router<AppState> {
    use protected::ai;

    Router::new()
        .route("/api/ai/generate-article", post(ai::generate_article))
        .route("/api/ai/generate-blog-title", post(ai::generate_blog_title))
        .route("/api/ai/generate-image", post(ai::generate_image))
        .route("/api/ai/remove-image-background", post(ai::remove_background))
        .route("/api/ai/remove-image-object", post(ai::remove_object))
        .route("/api/ai/resume-review", post(ai::review_resume))
}

fn user_routes() -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/api/user/get-user-creations", get(user::user_creations))
        .route("/api/user/get-published-creations", get(user::published_creations))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(origins)
}
