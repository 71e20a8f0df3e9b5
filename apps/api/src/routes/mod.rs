pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::messages::handlers as messages;
use crate::spintax::handlers as spintax;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Spintax API
        .route("/api/v1/spintax/resolve", post(spintax::handle_resolve))
        .route("/api/v1/spintax/variations", post(spintax::handle_variations))
        .route("/api/v1/spintax/validate", post(spintax::handle_validate))
        .route("/api/v1/spintax/highlight", post(spintax::handle_highlight))
        .route("/api/v1/spintax/analyze", post(spintax::handle_analyze))
        // Messages API
        .route(
            "/api/v1/messages/templates",
            get(messages::handle_list_templates),
        )
        .route("/api/v1/messages/generate", post(messages::handle_generate))
        .route("/api/v1/messages/assist", post(messages::handle_assist))
        .route(
            "/api/v1/messages/drafts",
            get(messages::handle_list_drafts).post(messages::handle_create_draft),
        )
        .route(
            "/api/v1/messages/drafts/:id",
            get(messages::handle_get_draft)
                .put(messages::handle_update_draft)
                .delete(messages::handle_delete_draft),
        )
        .with_state(state)
}
