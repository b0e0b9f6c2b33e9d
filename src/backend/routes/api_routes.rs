/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Presence
 * - `GET /api/presence/{user_id}` - is the user connected, and on how many sockets
 *
 * ## Notifications
 * - `POST /api/notifications/{user_id}/push` - push a live notification
 *
 * The push route is the contract the CRUD services use after a write (a new
 * comment, a follow) to reach the affected user's open sockets.
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::notifications::handlers::push_notification;
use crate::backend::presence::handlers::get_presence;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/presence/{user_id}", get(get_presence))
        .route("/api/notifications/{user_id}/push", post(push_notification))
}
