use axum::Json;
use axum::extract::Extension;
use partnerdesk_application::AuthorizationStore;
use partnerdesk_core::UserIdentity;

use crate::dto::NavigationEntryResponse;

/// GET /api/navigation - Portal entries the session may see.
pub async fn navigation_handler(
    Extension(user): Extension<UserIdentity>,
) -> Json<Vec<NavigationEntryResponse>> {
    let entries = AuthorizationStore::with_identity(user)
        .visible_navigation()
        .into_iter()
        .map(NavigationEntryResponse::from)
        .collect();

    Json(entries)
}
