use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use partnerdesk_application::AuthorizationStore;
use partnerdesk_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{AuthLoginRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "user_identity";

/// Loads the session slot into a request-scoped authorization store.
pub(crate) async fn session_store(session: &Session) -> Result<AuthorizationStore, AppError> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    let store = AuthorizationStore::new();
    store.set_identity(identity);
    Ok(store)
}

async fn save_session_store(session: &Session, store: &AuthorizationStore) -> Result<(), AppError> {
    let Some(identity) = store.identity() else {
        return Ok(());
    };

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session identity: {error}")))
}

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let store = AuthorizationStore::new();
    let identity = state
        .user_service
        .login_into(&store, &payload.email, &payload.password)
        .await?;

    // A fresh session id on login prevents fixation.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    save_session_store(&session, &store).await?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

/// POST /auth/logout - Clear the session slot.
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    let store = session_store(&session).await?;
    state.user_service.logout(&store).await?;

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current session identity.
pub async fn me_handler(session: Session) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session_store(&session).await?.require_identity()?;

    Ok(Json(UserIdentityResponse::from(identity)))
}
