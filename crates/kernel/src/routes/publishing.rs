//! Publishing endpoints.
//!
//! Submit and delete always answer 200 with a [`PublishResponse`]; the
//! `success` flag carries the outcome.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::form::{TokenAction, generate_csrf_token, verify_csrf_token};
use crate::models::{DeleteForm, SubmissionForm};
use crate::publishing::{PublishError, PublishResponse};
use crate::routes::helpers::current_user;
use crate::state::AppState;

/// Create the publishing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publishing/submit", post(submit))
        .route("/publishing/delete", post(delete))
        .route("/publishing/featured-image", post(featured_image))
        .route("/publishing/token/{action}", get(issue_token))
}

/// Featured image preview request.
#[derive(Debug, Deserialize)]
struct FeaturedImageForm {
    #[serde(default)]
    img: String,
}

/// Freshly issued authenticity token.
#[derive(Debug, Serialize)]
struct TokenResponse {
    action: TokenAction,
    token: String,
}

/// Check the form's authenticity token for `action`.
async fn verify_token(
    session: &Session,
    action: TokenAction,
    token: &str,
) -> Result<(), PublishError> {
    match verify_csrf_token(session, action, token).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            debug!(%action, "authenticity token rejected");
            Err(PublishError::Authenticity)
        }
        Err(e) => {
            warn!(%action, error = %e, "failed to verify authenticity token");
            Err(PublishError::Authenticity)
        }
    }
}

/// Create or update an article.
async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SubmissionForm>,
) -> Json<PublishResponse> {
    let user = current_user(&session).await;
    let publishing = state.publishing();

    let result = match verify_token(&session, TokenAction::Submit, &form.post_nonce).await {
        Ok(()) => publishing.submit(&user, form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            state.metrics().record_submission(outcome.action.as_str());
            Json(PublishResponse::submitted(outcome))
        }
        Err(err) => {
            state.metrics().record_submission(err.kind());
            Json(PublishResponse::submit_failed(
                &err,
                &publishing.settings().messages.general_form_error,
            ))
        }
    }
}

/// Permanently delete an article.
async fn delete(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DeleteForm>,
) -> Json<PublishResponse> {
    let user = current_user(&session).await;

    let result = match verify_token(&session, TokenAction::Delete, &form.delete_nonce).await {
        Ok(()) => state.publishing().delete(&user, form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => {
            state.metrics().record_deletion("deleted");
            Json(PublishResponse::deleted())
        }
        Err(err) => {
            state.metrics().record_deletion(err.kind());
            Json(PublishResponse::delete_failed(&err))
        }
    }
}

/// Preview markup for the selected featured image.
async fn featured_image(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<FeaturedImageForm>,
) -> AppResult<Html<String>> {
    if !current_user(&session).await.is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let html = state.publishing().featured_image(&form.img).await?;
    Ok(Html(html))
}

/// Issue an authenticity token for the named action.
async fn issue_token(
    session: Session,
    Path(action): Path<String>,
) -> AppResult<Json<TokenResponse>> {
    let action = TokenAction::parse(&action).ok_or(AppError::NotFound)?;
    let token = generate_csrf_token(&session, action).await?;
    Ok(Json(TokenResponse { action, token }))
}
