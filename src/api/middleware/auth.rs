use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Role,
    error::{AppError, Result},
};

/// Identity of the logged-in account for the current request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub account_id: i64,
    pub user_id: String,
    pub full_name: String,
    pub role: Role,
}

/// Looks up the session cookie. Any failure to resolve it is treated as
/// "not logged in".
pub async fn resolve_current_user(state: &AppState, jar: &CookieJar) -> Result<Option<CurrentUser>> {
    let Some(session_cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let context = &state.service_context;
    let Some(session) = context.auth_service.validate_session(session_cookie.value()).await? else {
        return Ok(None);
    };

    let account = context.account_repo.find_by_id(session.account_id).await?;

    Ok(account.map(|account| CurrentUser {
        account_id: account.id,
        user_id: account.user_id,
        full_name: account.full_name,
        role: account.role,
    }))
}

async fn require_role(
    required: Role,
    state: AppState,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let current_user = resolve_current_user(&state, &jar)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let allowed = match (required, current_user.role) {
        (Role::Admin, Role::Admin) | (Role::Student, Role::Student) => true,
        (Role::Admin, Role::Student) | (Role::Student, Role::Admin) => false,
    };

    if !allowed {
        tracing::debug!(
            user_id = %current_user.user_id,
            path = %request.uri().path(),
            "role mismatch, redirecting to login"
        );
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response> {
    require_role(Role::Admin, state, jar, request, next).await
}

pub async fn require_student(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response> {
    require_role(Role::Student, state, jar, request, next).await
}
