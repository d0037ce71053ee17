use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use serde::Deserialize;

use crate::{
    api::{middleware::auth::resolve_current_user, state::AppState},
    auth::{AuthService, SESSION_COOKIE},
    error::Result,
    web::{
        flash::{self, FlashMessage},
        templates::{HtmlTemplate, UserInfo},
    },
};

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<UserInfo>,
    pub flash: Option<FlashMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub user_id: String,
    pub password: String,
}

// GET /
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    flash_jar: SignedCookieJar,
) -> Result<Response> {
    if let Some(user) = resolve_current_user(&state, &jar).await? {
        return Ok(Redirect::to(user.role.home_path()).into_response());
    }

    let (flash_jar, flash) = flash::take(flash_jar);
    let template = LoginTemplate { current_user: None, flash };

    Ok((flash_jar, HtmlTemplate(template)).into_response())
}

// POST /
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    flash_jar: SignedCookieJar,
    Form(credentials): Form<LoginForm>,
) -> Result<Response> {
    let context = &state.service_context;

    let account = if credentials.user_id.trim().is_empty() || credentials.password.is_empty() {
        None
    } else {
        context
            .account_service
            .authenticate(&credentials.user_id, &credentials.password)
            .await?
    };

    let Some(account) = account else {
        let flash_jar = flash::error(flash_jar, "Invalid username or password.");
        return Ok((flash_jar, Redirect::to("/")).into_response());
    };

    let (_session, token) = context.auth_service.create_session(account.id).await?;
    let jar = jar.add(context.auth_service.create_session_cookie(&token));

    Ok((jar, Redirect::to(account.role.home_path())).into_response())
}

// GET /logout
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state
            .service_context
            .auth_service
            .invalidate_session(cookie.value())
            .await?;
    }

    let jar = jar.add(AuthService::create_logout_cookie());
    Ok((jar, Redirect::to("/")))
}
