use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    error::Result,
    web::flash,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> Result<impl IntoResponse> {
    let result = state
        .service_context
        .account_service
        .change_password(
            &current_user.user_id,
            &form.current_password,
            &form.new_password,
            &form.confirm_password,
        )
        .await;
    let jar = flash::outcome(jar, result, |_| "Password updated successfully.".to_string())?;

    Ok((jar, Redirect::to("/admin#profile")))
}
