use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::{
    api::state::AppState,
    error::Result,
    service::registration_link_service::LinkInput,
    web::flash,
};

const LINKS_TAB: &str = "/admin#reglinks";

#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub link_title: String,
    #[serde(default)]
    pub registration_url: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub expiry_date: String,
}

impl From<LinkForm> for LinkInput {
    fn from(form: LinkForm) -> Self {
        LinkInput {
            title: form.link_title,
            url: form.registration_url,
            department: form.department,
            expiry: form.expiry_date,
        }
    }
}

pub async fn create_link(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LinkForm>,
) -> Result<impl IntoResponse> {
    let result = state
        .service_context
        .registration_link_service
        .create(form.into())
        .await;
    let jar = flash::outcome(jar, result, |_| "Registration link posted successfully.".to_string())?;

    Ok((jar, Redirect::to(LINKS_TAB)))
}

pub async fn edit_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    Form(form): Form<LinkForm>,
) -> Result<impl IntoResponse> {
    let result = state
        .service_context
        .registration_link_service
        .update(id, form.into())
        .await;
    let jar = flash::outcome(jar, result, |_| "Registration link updated successfully.".to_string())?;

    Ok((jar, Redirect::to(LINKS_TAB)))
}

pub async fn deactivate_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse> {
    let result = state
        .service_context
        .registration_link_service
        .deactivate(id)
        .await;
    let jar = flash::outcome(jar, result, |_| "Link deactivated successfully.".to_string())?;

    Ok((jar, Redirect::to(LINKS_TAB)))
}
