use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{NewFeedback, MAX_RATING, MIN_RATING},
    error::Result,
    web::{
        flash::{self, FlashMessage},
        templates::{HtmlTemplate, UserInfo},
    },
};

#[derive(Template)]
#[template(path = "portal/feedback.html")]
pub struct FeedbackTemplate {
    pub current_user: Option<UserInfo>,
    pub flash: Option<FlashMessage>,
    pub ratings: Vec<i64>,
}

/// Raw submission; missing fields come through blank and are checked in
/// `into_entry`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub feedback: String,
    pub rating: Option<String>,
}

#[derive(Debug, Validate)]
struct FeedbackEntry {
    #[validate(length(min = 1, message = "Feedback cannot be empty."))]
    feedback: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    rating: Option<i64>,
}

impl FeedbackForm {
    fn into_entry(self) -> std::result::Result<FeedbackEntry, String> {
        let rating = match self.rating.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| "Rating must be between 1 and 5.".to_string())?,
            ),
        };

        let entry = FeedbackEntry {
            feedback: self.feedback.trim().to_string(),
            rating,
        };
        entry.validate().map_err(|errors| first_message(&errors))?;

        Ok(entry)
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid feedback.".to_string())
}

pub async fn feedback_page(
    Extension(current_user): Extension<CurrentUser>,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);

    let template = FeedbackTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        flash,
        ratings: (MIN_RATING..=MAX_RATING).rev().collect(),
    };

    (jar, HtmlTemplate(template))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    Form(form): Form<FeedbackForm>,
) -> Result<impl IntoResponse> {
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(message) => {
            let jar = flash::error(jar, message);
            return Ok((jar, Redirect::to("/feedback")));
        }
    };
    let Some(rating) = entry.rating else {
        let jar = flash::error(jar, "Please choose a rating.");
        return Ok((jar, Redirect::to("/feedback")));
    };

    state
        .service_context
        .feedback_repo
        .create(NewFeedback {
            user_id: current_user.user_id.clone(),
            body: entry.feedback,
            rating,
        })
        .await?;

    tracing::info!(user_id = %current_user.user_id, rating, "feedback submitted");

    let jar = flash::success(jar, "Feedback submitted successfully.");
    Ok((jar, Redirect::to("/feedback")))
}
