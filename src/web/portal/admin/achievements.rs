use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::SignedCookieJar;

use crate::{
    api::state::AppState,
    domain::{Achievement, AchievementDraft},
    error::{AppError, Result},
    web::{flash, uploads::MultipartForm},
};
use super::required;

const ACHIEVEMENTS_TAB: &str = "/admin#achievements";

struct AchievementFields {
    title: String,
    winner_name: String,
}

fn read_fields(form: &MultipartForm) -> Result<AchievementFields> {
    Ok(AchievementFields {
        title: required(form, "title", "Achievement title is required.")?,
        winner_name: required(form, "winner_name", "Winner name is required.")?,
    })
}

pub async fn create_achievement(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let result = publish(&state, multipart).await;
    let jar = flash::outcome(jar, result, |_| "Achievement posted successfully.".to_string())?;

    Ok((jar, Redirect::to(ACHIEVEMENTS_TAB)))
}

async fn publish(state: &AppState, multipart: Multipart) -> Result<Achievement> {
    let form = MultipartForm::from_multipart(multipart).await?;
    let fields = read_fields(&form)?;

    let winner_image = match form.file("winner_image") {
        Some(file) => Some(state.image_store.save(&file.file_name, file.data.clone()).await?),
        None => None,
    };

    let created = state
        .service_context
        .achievement_repo
        .create(AchievementDraft {
            title: fields.title,
            winner_name: fields.winner_name,
            winner_image: winner_image.clone(),
        })
        .await;
    let achievement = state
        .image_store
        .keep_if_stored(winner_image.as_deref(), created)
        .await?;

    tracing::info!(id = achievement.id, winner = %achievement.winner_name, "achievement published");
    Ok(achievement)
}

pub async fn edit_achievement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let result = revise(&state, id, multipart).await;
    let jar = flash::outcome(jar, result, |_| "Achievement updated successfully.".to_string())?;

    Ok((jar, Redirect::to(ACHIEVEMENTS_TAB)))
}

async fn revise(state: &AppState, id: i64, multipart: Multipart) -> Result<Achievement> {
    let repo = &state.service_context.achievement_repo;
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Achievement not found".to_string()))?;

    let form = MultipartForm::from_multipart(multipart).await?;
    let fields = read_fields(&form)?;

    let new_image = match form.file("winner_image") {
        Some(file) => Some(state.image_store.save(&file.file_name, file.data.clone()).await?),
        None => None,
    };

    let result = repo
        .update(id, AchievementDraft {
            title: fields.title,
            winner_name: fields.winner_name,
            winner_image: new_image.clone().or(existing.winner_image.clone()),
        })
        .await;
    let updated = state
        .image_store
        .keep_if_stored(new_image.as_deref(), result)
        .await?;

    if let (Some(_), Some(old)) = (new_image, existing.winner_image) {
        state.image_store.remove(&old).await;
    }

    tracing::info!(id, "achievement updated");
    Ok(updated)
}
