use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::SignedCookieJar;

use crate::{
    api::state::AppState,
    domain::{Circular, CircularDraft, DEFAULT_CATEGORY},
    error::{AppError, Result},
    web::{flash, uploads::MultipartForm},
};
use super::required;

const CIRCULARS_TAB: &str = "/admin#circulars";
const TITLE_REQUIRED: &str = "Circular title is required.";

pub async fn create_circular(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let result = publish(&state, multipart).await;
    let jar = flash::outcome(jar, result, |_| "Circular posted successfully.".to_string())?;

    Ok((jar, Redirect::to(CIRCULARS_TAB)))
}

async fn publish(state: &AppState, multipart: Multipart) -> Result<Circular> {
    let form = MultipartForm::from_multipart(multipart).await?;
    let title = required(&form, "title", TITLE_REQUIRED)?;

    let image_filename = match form.file("image") {
        Some(file) => Some(state.image_store.save(&file.file_name, file.data.clone()).await?),
        None => None,
    };

    let created = state
        .service_context
        .circular_repo
        .create(CircularDraft {
            title,
            content: form.text("content").trim().to_string(),
            category: form
                .opt_text("circular_type")
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image_filename: image_filename.clone(),
        })
        .await;
    let circular = state
        .image_store
        .keep_if_stored(image_filename.as_deref(), created)
        .await?;

    tracing::info!(id = circular.id, category = %circular.category, "circular published");
    Ok(circular)
}

pub async fn edit_circular(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let result = revise(&state, id, multipart).await;
    let jar = flash::outcome(jar, result, |_| "Circular updated successfully.".to_string())?;

    Ok((jar, Redirect::to(CIRCULARS_TAB)))
}

async fn revise(state: &AppState, id: i64, multipart: Multipart) -> Result<Circular> {
    let repo = &state.service_context.circular_repo;
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Circular not found".to_string()))?;

    let form = MultipartForm::from_multipart(multipart).await?;
    let title = required(&form, "title", TITLE_REQUIRED)?;

    // The stored image is kept unless a new file arrives.
    let new_image = match form.file("image") {
        Some(file) => Some(state.image_store.save(&file.file_name, file.data.clone()).await?),
        None => None,
    };

    let result = repo
        .update(id, CircularDraft {
            title,
            content: form.text("content").trim().to_string(),
            category: form.opt_text("circular_type").unwrap_or(existing.category),
            image_filename: new_image.clone().or(existing.image_filename.clone()),
        })
        .await;
    let updated = state
        .image_store
        .keep_if_stored(new_image.as_deref(), result)
        .await?;

    if let (Some(_), Some(old)) = (new_image, existing.image_filename) {
        state.image_store.remove(&old).await;
    }

    tracing::info!(id, "circular updated");
    Ok(updated)
}
