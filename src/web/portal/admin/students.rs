use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::UpdateStudentRequest,
    error::Result,
    service::student_service::NewStudent,
    web::flash,
};
use super::non_blank;

const STUDENTS_TAB: &str = "/admin#students";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateStudentForm {
    pub department: String,
    pub serial: String,
    pub full_name: String,
    pub password: String,
    pub year: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditStudentForm {
    pub full_name: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub student_id: String,
    pub new_password: String,
}

pub async fn create_student(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CreateStudentForm>,
) -> Result<impl IntoResponse> {
    let student = NewStudent {
        department: form.department.trim().to_string(),
        serial: form.serial,
        full_name: form.full_name,
        password: form.password,
        year: non_blank(form.year),
        section: non_blank(form.section),
    };

    let result = state.service_context.student_service.create_student(student).await;
    let jar = flash::outcome(jar, result, |account| {
        format!("Student {} created successfully.", account.user_id)
    })?;

    Ok((jar, Redirect::to(STUDENTS_TAB)))
}

pub async fn edit_student(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    jar: SignedCookieJar,
    Form(form): Form<EditStudentForm>,
) -> Result<impl IntoResponse> {
    let update = UpdateStudentRequest {
        full_name: form.full_name.trim().to_string(),
        department: non_blank(form.department),
        year: non_blank(form.year),
        section: non_blank(form.section),
    };

    let result = state
        .service_context
        .student_service
        .update_student(&user_id, update)
        .await;
    let jar = flash::outcome(jar, result, |_| "Student updated successfully.".to_string())?;

    Ok((jar, Redirect::to(STUDENTS_TAB)))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse> {
    let deleted = state.service_context.student_service.delete_student(&user_id).await?;

    let jar = if deleted {
        flash::success(jar, "Student deleted successfully.")
    } else {
        jar
    };

    Ok((jar, Redirect::to(STUDENTS_TAB)))
}

pub async fn reset_student_password(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ResetPasswordForm>,
) -> Result<impl IntoResponse> {
    let result = state
        .service_context
        .student_service
        .reset_password(&form.student_id, &form.new_password)
        .await;
    let jar = flash::outcome(jar, result, |user_id| {
        format!("Password reset for {} successfully.", user_id)
    })?;

    Ok((jar, Redirect::to(STUDENTS_TAB)))
}
