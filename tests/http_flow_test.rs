mod common;

use std::{collections::HashMap, io::Cursor};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;

/// Drives the router like a browser that keeps cookies between requests.
struct Client {
    router: Router,
    cookies: HashMap<String, String>,
}

impl Client {
    fn new(router: Router) -> Self {
        Self { router, cookies: HashMap::new() }
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response {
        if !self.cookies.is_empty() {
            let header_value = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, header_value.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            if value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(&mut self, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_multipart(&mut self, uri: &str, body: Vec<u8>) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn login(&mut self, user_id: &str, password: &str) -> Response {
        self.post_form("/", &format!("user_id={}&password={}", user_id, password)).await
    }

    /// Follows up a redirect by loading the page, returning its HTML.
    async fn page(&mut self, uri: &str) -> String {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        body_text(response).await
    }
}

const BOUNDARY: &str = "acadpulseboundary";

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut client = Client::new(app.router);

    let response = client.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("healthy"));

    Ok(())
}

#[tokio::test]
async fn test_bad_credentials_flash_on_login_page() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut client = Client::new(app.router);

    let response = client.login("ADMIN001", "wrong").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = client.page("/").await;
    assert!(html.contains("Invalid username or password."));

    // The message is shown once
    let html = client.page("/").await;
    assert!(!html.contains("Invalid username or password."));

    // A post missing the password field is flashed like bad credentials
    let response = client.post_form("/", "user_id=ADMIN001").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let html = client.page("/").await;
    assert!(html.contains("Invalid username or password."));

    Ok(())
}

#[tokio::test]
async fn test_admin_creates_student_who_can_log_in() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());

    let response = admin.login("admin001", "AdminPass2026").await;
    assert_eq!(location(&response), "/admin");

    let form = "department=Computer+Science&serial=007&full_name=Asha+K&password=pass123&year=II&section=A";
    let response = admin.post_form("/admin-create-student", form).await;
    assert_eq!(location(&response), "/admin#students");
    let html = admin.page("/admin").await;
    assert!(html.contains("Student CS007 created successfully."));

    // Same department and serial again: rejected, nothing overwritten
    let response = admin
        .post_form("/admin-create-student", &form.replace("Asha+K", "Someone+Else"))
        .await;
    assert_eq!(location(&response), "/admin#students");
    let html = admin.page("/admin").await;
    assert!(html.contains("ID CS007 already exists."));
    let stored = app.context.account_repo.find_by_user_id("CS007").await?.unwrap();
    assert_eq!(stored.full_name, "Asha K");

    let mut student = Client::new(app.router.clone());
    let response = student.login("CS007", "pass123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let html = student.page("/dashboard").await;
    assert!(html.contains("Asha K"));

    Ok(())
}

enum Payload {
    Empty,
    Form(&'static str),
    Multipart(Vec<u8>),
}

/// Every admin endpoint with a body that would change state if it got through.
fn admin_requests(circular_id: i64, achievement_id: i64, link_id: i64) -> Vec<(bool, String, Payload)> {
    let image = png(40, 40);
    vec![
        (false, "/admin".to_string(), Payload::Empty),
        (
            true,
            "/admin-create-student".to_string(),
            Payload::Form("department=Physics&serial=9&full_name=Intruder&password=pw"),
        ),
        (true, "/admin-edit-student/PH003".to_string(), Payload::Form("full_name=Renamed")),
        (true, "/admin-delete-student/PH003".to_string(), Payload::Empty),
        (
            true,
            "/admin-reset-student-password".to_string(),
            Payload::Form("student_id=PH003&new_password=taken"),
        ),
        (
            true,
            "/admin-circular".to_string(),
            Payload::Multipart(multipart_body(
                &[("title", "Forged"), ("content", "x"), ("circular_type", "General")],
                Some(("image", "forged.png", &image)),
            )),
        ),
        (
            true,
            format!("/admin-edit-circular/{}", circular_id),
            Payload::Multipart(multipart_body(&[("title", "Defaced"), ("content", "x")], None)),
        ),
        (
            true,
            "/admin-achievement".to_string(),
            Payload::Multipart(multipart_body(&[("title", "Forged"), ("winner_name", "Nobody")], None)),
        ),
        (
            true,
            format!("/admin-edit-achievement/{}", achievement_id),
            Payload::Multipart(multipart_body(
                &[("title", "Defaced"), ("winner_name", "Nobody")],
                Some(("winner_image", "forged.png", &image)),
            )),
        ),
        (
            true,
            "/admin-reg-link".to_string(),
            Payload::Form("link_title=Sneaky&registration_url=https%3A%2F%2Fexample.com"),
        ),
        (
            true,
            format!("/admin-edit-reg-link/{}", link_id),
            Payload::Form("link_title=Defaced&registration_url=https%3A%2F%2Fexample.com%2Fx"),
        ),
        (true, format!("/admin-deactivate-link/{}", link_id), Payload::Empty),
        (
            true,
            "/admin-change-password".to_string(),
            Payload::Form("current_password=AdminPass2026&new_password=owned&confirm_password=owned"),
        ),
    ]
}

async fn send_as(client: &mut Client, post: bool, uri: &str, payload: Payload) -> Response {
    match (post, payload) {
        (false, _) => client.get(uri).await,
        (true, Payload::Empty) => client.post_form(uri, "").await,
        (true, Payload::Form(body)) => client.post_form(uri, body).await,
        (true, Payload::Multipart(body)) => client.post_multipart(uri, body).await,
    }
}

#[tokio::test]
async fn test_role_guards_redirect_to_login() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;

    let mut anonymous = Client::new(app.router.clone());
    for uri in ["/dashboard", "/admin", "/circulars"] {
        let response = anonymous.get(uri).await;
        assert_eq!(location(&response), "/", "GET {}", uri);
    }
    let response = anonymous.post_form("/feedback-submit", "feedback=hi&rating=5").await;
    assert_eq!(location(&response), "/");
    assert_eq!(app.context.feedback_repo.count().await?, 0);

    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;
    admin
        .post_form(
            "/admin-create-student",
            "department=Physics&serial=3&full_name=Priya&password=pw&year=I&section=B",
        )
        .await;
    admin
        .post_multipart(
            "/admin-circular",
            multipart_body(&[("title", "Holiday"), ("content", "Closed Friday.")], None),
        )
        .await;
    admin
        .post_multipart(
            "/admin-achievement",
            multipart_body(&[("title", "Chess Open"), ("winner_name", "Ravi")], None),
        )
        .await;
    admin
        .post_form("/admin-reg-link", "link_title=Expo&registration_url=https%3A%2F%2Fexample.com%2Fexpo")
        .await;

    let circular_id = app.context.circular_repo.list_all().await?[0].id;
    let achievement_id = app.context.achievement_repo.list_all().await?[0].id;
    let link_id = app.context.registration_link_repo.list_active(None).await?[0].id;

    let mut student = Client::new(app.router.clone());
    student.login("PH003", "pw").await;

    for client in [&mut anonymous, &mut student] {
        for (post, uri, payload) in admin_requests(circular_id, achievement_id, link_id) {
            let response = send_as(client, post, &uri, payload).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(location(&response), "/", "{}", uri);
        }
    }

    // Nothing moved
    let circulars = app.context.circular_repo.list_all().await?;
    assert_eq!(circulars.len(), 1);
    assert_eq!(circulars[0].title, "Holiday");
    let achievements = app.context.achievement_repo.list_all().await?;
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].title, "Chess Open");
    let links = app.context.registration_link_repo.list_active(None).await?;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].title, "Expo");
    let priya = app.context.account_repo.find_by_user_id("PH003").await?.unwrap();
    assert_eq!(priya.full_name, "Priya");
    assert!(app.context.account_repo.find_by_user_id("PH009").await?.is_none());
    assert_eq!(std::fs::read_dir(app.uploads.path())?.count(), 0);

    let mut check = Client::new(app.router.clone());
    assert_eq!(location(&check.login("PH003", "pw").await), "/dashboard");
    let mut check = Client::new(app.router.clone());
    assert_eq!(location(&check.login("ADMIN001", "AdminPass2026").await), "/admin");

    // Admins do not see the student portal either
    let response = admin.get("/dashboard").await;
    assert_eq!(location(&response), "/");

    // Logging out ends the session
    let response = student.get("/logout").await;
    assert_eq!(location(&response), "/");
    let response = student.get("/dashboard").await;
    assert_eq!(location(&response), "/");

    Ok(())
}

#[tokio::test]
async fn test_failed_write_leaves_no_upload_behind() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;

    admin
        .post_multipart(
            "/admin-achievement",
            multipart_body(&[("title", "Relay"), ("winner_name", "Team B")], None),
        )
        .await;
    let achievement_id = app.context.achievement_repo.list_all().await?[0].id;

    sqlx::query(
        "CREATE TRIGGER reject_circulars BEFORE INSERT ON circulars BEGIN SELECT RAISE(ABORT, 'read only'); END",
    )
    .execute(&app.context.db_pool)
    .await?;
    sqlx::query(
        "CREATE TRIGGER reject_achievement_edits BEFORE UPDATE ON achievements BEGIN SELECT RAISE(ABORT, 'read only'); END",
    )
    .execute(&app.context.db_pool)
    .await?;

    let image = png(64, 64);
    let response = admin
        .post_multipart(
            "/admin-circular",
            multipart_body(&[("title", "Notice")], Some(("image", "notice.png", &image))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = admin
        .post_multipart(
            &format!("/admin-edit-achievement/{}", achievement_id),
            multipart_body(
                &[("title", "Relay"), ("winner_name", "Team B")],
                Some(("winner_image", "team.png", &image)),
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(app.context.circular_repo.count().await?, 0);
    let achievement = app.context.achievement_repo.find_by_id(achievement_id).await?.unwrap();
    assert!(achievement.winner_image.is_none());
    assert_eq!(std::fs::read_dir(app.uploads.path())?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_invalid_link_url_is_rejected() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;

    let response = admin
        .post_form("/admin-reg-link", "link_title=Fest&registration_url=not-a-url&department=&expiry_date=")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin#reglinks");

    assert_eq!(app.context.registration_link_repo.count_active().await?, 0);
    let html = admin.page("/admin").await;
    assert!(html.contains("Invalid URL format."));

    Ok(())
}

#[tokio::test]
async fn test_deactivated_link_hidden_from_students() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;

    admin
        .post_form(
            "/admin-reg-link",
            "link_title=Hackathon+Signup&registration_url=https%3A%2F%2Fexample.com%2Fhack&department=IT&expiry_date=2020-05-01T09%3A30",
        )
        .await;
    admin
        .post_form(
            "/admin-create-student",
            "department=IT&serial=10&full_name=Kiran&password=pw&year=III&section=C",
        )
        .await;

    let mut student = Client::new(app.router.clone());
    student.login("IT010", "pw").await;

    // Past expiry does not hide an active link
    let html = student.page("/registration-links").await;
    assert!(html.contains("Hackathon Signup"));
    assert!(html.contains("Expired"));

    let link = app.context.registration_link_repo.list_active(None).await?.remove(0);
    let response = admin.post_form(&format!("/admin-deactivate-link/{}", link.id), "").await;
    assert_eq!(location(&response), "/admin#reglinks");

    let html = student.page("/registration-links").await;
    assert!(!html.contains("Hackathon Signup"));
    let html = student.page("/dashboard").await;
    assert!(!html.contains("Hackathon Signup"));

    let response = admin.post_form("/admin-deactivate-link/4242", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_circular_with_image_upload() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;

    let image = png(1200, 1200);
    let body = multipart_body(
        &[("title", "Exam Schedule"), ("content", "Semester exams start Monday."), ("circular_type", "Exam")],
        Some(("image", "schedule.png", &image)),
    );
    let response = admin.post_multipart("/admin-circular", body).await;
    assert_eq!(location(&response), "/admin#circulars");

    let circulars = app.context.circular_repo.list_all().await?;
    assert_eq!(circulars.len(), 1);
    let circular = &circulars[0];
    assert_eq!(circular.category, "Exam");
    let file_name = circular.image_filename.clone().expect("image stored");
    assert!(file_name.ends_with("_schedule.png"));

    let stored = app.uploads.path().join(&file_name);
    assert_eq!(image::image_dimensions(&stored)?, (600, 600));

    let response = admin.get(&format!("/static/uploads/{}", file_name)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Editing without a new file keeps the image
    let body = multipart_body(
        &[("title", "Exam Schedule (revised)"), ("content", "Exams start Tuesday."), ("circular_type", "Exam")],
        None,
    );
    let response = admin
        .post_multipart(&format!("/admin-edit-circular/{}", circular.id), body)
        .await;
    assert_eq!(location(&response), "/admin#circulars");

    let updated = app.context.circular_repo.find_by_id(circular.id).await?.unwrap();
    assert_eq!(updated.title, "Exam Schedule (revised)");
    assert_eq!(updated.image_filename.as_deref(), Some(file_name.as_str()));

    // Students can read it; unknown ids are a 404
    admin
        .post_form(
            "/admin-create-student",
            "department=English&serial=2&full_name=Leela&password=pw&year=I&section=A",
        )
        .await;
    let mut student = Client::new(app.router.clone());
    student.login("EN002", "pw").await;
    let html = student.page(&format!("/circular/{}", circular.id)).await;
    assert!(html.contains("Exams start Tuesday."));
    let response = student.get("/circular/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_non_image_upload_is_flashed() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;

    let body = multipart_body(
        &[("title", "Champion"), ("winner_name", "Deepa")],
        Some(("winner_image", "photo.png", b"this is not a png")),
    );
    let response = admin.post_multipart("/admin-achievement", body).await;
    assert_eq!(location(&response), "/admin#achievements");

    assert_eq!(app.context.achievement_repo.count().await?, 0);
    let html = admin.page("/admin").await;
    assert!(html.contains("Uploaded file is not a supported image."));

    Ok(())
}

#[tokio::test]
async fn test_feedback_submission() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let mut admin = Client::new(app.router.clone());
    admin.login("ADMIN001", "AdminPass2026").await;
    admin
        .post_form(
            "/admin-create-student",
            "department=Tamil&serial=8&full_name=Arun&password=pw&year=II&section=B",
        )
        .await;

    let mut student = Client::new(app.router.clone());
    student.login("TM008", "pw").await;

    let response = student.post_form("/feedback-submit", "feedback=Labs+need+more+time&rating=9").await;
    assert_eq!(location(&response), "/feedback");
    let html = student.page("/feedback").await;
    assert!(html.contains("Rating must be between 1 and 5."));
    assert_eq!(app.context.feedback_repo.count().await?, 0);

    // Blank or missing fields come back as messages
    let response = student.post_form("/feedback-submit", "feedback=Labs+need+more+time&rating=").await;
    assert_eq!(location(&response), "/feedback");
    let html = student.page("/feedback").await;
    assert!(html.contains("Please choose a rating."));

    let response = student.post_form("/feedback-submit", "rating=3").await;
    assert_eq!(location(&response), "/feedback");
    let html = student.page("/feedback").await;
    assert!(html.contains("Feedback cannot be empty."));
    assert_eq!(app.context.feedback_repo.count().await?, 0);

    let response = student.post_form("/feedback-submit", "feedback=Labs+need+more+time&rating=4").await;
    assert_eq!(location(&response), "/feedback");
    let html = student.page("/feedback").await;
    assert!(html.contains("Feedback submitted successfully."));

    let stored = app.context.feedback_repo.list_recent(10).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, "TM008");
    assert_eq!(stored[0].rating, 4);

    let html = admin.page("/admin").await;
    assert!(html.contains("Labs need more time"));

    Ok(())
}
