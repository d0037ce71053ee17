mod common;

use acad_pulse::{
    domain::{AchievementDraft, CircularDraft, NewFeedback, Role, UpdateStudentRequest},
    error::AppError,
    service::{registration_link_service::LinkInput, student_service::NewStudent},
};

fn student(department: &str, serial: &str, name: &str) -> NewStudent {
    NewStudent {
        department: department.to_string(),
        serial: serial.to_string(),
        full_name: name.to_string(),
        password: "pass123".to_string(),
        year: Some("II".to_string()),
        section: Some("A".to_string()),
    }
}

#[tokio::test]
async fn test_student_lifecycle() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);
    let students = &context.student_service;

    let created = students.create_student(student("Computer Science", "007", "Asha")).await?;
    assert_eq!(created.user_id, "CS007");
    assert_eq!(created.role, Role::Student);
    assert_eq!(created.department.as_deref(), Some("Computer Science"));

    // PG departments have no code
    let pg = students.create_student(student("MCA", "12", "Ravi")).await?;
    assert_eq!(pg.user_id, "STU012");

    let updated = students
        .update_student("CS007", UpdateStudentRequest {
            full_name: "Asha K".to_string(),
            department: Some("Computer Science".to_string()),
            year: Some("III".to_string()),
            section: Some("B".to_string()),
        })
        .await?;
    assert_eq!(updated.full_name, "Asha K");
    assert_eq!(updated.section.as_deref(), Some("B"));

    assert!(students.delete_student("CS007").await?);
    assert!(!students.delete_student("CS007").await?);
    assert!(context.account_repo.find_by_user_id("CS007").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_student_id_leaves_store_untouched() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);

    context
        .student_service
        .create_student(student("Physics", "5", "First"))
        .await?;

    let err = context
        .student_service
        .create_student(student("Physics", "005", "Second"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "ID PH005 already exists."));

    let stored = context.account_repo.find_by_user_id("PH005").await?.unwrap();
    assert_eq!(stored.full_name, "First");
    assert_eq!(context.account_repo.count_by_role(Role::Student).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_authentication_and_password_reset() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);

    context
        .student_service
        .create_student(student("Maths", "1", "Meena"))
        .await?;

    let accounts = &context.account_service;
    assert!(accounts.authenticate("mt001", "pass123").await?.is_some());
    assert!(accounts.authenticate("MT001", "wrong").await?.is_none());
    assert!(accounts.authenticate("MT999", "pass123").await?.is_none());

    let reset = context.student_service.reset_password(" mt001 ", "newpass").await?;
    assert_eq!(reset, "MT001");
    assert!(accounts.authenticate("MT001", "newpass").await?.is_some());
    assert!(accounts.authenticate("MT001", "pass123").await?.is_none());

    let err = context
        .student_service
        .reset_password("XX404", "whatever")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), Some("Student ID not found."));

    Ok(())
}

#[tokio::test]
async fn test_admin_password_change_rules() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);
    let settings = acad_pulse::config::Settings::default();

    let admin = context
        .account_service
        .ensure_bootstrap_admin(&settings.bootstrap)
        .await?
        .expect("first run creates the admin");
    assert_eq!(admin.user_id, "ADMIN001");

    // Second run is a no-op
    assert!(context
        .account_service
        .ensure_bootstrap_admin(&settings.bootstrap)
        .await?
        .is_none());

    let accounts = &context.account_service;
    let err = accounts
        .change_password("ADMIN001", "nope", "a", "a")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), Some("Current password is incorrect."));

    let err = accounts
        .change_password("ADMIN001", "AdminPass2026", "a", "b")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), Some("New password and confirm password do not match."));

    accounts
        .change_password("ADMIN001", "AdminPass2026", "Fresh2026", "Fresh2026")
        .await?;
    assert!(accounts.authenticate("ADMIN001", "Fresh2026").await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_registration_links_filter_on_active_flag() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);
    let links = &context.registration_link_service;

    let err = links
        .create(LinkInput {
            title: "Broken".to_string(),
            url: "not-a-url".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), Some("Invalid URL format. Use https://..."));
    assert_eq!(context.registration_link_repo.count_active().await?, 0);

    let err = links
        .create(LinkInput {
            title: "Bad date".to_string(),
            url: "https://example.com".to_string(),
            expiry: "tomorrow".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), Some("Invalid expiry date format."));

    // Already expired, but still active until an admin deactivates it
    let stale = links
        .create(LinkInput {
            title: "Old".to_string(),
            url: "https://example.com/old".to_string(),
            expiry: "2020-01-01T10:00".to_string(),
            ..Default::default()
        })
        .await?;
    let open = links
        .create(LinkInput {
            title: "Open".to_string(),
            url: "https://example.com/open".to_string(),
            department: "IT".to_string(),
            ..Default::default()
        })
        .await?;

    let active = context.registration_link_repo.list_active(None).await?;
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].id, open.id);

    links.deactivate(stale.id).await?;
    let active = context.registration_link_repo.list_active(None).await?;
    assert_eq!(active.iter().map(|l| l.id).collect::<Vec<_>>(), vec![open.id]);

    let err = links.deactivate(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_content_listing_order_and_limits() -> anyhow::Result<()> {
    let pool = common::memory_pool().await?;
    let context = common::service_context(pool);

    for i in 0..7 {
        context
            .circular_repo
            .create(CircularDraft {
                title: format!("Circular {}", i),
                content: String::new(),
                category: "General".to_string(),
                image_filename: None,
            })
            .await?;
        context
            .achievement_repo
            .create(AchievementDraft {
                title: format!("Award {}", i),
                winner_name: "Winner".to_string(),
                winner_image: None,
            })
            .await?;
    }

    let recent = context.circular_repo.list_recent(5).await?;
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].title, "Circular 6");
    assert_eq!(context.circular_repo.list_all().await?.len(), 7);
    assert_eq!(context.achievement_repo.count().await?, 7);

    // Ratings are stored as given
    let stored = context
        .feedback_repo
        .create(NewFeedback {
            user_id: "CS001".to_string(),
            body: "Loud".to_string(),
            rating: 11,
        })
        .await?;
    assert_eq!(stored.rating, 11);

    Ok(())
}
