use std::sync::Arc;

use acad_pulse::{
    auth::AuthService,
    config::Settings,
    domain::{
        student_id::DEPARTMENT_CODES, AchievementDraft, CircularDraft, NewFeedback,
        CIRCULAR_CATEGORIES,
    },
    error::AppError,
    service::{registration_link_service::LinkInput, student_service::NewStudent, ServiceContext},
};
use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{
        lorem::en::{Paragraph, Sentence},
        name::en::Name,
    },
    Fake,
};
use rand::Rng;
use sqlx::sqlite::SqlitePoolOptions;

/// Fill a database with demo students and content.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// SQLite connection string
    #[arg(long, default_value = "sqlite://acadpulse.db?mode=rwc")]
    database_url: String,

    /// Number of students to create
    #[arg(long, default_value_t = 12)]
    students: u32,

    /// Password given to every seeded student
    #[arg(long, default_value = "student123")]
    student_password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("🌱 Seeding {}", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let settings = Settings::default();
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        settings.auth.session_duration_hours,
        false,
    ));
    let context = ServiceContext::from_pool(db_pool, auth_service);

    if let Some(admin) = context.account_service.ensure_bootstrap_admin(&settings.bootstrap).await? {
        println!(
            "  ✅ Created admin {} / {}",
            admin.user_id, settings.bootstrap.admin_password
        );
    }

    // Students
    println!("👥 Creating students...");
    let mut created = 0;
    for i in 0..args.students {
        let (department, _) = DEPARTMENT_CODES[i as usize % DEPARTMENT_CODES.len()];
        let student = NewStudent {
            department: department.to_string(),
            serial: format!("{}", i / DEPARTMENT_CODES.len() as u32 + 1),
            full_name: Name().fake(),
            password: args.student_password.clone(),
            year: Some(["I", "II", "III"][i as usize % 3].to_string()),
            section: Some(["A", "B", "C"][i as usize % 3].to_string()),
        };

        match context.student_service.create_student(student).await {
            Ok(account) => {
                created += 1;
                println!("  • {} {}", account.user_id, account.full_name);
            }
            Err(AppError::Conflict(msg)) => println!("  ↷ {}", msg),
            Err(e) => return Err(e.into()),
        }
    }
    println!("  ✅ Created {} students (password: {})", created, args.student_password);

    // Circulars
    println!("📰 Creating circulars...");
    for category in CIRCULAR_CATEGORIES {
        context.circular_repo.create(CircularDraft {
            title: Sentence(3..7).fake(),
            content: Paragraph(2..5).fake(),
            category: category.to_string(),
            image_filename: None,
        }).await?;
    }

    // Achievements
    println!("🏆 Creating achievements...");
    for title in ["Inter-college Hackathon", "State Level Quiz", "Annual Sports Meet"] {
        context.achievement_repo.create(AchievementDraft {
            title: format!("{} - First Prize", title),
            winner_name: Name().fake(),
            winner_image: None,
        }).await?;
    }

    // Registration links: one open, one already past its expiry, one withdrawn
    println!("🔗 Creating registration links...");
    let soon = (Utc::now() + Duration::days(14)).format("%Y-%m-%dT%H:%M").to_string();
    let past = (Utc::now() - Duration::days(2)).format("%Y-%m-%dT%H:%M").to_string();

    let links = context.registration_link_service.clone();
    links.create(LinkInput {
        title: "Symposium Registration".to_string(),
        url: "https://example.com/symposium".to_string(),
        department: "Computer Science".to_string(),
        expiry: soon,
    }).await?;
    links.create(LinkInput {
        title: "Workshop on Data Science".to_string(),
        url: "https://example.com/ds-workshop".to_string(),
        department: String::new(),
        expiry: past,
    }).await?;
    let withdrawn = links.create(LinkInput {
        title: "Cancelled Seminar".to_string(),
        url: "https://example.com/seminar".to_string(),
        department: String::new(),
        expiry: String::new(),
    }).await?;
    links.deactivate(withdrawn.id).await?;

    // Feedback
    println!("💬 Creating feedback...");
    let mut rng = rand::thread_rng();
    for _ in 0..5 {
        context.feedback_repo.create(NewFeedback {
            user_id: "CS001".to_string(),
            body: Sentence(5..12).fake(),
            rating: rng.gen_range(1..=5),
        }).await?;
    }

    println!("✨ Done");
    Ok(())
}
