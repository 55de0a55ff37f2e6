use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use lms_api::{build_router, AppState};
use lms_core::ports::Notifier;
use lms_core::repositories::{CourseRepository, EnrollmentRepository, GroupRepository, UserRepository};
use lms_core::services::{CourseService, GroupService, SearchService, UserService};
use lms_infrastructure::{
    create_pool, run_migrations, HttpIdentityProvider, LogNotifier, PgCourseRepository,
    PgEnrollmentRepository, PgGroupRepository, PgUserRepository, SmtpNotifier,
};
use lms_security::TokenVerifier;
use lms_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    lms_shared::telemetry::init_telemetry(config.app.json_logs);
    info!("{} starting ({})...", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database)
        .await
        .context("connecting to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        if let Err(e) = run_migrations(&pool).await {
            error!("Migration failed: {}", e);
            return Err(e.into());
        }
    }

    // Repositories
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let groups: Arc<dyn GroupRepository> = Arc::new(PgGroupRepository::new(pool.clone()));
    let courses: Arc<dyn CourseRepository> = Arc::new(PgCourseRepository::new(pool.clone()));
    let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(PgEnrollmentRepository::new(pool));

    // Outbound adapters
    let identity = Arc::new(HttpIdentityProvider::from_settings(&config.identity)?);
    let notifier: Arc<dyn Notifier> = if config.mail.enabled {
        Arc::new(SmtpNotifier::new(&config.mail, &config.app.name)?)
    } else {
        info!("Mail disabled; notifications will be logged only");
        Arc::new(LogNotifier::new(&config.mail, &config.app.name)?)
    };

    // Services
    let group_service = Arc::new(GroupService::new(groups.clone(), users.clone()));
    let state = AppState {
        users: Arc::new(UserService::new(users.clone(), groups, identity, notifier)),
        groups: group_service.clone(),
        courses: Arc::new(CourseService::new(courses.clone(), enrollments, users, group_service)),
        search: Arc::new(SearchService::new(courses)),
        verifier: Arc::new(TokenVerifier::from_settings(&config.identity)),
    };

    let app = build_router(state, &config.app.cors_origin);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
