#[cfg(test)]
pub mod test_utils {
    use crate::auth::{EMAIL_HEADER, NAME_HEADER, SUBJECT_HEADER};
    use crate::mailer::{Mailer, MailerError};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::http::{HeaderName, HeaderValue};
    use axum::Router;
    use axum_test::TestRequest;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{profile, user_role, user_role::Role};
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// One email captured by the recording mailer
    #[derive(Debug, Clone)]
    pub struct RecordedEmail {
        pub to: Vec<String>,
        pub subject: String,
        pub html: String,
    }

    /// Mailer that records sends instead of talking to a provider. Tests can
    /// flip it into rejecting mode to exercise delivery failures.
    #[derive(Debug, Default)]
    pub struct RecordingMailer {
        messages: Mutex<Vec<RecordedEmail>>,
        reject: AtomicBool,
    }

    impl RecordingMailer {
        /// Everything sent so far, in order
        pub fn sent(&self) -> Vec<RecordedEmail> {
            self.messages.lock().expect("mailer mutex poisoned").clone()
        }

        /// Make every later send fail as if the provider rejected it
        pub fn reject_sends(&self) {
            self.reject.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailerError> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(MailerError::Rejected {
                    status: 500,
                    body: "rejected by test mailer".to_string(),
                });
            }

            self.messages
                .lock()
                .expect("mailer mutex poisoned")
                .push(RecordedEmail {
                    to: to.to_vec(),
                    subject: subject.to_string(),
                    html: html.to_string(),
                });
            Ok(())
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let (state, _mailer) = setup_test_app_state_with_mailer().await;
        state
    }

    /// Create AppState for testing, keeping a handle on the recording mailer
    pub async fn setup_test_app_state_with_mailer() -> (AppState, Arc<RecordingMailer>) {
        let db = setup_test_db().await;
        let cache = Cache::new(100);
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState {
            db,
            cache,
            mailer: mailer.clone(),
        };
        (state, mailer)
    }

    /// Insert a profile and optionally bind a role to it
    pub async fn seed_profile(
        db: &DatabaseConnection,
        subject: &str,
        email: &str,
        full_name: &str,
        role: Option<Role>,
    ) -> profile::Model {
        let profile = profile::ActiveModel {
            subject: Set(subject.to_string()),
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed profile");

        if let Some(role) = role {
            user_role::ActiveModel {
                profile_id: Set(profile.id),
                role: Set(role),
                granted_by: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("Failed to seed role binding");
        }

        profile
    }

    fn header_value(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("Invalid header value")
    }

    /// Attach the subject header of an already provisioned profile
    pub fn signed_in(request: TestRequest, subject: &str) -> TestRequest {
        request.add_header(
            HeaderName::from_static(SUBJECT_HEADER),
            header_value(subject),
        )
    }

    /// Attach the full identity header set a fresh sign-in carries
    pub fn with_identity(
        request: TestRequest,
        subject: &str,
        email: &str,
        full_name: &str,
    ) -> TestRequest {
        request
            .add_header(
                HeaderName::from_static(SUBJECT_HEADER),
                header_value(subject),
            )
            .add_header(HeaderName::from_static(EMAIL_HEADER), header_value(email))
            .add_header(
                HeaderName::from_static(NAME_HEADER),
                header_value(full_name),
            )
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// This function sets up a tracing subscriber that outputs logs to STDERR,
    /// which is useful for debugging tests. The log level is determined by the
    /// RUST_LOG environment variable, defaulting to WARN if not set.
    ///
    /// # Returns
    ///
    /// A guard that will clean up the subscriber when dropped.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        // Get log level from environment variable or default to WARN
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        // Initialize tracing for tests
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        println!("Test database setup complete");
        let router = create_router(state);
        println!("Test router created");
        router
    }
}
