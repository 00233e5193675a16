//! Server test utilities.

use roster_core::config::{AppConfig, DatabaseConfig, ServerConfig};
use roster_store::{SqliteStore, UserStore};
use roster_server::{AppState, create_router};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    sqlite_store: Arc<SqliteStore>,
    upload_dir: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server backed by a temporary SQLite database.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("roster.db");
        let sqlite_store = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create user store"),
        );

        let upload_dir = temp_dir.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload directory");

        let mut config = AppConfig {
            server: ServerConfig {
                upload_dir: upload_dir.clone(),
                ..Default::default()
            },
            database: DatabaseConfig::Sqlite { path: db_path },
        };

        // Apply user modifications
        modifier(&mut config);

        let store: Arc<dyn UserStore> = sqlite_store.clone();
        let state = AppState::new(config, store);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            sqlite_store,
            upload_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Get a reference to the SQLite connection pool for raw queries.
    pub fn pool(&self) -> &Pool<Sqlite> {
        self.sqlite_store.pool()
    }

    /// Directory the server writes uploads into.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Names of the files currently in the upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.upload_dir)
            .expect("Failed to read upload directory")
            .map(|entry| {
                entry
                    .expect("Failed to read directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    /// Number of rows in the users table.
    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await
            .expect("Failed to count users")
    }
}
