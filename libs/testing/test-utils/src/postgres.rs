//! PostgreSQL test infrastructure
//!
//! Provides a `TestDatabase` helper that starts a PostgreSQL container and
//! applies the SQL files from `manifests/migrations/todo`.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::path::PathBuf;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

const MIGRATIONS_DIR: &str = "manifests/migrations/todo";

/// Test database wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
pub struct TestDatabase {
    #[allow(dead_code)]
    container: ContainerAsync<Postgres>,
    pub connection: DatabaseConnection,
    pub connection_string: String,
    /// `127.0.0.1:<mapped port>`, suitable for `DB_HOST`
    pub host: String,
    pub user: String,
    pub password: String,
    pub schema: String,
}

impl TestDatabase {
    /// Start a container and apply the todo schema
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let connection = db.connection();
    /// # }
    /// ```
    pub async fn new() -> Self {
        let container = Postgres::default()
            .with_tag("18-alpine")
            .start()
            .await
            .expect("Failed to start Postgres container");

        let host_port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get host port");

        let host = format!("127.0.0.1:{}", host_port);
        let connection_string = format!(
            "postgres://postgres:postgres@{}/postgres?options=-c%20TimeZone%3DUTC",
            host
        );

        let connection = Database::connect(&connection_string)
            .await
            .expect("Failed to connect to test database");

        Self::run_migrations(&connection).await;

        tracing::info!(port = host_port, "Test database ready (Postgres 18)");

        Self {
            container,
            connection,
            connection_string,
            host,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            schema: "postgres".to_string(),
        }
    }

    /// Get a cloned connection (useful for passing to repositories)
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Remove every row and restart identity sequences
    pub async fn reset(&self) {
        self.connection
            .execute_unprepared("TRUNCATE TABLE todo RESTART IDENTITY")
            .await
            .expect("Failed to truncate todo table");
    }

    /// Find the workspace root by looking for Cargo.toml with [workspace]
    fn find_workspace_root() -> PathBuf {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir
            .ancestors()
            .find(|p| {
                std::fs::read_to_string(p.join("Cargo.toml"))
                    .map(|c| c.contains("[workspace]"))
                    .unwrap_or(false)
            })
            .unwrap_or(&manifest_dir)
            .to_path_buf()
    }

    /// Apply every `.sql` file in name order; any failing statement panics
    async fn run_migrations(connection: &DatabaseConnection) {
        let migrations_dir = Self::find_workspace_root().join(MIGRATIONS_DIR);

        let mut migrations: Vec<PathBuf> = std::fs::read_dir(&migrations_dir)
            .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", migrations_dir, e))
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
            .collect();

        migrations.sort();

        for path in migrations {
            let sql = std::fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Failed to read migration: {:?}", path));

            tracing::debug!("Running migration: {:?}", path.file_name());

            for statement in split_sql_statements(&sql) {
                connection
                    .execute_unprepared(&statement)
                    .await
                    .unwrap_or_else(|e| panic!("Migration {:?} failed: {}", path, e));
            }
        }

        tracing::info!("Migrations complete");
    }
}

/// Split SQL into statements, respecting dollar-quoted strings and dropping
/// comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_dollar_quote = false;
    let mut chars = sql.chars().peekable();

    let mut flush = |current: &mut String| {
        let stmt = current.trim();
        let is_comment_only = stmt.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with("--")
        });
        if !is_comment_only {
            statements.push(stmt.to_string());
        }
        current.clear();
    };

    while let Some(c) = chars.next() {
        current.push(c);

        if c == '$' && chars.peek() == Some(&'$') {
            chars.next();
            current.push('$');
            in_dollar_quote = !in_dollar_quote;
        } else if c == ';' && !in_dollar_quote {
            flush(&mut current);
        }
    }
    flush(&mut current);

    statements
}
