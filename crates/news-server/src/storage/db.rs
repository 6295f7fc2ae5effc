//! PostgreSQL news store
//!
//! Opens one connection per operation and closes it before returning,
//! whatever the outcome. There is no pool: connection setup goes through
//! the retry policy every time.

use crate::config::DbSettings;
use crate::storage::retry::RetryPolicy;
use async_trait::async_trait;
use news_core::{NewsError, NewsItem, NewsStore, NewsUpdate, Result};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Postgres, Transaction};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

pub struct Database {
    settings: DbSettings,
    retry: RetryPolicy,
    schema_ready: OnceCell<()>,
}

impl Database {
    pub fn new(settings: DbSettings, retry: RetryPolicy) -> Self {
        Self {
            settings,
            retry,
            schema_ready: OnceCell::new(),
        }
    }

    /// Open a connection, retrying per the configured policy.
    ///
    /// The first connection of the process also creates the `news` table if
    /// it does not exist yet.
    pub async fn connect(&self) -> Result<PgConnection> {
        let settings = &self.settings;
        let outcome = self
            .retry
            .run(|attempt| async move {
                debug!("Connecting to PostgreSQL (attempt {})", attempt);
                let options = connect_options(settings)?;
                PgConnection::connect_with(&options)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;

        let mut conn = match outcome {
            Ok(conn) => conn,
            Err(exhausted) => {
                error!(
                    "Giving up on PostgreSQL after {} attempt(s): {}",
                    exhausted.attempts, exhausted.last_error
                );
                return Err(NewsError::ConnectionFailed {
                    attempts: exhausted.attempts,
                    message: exhausted.last_error,
                });
            }
        };

        if let Err(e) = self.ensure_schema(&mut conn).await {
            release(conn).await;
            return Err(e);
        }

        Ok(conn)
    }

    async fn ensure_schema(&self, conn: &mut PgConnection) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| async move {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS news (
                        id BIGSERIAL PRIMARY KEY,
                        title TEXT NOT NULL,
                        content TEXT NOT NULL DEFAULT ''
                    )
                    "#,
                )
                .execute(&mut *conn)
                .await
                .map_err(NewsError::backend)?;

                info!("News table ready");
                Ok::<(), NewsError>(())
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl NewsStore for Database {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<NewsItem>> {
        let mut conn = self.connect().await?;
        let result = select_all(&mut conn).await;
        release(conn).await;
        result
    }

    async fn create(&self, title: &str, content: &str) -> Result<NewsItem> {
        let mut conn = self.connect().await?;
        let result = insert_item(&mut conn, title, content).await;
        release(conn).await;
        result
    }

    async fn update(&self, id: i64, fields: &NewsUpdate) -> Result<NewsItem> {
        let mut conn = self.connect().await?;
        let result = update_item(&mut conn, id, fields).await;
        release(conn).await;
        result
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = delete_item(&mut conn, id).await;
        release(conn).await;
        result
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(NewsError::backend);
        release(conn).await;
        result
    }
}

fn connect_options(settings: &DbSettings) -> std::result::Result<PgConnectOptions, String> {
    fn required<'a>(value: &'a Option<String>, key: &str) -> std::result::Result<&'a str, String> {
        value.as_deref().ok_or_else(|| format!("{} is not set", key))
    }

    let mut options = PgConnectOptions::new()
        .host(required(&settings.host, "DB_HOST")?)
        .port(settings.port)
        .database(required(&settings.name, "DB_NAME")?)
        .username(required(&settings.user, "DB_USER")?);

    if let Some(password) = &settings.password {
        options = options.password(password);
    }

    Ok(options)
}

async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close PostgreSQL connection: {}", e);
    }
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        warn!("Failed to roll back transaction: {}", e);
    }
}

async fn select_all(conn: &mut PgConnection) -> Result<Vec<NewsItem>> {
    let rows: Vec<NewsRow> = sqlx::query_as(
        r#"
        SELECT id, title, content FROM news ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(NewsError::backend)?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

async fn insert_item(conn: &mut PgConnection, title: &str, content: &str) -> Result<NewsItem> {
    let mut tx = conn.begin().await.map_err(NewsError::backend)?;

    let inserted: std::result::Result<NewsRow, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO news (title, content)
        VALUES ($1, $2)
        RETURNING id, title, content
        "#,
    )
    .bind(title)
    .bind(content)
    .fetch_one(&mut *tx)
    .await;

    match inserted {
        Ok(row) => {
            tx.commit().await.map_err(NewsError::backend)?;
            debug!("Inserted news item {}", row.id);
            Ok(row.into())
        }
        Err(e) => {
            rollback(tx).await;
            Err(NewsError::backend(e))
        }
    }
}

async fn update_item(conn: &mut PgConnection, id: i64, fields: &NewsUpdate) -> Result<NewsItem> {
    let mut tx = conn.begin().await.map_err(NewsError::backend)?;

    match apply_update(&mut tx, id, fields).await {
        Ok(item) => {
            tx.commit().await.map_err(NewsError::backend)?;
            Ok(item)
        }
        Err(e) => {
            rollback(tx).await;
            Err(e)
        }
    }
}

async fn apply_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    fields: &NewsUpdate,
) -> Result<NewsItem> {
    let current: Option<NewsRow> = sqlx::query_as(
        r#"
        SELECT id, title, content FROM news WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(NewsError::backend)?;

    let mut item: NewsItem = current.ok_or(NewsError::NotFound(id))?.into();
    fields.apply_to(&mut item);

    sqlx::query(
        r#"
        UPDATE news SET title = $1, content = $2 WHERE id = $3
        "#,
    )
    .bind(&item.title)
    .bind(&item.content)
    .bind(id)
    .execute(&mut **tx)
    .await
    .map_err(NewsError::backend)?;

    Ok(item)
}

async fn delete_item(conn: &mut PgConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM news WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(NewsError::backend)?;

    if result.rows_affected() == 0 {
        return Err(NewsError::NotFound(id));
    }

    Ok(())
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct NewsRow {
    id: i64,
    title: String,
    content: String,
}

impl From<NewsRow> for NewsItem {
    fn from(r: NewsRow) -> Self {
        NewsItem {
            id: r.id,
            title: r.title,
            content: r.content,
        }
    }
}
