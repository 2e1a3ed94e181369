use crate::database::{PageRepository, SqlQueries};
use crate::domain::Page;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
    queries: SqlQueries,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>, queries: SqlQueries) -> Self {
        Self { pool, queries }
    }

    // every statement runs on a connection taken here. the returned guard goes back to the
    // pool when it is dropped, which covers the `?` exits as well as the happy path.
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .context("Could not open a database connection")
    }
}

#[async_trait]
impl PageRepository for SqliteRepository {
    async fn prepare_schema(&self) -> Result<()> {
        let mut conn = self.acquire().await?;
        sqlx::query(&self.queries.create_pages_table)
            .execute(&mut *conn)
            .await
            .context("Database preparation error")?;

        Ok(())
    }

    async fn list_page_names(&self) -> Result<Vec<String>> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query(&self.queries.all_pages)
            .fetch_all(&mut *conn)
            .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.try_get::<String, _>(0)?);
        }

        Ok(names)
    }

    async fn get_page_by_name(&self, name: &str) -> Result<Option<Page>> {
        let mut conn = self.acquire().await?;
        let row_opt = sqlx::query(&self.queries.get_page)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        // positional read: 0 = id, 1 = content
        match row_opt {
            Some(row) => {
                let id: i64 = row.try_get(0)?;
                let content: Option<String> = row.try_get(1)?;
                Ok(Some(Page {
                    id,
                    name: name.to_string(),
                    content: content.unwrap_or_default(),
                }))
            }
            None => Ok(None),
        }
    }

    async fn create_page(&self, name: &str, content: &str) -> Result<()> {
        let mut conn = self.acquire().await?;
        sqlx::query(&self.queries.create_page)
            .bind(name)
            .bind(content)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn save_page(&self, id: i64, content: &str) -> Result<()> {
        let mut conn = self.acquire().await?;
        sqlx::query(&self.queries.save_page)
            .bind(content)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn delete_page(&self, id: i64) -> Result<()> {
        let mut conn = self.acquire().await?;
        sqlx::query(&self.queries.delete_page)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
