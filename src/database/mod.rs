use crate::domain::Page;
use anyhow::Result;
use async_trait::async_trait;

pub mod queries;
pub mod sqlite;

pub use queries::SqlQueries;

// a page repository is shared between every in-flight request, so it has to be Send + Sync.
// each call is expected to take its own connection, run one statement and give it back.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Creates the pages table if it is not already there.
    async fn prepare_schema(&self) -> Result<()>;

    /// Every page name, in whatever order the store returns them.
    async fn list_page_names(&self) -> Result<Vec<String>>;
    async fn get_page_by_name(&self, name: &str) -> Result<Option<Page>>;

    // write operations
    async fn create_page(&self, name: &str, content: &str) -> Result<()>;
    async fn save_page(&self, id: i64, content: &str) -> Result<()>;
    async fn delete_page(&self, id: i64) -> Result<()>;
}
