use sqlx::sqlite::SqliteRow;

use vitrine_core::domain::category::{Category, CategoryId, CategoryPublicId};

use super::{assigned, column, CategoryRepository, RepositoryError};
use crate::DbPool;

const CATEGORY_COLUMNS: &str = "id, public_id, name, description";

pub struct SqlCategoryRepository {
    pool: DbPool,
}

impl SqlCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CategoryRepository for SqlCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {CATEGORY_COLUMNS} FROM category ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_category).collect()
    }

    async fn find_by_public_id(
        &self,
        public_id: &CategoryPublicId,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE public_id = ?1"
        ))
        .bind(&public_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn create(&self, category: &Category) -> Result<CategoryId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO category (id, public_id, name, description) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(assigned(category.id.0))
        .bind(&category.public_id.0)
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;
        Ok(CategoryId(result.last_insert_rowid()))
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category, RepositoryError> {
    Ok(Category::new(
        CategoryId(column(row, "id")?),
        Some(CategoryPublicId(column(row, "public_id")?)),
        column::<String>(row, "name")?,
        column::<String>(row, "description")?,
    )?)
}
