use sqlx::sqlite::SqliteRow;

use vitrine_core::domain::specification::{
    SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
};

use super::{assigned, column, RepositoryError, SpecificationGroupRepository};
use crate::DbPool;

const GROUP_COLUMNS: &str = "id, public_id, name, description";

pub struct SqlSpecificationGroupRepository {
    pool: DbPool,
}

impl SqlSpecificationGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SpecificationGroupRepository for SqlSpecificationGroupRepository {
    async fn list_all(&self) -> Result<Vec<SpecificationGroup>, RepositoryError> {
        let rows =
            sqlx::query(&format!("SELECT {GROUP_COLUMNS} FROM specification_group ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(row_to_group).collect()
    }

    async fn find_by_public_id(
        &self,
        public_id: &SpecificationGroupPublicId,
    ) -> Result<Option<SpecificationGroup>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM specification_group WHERE public_id = ?1"
        ))
        .bind(&public_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_group).transpose()
    }

    async fn create(
        &self,
        group: &SpecificationGroup,
    ) -> Result<SpecificationGroupId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO specification_group (id, public_id, name, description)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(assigned(group.id.0))
        .bind(&group.public_id.0)
        .bind(&group.name)
        .bind(&group.description)
        .execute(&self.pool)
        .await?;
        Ok(SpecificationGroupId(result.last_insert_rowid()))
    }
}

/// Groups are read without their specifications; callers that need them go through
/// `SpecificationRepository::list_by_group`.
fn row_to_group(row: &SqliteRow) -> Result<SpecificationGroup, RepositoryError> {
    Ok(SpecificationGroup::new(
        SpecificationGroupId(column(row, "id")?),
        Some(SpecificationGroupPublicId(column(row, "public_id")?)),
        column::<String>(row, "name")?,
        column::<String>(row, "description")?,
        Vec::new(),
    )?)
}
