use sqlx::sqlite::SqliteRow;

use vitrine_core::domain::specification::{
    Specification, SpecificationGroupId, SpecificationId, SpecificationPublicId,
    SpecificationType,
};

use super::{assigned, column, RepositoryError, SpecificationRepository};
use crate::DbPool;

const SPECIFICATION_COLUMNS: &str = "id, public_id, specification_group_id, title, type";

pub struct SqlSpecificationRepository {
    pool: DbPool,
}

impl SqlSpecificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SpecificationRepository for SqlSpecificationRepository {
    async fn find_by_id(
        &self,
        id: &SpecificationId,
    ) -> Result<Option<Specification>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SPECIFICATION_COLUMNS} FROM specification WHERE id = ?1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_specification).transpose()
    }

    async fn find_by_public_id(
        &self,
        public_id: &SpecificationPublicId,
    ) -> Result<Option<Specification>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SPECIFICATION_COLUMNS} FROM specification WHERE public_id = ?1"
        ))
        .bind(&public_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_specification).transpose()
    }

    async fn list_by_group(
        &self,
        group_id: &SpecificationGroupId,
    ) -> Result<Vec<Specification>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SPECIFICATION_COLUMNS} FROM specification
             WHERE specification_group_id = ?1
             ORDER BY id"
        ))
        .bind(group_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_specification).collect()
    }

    async fn create(
        &self,
        specification: &Specification,
    ) -> Result<SpecificationId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO specification (id, public_id, specification_group_id, title, type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(assigned(specification.id.0))
        .bind(&specification.public_id.0)
        .bind(specification.group_id.0)
        .bind(&specification.title)
        .bind(specification.spec_type.as_str())
        .execute(&self.pool)
        .await?;
        Ok(SpecificationId(result.last_insert_rowid()))
    }
}

pub(crate) fn row_to_specification(row: &SqliteRow) -> Result<Specification, RepositoryError> {
    let spec_type = column::<String>(row, "type")?
        .parse::<SpecificationType>()
        .map_err(|error| RepositoryError::Decode(format!("type: {error}")))?;

    Ok(Specification::new(
        SpecificationId(column(row, "id")?),
        Some(SpecificationPublicId(column(row, "public_id")?)),
        SpecificationGroupId(column(row, "specification_group_id")?),
        column::<String>(row, "title")?,
        spec_type,
    )?)
}
