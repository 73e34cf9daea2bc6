use sqlx::sqlite::{Sqlite, SqliteRow};

use vitrine_core::domain::product::ProductId;
use vitrine_core::domain::specification::SpecificationId;
use vitrine_core::domain::specification_value::{
    ProductSpecificationValue, SpecValue, SpecificationValueId,
};

use super::{assigned, column, ProductSpecificationValueRepository, RepositoryError};
use crate::DbPool;

pub(crate) const VALUE_COLUMNS: &str =
    "id, product_id, specification_id, string_value, int_value, bool_value";

pub struct SqlProductSpecificationValueRepository {
    pool: DbPool,
}

impl SqlProductSpecificationValueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductSpecificationValueRepository for SqlProductSpecificationValueRepository {
    async fn create(
        &self,
        value: &ProductSpecificationValue,
    ) -> Result<SpecificationValueId, RepositoryError> {
        insert_value(&self.pool, value).await
    }
}

pub(crate) async fn insert_value<'e, E>(
    executor: E,
    value: &ProductSpecificationValue,
) -> Result<SpecificationValueId, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO product_specification_value
            (id, product_id, specification_id, string_value, int_value, bool_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(assigned(value.id.0))
    .bind(value.product_id.0)
    .bind(value.specification_id.0)
    .bind(value.value.as_str())
    .bind(value.value.as_int())
    .bind(value.value.as_bool())
    .execute(executor)
    .await?;
    Ok(SpecificationValueId(result.last_insert_rowid()))
}

pub(crate) fn row_to_value(row: &SqliteRow) -> Result<ProductSpecificationValue, RepositoryError> {
    let value = SpecValue::from_slots(
        column(row, "string_value")?,
        column(row, "int_value")?,
        column(row, "bool_value")?,
    )?;
    Ok(ProductSpecificationValue::new(
        SpecificationValueId(column(row, "id")?),
        ProductId(column(row, "product_id")?),
        SpecificationId(column(row, "specification_id")?),
        value,
    )?)
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use vitrine_core::domain::product::ProductId;
    use vitrine_core::domain::specification::SpecificationId;
    use vitrine_core::domain::specification_value::{
        ProductSpecificationValue, SpecValue, SpecificationValueId,
    };

    use super::{row_to_value, SqlProductSpecificationValueRepository, VALUE_COLUMNS};
    use crate::repositories::test_support::{migrated_pool, seed_reference_rows};
    use crate::repositories::ProductSpecificationValueRepository;
    use crate::DbPool;

    async fn pool_with_product() -> DbPool {
        let pool = migrated_pool().await;
        seed_reference_rows(&pool).await;
        sqlx::query(
            "INSERT INTO product (id, public_id, category_id, name, price)
             VALUES (7, '77777777', 2, 'WaveBox Go', 49900)",
        )
        .execute(&pool)
        .await
        .expect("insert product");
        pool
    }

    fn waterproof(value: bool) -> ProductSpecificationValue {
        ProductSpecificationValue::new(
            SpecificationValueId(0),
            ProductId(7),
            SpecificationId(9),
            SpecValue::Bool(value),
        )
        .expect("valid value")
    }

    #[tokio::test]
    async fn create_stores_only_the_populated_slot() {
        let pool = pool_with_product().await;
        let repo = SqlProductSpecificationValueRepository::new(pool.clone());

        let id = repo.create(&waterproof(true)).await.expect("create");

        let row = sqlx::query(
            "SELECT string_value, int_value, bool_value FROM product_specification_value
             WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_one(&pool)
        .await
        .expect("row");
        assert!(row.get::<Option<String>, _>("string_value").is_none());
        assert!(row.get::<Option<i64>, _>("int_value").is_none());
        assert_eq!(row.get::<Option<i64>, _>("bool_value"), Some(1));
    }

    #[tokio::test]
    async fn second_value_for_same_specification_is_rejected() {
        let repo = SqlProductSpecificationValueRepository::new(pool_with_product().await);

        repo.create(&waterproof(true)).await.expect("first value");
        let error = repo.create(&waterproof(false)).await.expect_err("duplicate");
        assert!(error.is_unique_violation());
    }

    #[tokio::test]
    async fn rows_with_two_slots_fail_to_decode() {
        let pool = pool_with_product().await;
        sqlx::query(
            "INSERT INTO product_specification_value
                (id, product_id, specification_id, string_value, int_value)
             VALUES (1, 7, 17, 'red', 3)",
        )
        .execute(&pool)
        .await
        .expect("insert corrupt row");

        let row = sqlx::query(&format!(
            "SELECT {VALUE_COLUMNS} FROM product_specification_value WHERE id = 1"
        ))
        .fetch_one(&pool)
        .await
        .expect("row");
        let error = row_to_value(&row).expect_err("two slots");
        assert!(error.to_string().contains("only one value"));
    }
}
