use sqlx::sqlite::SqliteRow;

use vitrine_core::domain::category::CategoryId;
use vitrine_core::domain::pagination::{Page, Paginator};
use vitrine_core::domain::product::{NewProduct, Product, ProductId, ProductPublicId};
use vitrine_core::domain::specification::{
    SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
};
use vitrine_core::domain::specification_value::ProductSpecificationValue;

use super::specification::row_to_specification;
use super::specification_value::{insert_value, row_to_value, VALUE_COLUMNS};
use super::{assigned, column, ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str =
    "id, public_id, category_id, name, description, price, rating, image_url";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_values(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductSpecificationValue>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {VALUE_COLUMNS} FROM product_specification_value
             WHERE product_id = ?1
             ORDER BY id"
        ))
        .bind(product_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_value).collect()
    }

    async fn page(
        &self,
        category_id: Option<CategoryId>,
        paginator: Paginator,
    ) -> Result<Page<Product>, RepositoryError> {
        let category_id = category_id.map(|id| id.0);
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE (?3 IS NULL OR category_id = ?3)
             ORDER BY id
             LIMIT ?1 OFFSET ?2"
        ))
        .bind(paginator.limit)
        .bind(paginator.skip)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        let items = rows
            .iter()
            .map(|row| row_to_product(row, Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM product WHERE (?1 IS NULL OR category_id = ?1)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page { items, total })
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn create(&self, product: &Product) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO product
                (id, public_id, category_id, name, description, price, rating, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(assigned(product.id.0))
        .bind(&product.public_id.0)
        .bind(product.category_id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.rating)
        .bind(&product.image_url)
        .execute(&mut *tx)
        .await?;
        let id = ProductId(result.last_insert_rowid());

        for value in &product.specification_values {
            let mut value = value.clone();
            value.product_id = id;
            insert_value(&mut *tx, &value).await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE product
             SET category_id = ?2, name = ?3, description = ?4, price = ?5, rating = ?6,
                 image_url = ?7, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?1",
        )
        .bind(product.id.0)
        .bind(product.category_id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.rating)
        .bind(&product.image_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM product WHERE id = ?1").bind(id.0).execute(&self.pool).await?;
        Ok(())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<&ProductPublicId>,
    ) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM product WHERE name = ?1 AND (?2 IS NULL OR public_id <> ?2)
             )",
        )
        .bind(name)
        .bind(excluding.map(|public_id| public_id.0.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists == 1)
    }

    async fn list(&self, paginator: Paginator) -> Result<Page<Product>, RepositoryError> {
        self.page(None, paginator).await
    }

    async fn list_by_category(
        &self,
        category_id: &CategoryId,
        paginator: Paginator,
    ) -> Result<Page<Product>, RepositoryError> {
        self.page(Some(*category_id), paginator).await
    }

    async fn find_by_public_id(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE public_id = ?1"))
            .bind(&public_id.0)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let id = ProductId(column(&row, "id")?);
        let values = self.load_values(id).await?;
        row_to_product(&row, values).map(Some)
    }

    async fn find_with_specification_groups(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<(Product, Vec<SpecificationGroup>)>, RepositoryError> {
        let Some(product) = self.find_by_public_id(public_id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT g.id AS group_id, g.public_id AS group_public_id, g.name AS group_name,
                    g.description AS group_description,
                    s.id, s.public_id, s.specification_group_id, s.title, s.type
             FROM product_specification_value v
             JOIN specification s ON s.id = v.specification_id
             JOIN specification_group g ON g.id = s.specification_group_id
             WHERE v.product_id = ?1
             ORDER BY g.id, s.id",
        )
        .bind(product.id.0)
        .fetch_all(&self.pool)
        .await?;

        let mut groups: Vec<SpecificationGroup> = Vec::new();
        for row in &rows {
            let group_id = SpecificationGroupId(column(row, "group_id")?);
            let specification = row_to_specification(row)?;
            match groups.last_mut() {
                Some(group) if group.id == group_id => group.specifications.push(specification),
                _ => groups.push(SpecificationGroup::new(
                    group_id,
                    Some(SpecificationGroupPublicId(column(row, "group_public_id")?)),
                    column::<String>(row, "group_name")?,
                    column::<String>(row, "group_description")?,
                    vec![specification],
                )?),
            }
        }

        Ok(Some((product, groups)))
    }
}

fn row_to_product(
    row: &SqliteRow,
    specification_values: Vec<ProductSpecificationValue>,
) -> Result<Product, RepositoryError> {
    Ok(Product::new(NewProduct {
        id: Some(ProductId(column(row, "id")?)),
        public_id: Some(ProductPublicId(column(row, "public_id")?)),
        category_id: CategoryId(column(row, "category_id")?),
        name: column(row, "name")?,
        description: column(row, "description")?,
        price: column(row, "price")?,
        rating: column(row, "rating")?,
        image_url: column(row, "image_url")?,
        specification_values,
    })?)
}

#[cfg(test)]
mod tests {
    use vitrine_core::domain::category::CategoryId;
    use vitrine_core::domain::pagination::Paginator;
    use vitrine_core::domain::product::{NewProduct, Product, ProductId, ProductPublicId};
    use vitrine_core::domain::specification::SpecificationId;
    use vitrine_core::domain::specification_value::{
        ProductSpecificationValue, SpecValue, SpecificationValueId,
    };

    use super::SqlProductRepository;
    use crate::repositories::test_support::{migrated_pool, seed_reference_rows};
    use crate::repositories::ProductRepository;

    fn fridge(public_id: &str, name: &str, price: i64) -> Product {
        Product::new(NewProduct {
            public_id: Some(ProductPublicId(public_id.into())),
            category_id: CategoryId(1),
            name: name.into(),
            description: "Frost free".into(),
            price,
            rating: 40,
            ..NewProduct::default()
        })
        .expect("valid product")
    }

    fn value(spec: i64, value: SpecValue) -> ProductSpecificationValue {
        ProductSpecificationValue {
            id: SpecificationValueId(0),
            product_id: ProductId::UNASSIGNED,
            specification_id: SpecificationId(spec),
            value,
        }
    }

    async fn repository() -> SqlProductRepository {
        let pool = migrated_pool().await;
        seed_reference_rows(&pool).await;
        SqlProductRepository::new(pool)
    }

    #[tokio::test]
    async fn create_persists_product_with_values() {
        let repo = repository().await;
        let mut product = fridge("a1a1a1a1", "FrostLine 400", 459_900);
        product.specification_values = vec![
            value(1, SpecValue::Int(150)),
            value(9, SpecValue::Bool(true)),
            value(17, SpecValue::String("Silver".into())),
        ];

        let id = repo.create(&product).await.expect("create");

        let stored = repo
            .find_by_public_id(&ProductPublicId("a1a1a1a1".into()))
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(stored.id, id);
        assert_eq!(stored.price, 459_900);
        assert_eq!(stored.specification_values.len(), 3);
        assert!(stored.specification_values.iter().all(|value| value.product_id == id));
        assert!(stored.specification_values.iter().all(|value| value.id.0 > 0));
        let slots: Vec<SpecValue> =
            stored.specification_values.iter().map(|value| value.value.clone()).collect();
        assert_eq!(
            slots,
            vec![SpecValue::Int(150), SpecValue::Bool(true), SpecValue::String("Silver".into())]
        );
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields() {
        let repo = repository().await;
        let id = repo.create(&fridge("a1a1a1a1", "FrostLine 400", 459_900)).await.expect("create");

        let mut product = repo
            .find_by_public_id(&ProductPublicId("a1a1a1a1".into()))
            .await
            .expect("query")
            .expect("exists");
        product.name = "FrostLine 450".into();
        product.category_id = CategoryId(2);
        product.rating = 47;
        repo.update(&product).await.expect("update");

        let stored = repo
            .find_by_public_id(&ProductPublicId("a1a1a1a1".into()))
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(stored.id, id);
        assert_eq!(stored.name, "FrostLine 450");
        assert_eq!(stored.category_id, CategoryId(2));
        assert_eq!(stored.rating, 47);
    }

    #[tokio::test]
    async fn delete_removes_product() {
        let repo = repository().await;
        let id = repo.create(&fridge("a1a1a1a1", "FrostLine 400", 1)).await.expect("create");

        repo.delete(&id).await.expect("delete");

        let found = repo.find_by_public_id(&ProductPublicId("a1a1a1a1".into())).await.expect("query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn exists_by_name_can_exclude_the_product_itself() {
        let repo = repository().await;
        repo.create(&fridge("a1a1a1a1", "FrostLine 400", 1)).await.expect("create");

        assert!(repo.exists_by_name("FrostLine 400", None).await.expect("query"));
        assert!(!repo.exists_by_name("FrostLine 300", None).await.expect("query"));

        let itself = ProductPublicId("a1a1a1a1".into());
        assert!(!repo.exists_by_name("FrostLine 400", Some(&itself)).await.expect("query"));
        let other = ProductPublicId("b2b2b2b2".into());
        assert!(repo.exists_by_name("FrostLine 400", Some(&other)).await.expect("query"));
    }

    #[tokio::test]
    async fn list_paginates_and_reports_total() {
        let repo = repository().await;
        for index in 0..5 {
            let product = fridge(&format!("0000000{index}"), &format!("Fridge {index}"), 100);
            repo.create(&product).await.expect("create");
        }

        let page = repo.list(Paginator::new(2, 2).expect("paginator")).await.expect("list");
        assert_eq!(page.total, 5);
        let names: Vec<&str> = page.items.iter().map(|product| product.name.as_str()).collect();
        assert_eq!(names, vec!["Fridge 2", "Fridge 3"]);
    }

    #[tokio::test]
    async fn list_by_category_filters_items_and_total() {
        let repo = repository().await;
        repo.create(&fridge("00000001", "Fridge", 100)).await.expect("create");
        let mut speaker = fridge("00000002", "Speaker", 100);
        speaker.category_id = CategoryId(2);
        repo.create(&speaker).await.expect("create");

        let page = repo
            .list_by_category(&CategoryId(2), Paginator::default())
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Speaker");
    }

    #[tokio::test]
    async fn specification_groups_only_include_valued_specifications() {
        let repo = repository().await;
        let mut product = fridge("a1a1a1a1", "FrostLine 400", 1);
        product.specification_values =
            vec![value(1, SpecValue::Int(150)), value(9, SpecValue::Bool(false))];
        repo.create(&product).await.expect("create");

        let (loaded, groups) = repo
            .find_with_specification_groups(&ProductPublicId("a1a1a1a1".into()))
            .await
            .expect("query")
            .expect("exists");

        assert_eq!(loaded.specification_values.len(), 2);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Electrical");
        assert_eq!(groups[0].specifications.len(), 1);
        assert_eq!(groups[1].name, "Features");
        let titles: Vec<&str> =
            groups[1].specifications.iter().map(|spec| spec.title.as_str()).collect();
        assert_eq!(titles, vec!["Waterproof"]);
    }

    #[tokio::test]
    async fn missing_product_has_no_specification_groups() {
        let repo = repository().await;
        let found = repo
            .find_with_specification_groups(&ProductPublicId("ffffffff".into()))
            .await
            .expect("query");
        assert!(found.is_none());
    }
}
