use sqlx::Executor;

use vitrine_core::comparison::SpecificationKind;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const DEMO_CATEGORY_IDS: &[i64] = &[1, 2, 3];
const DEMO_GROUP_IDS: &[i64] = &[1, 2, 3, 4, 5];
/// The sixteen comparable kinds plus one free-text specification.
const DEMO_SPECIFICATION_COUNT: i64 = 17;

/// Products the demo pairs up for comparison: (left, right, label).
const DEMO_PAIRS: &[DemoPair] = &[
    DemoPair { left: "f1000001", right: "f1000002", label: "refrigerators" },
    DemoPair { left: "f2000001", right: "f2000002", label: "processors" },
    DemoPair { left: "f3000001", right: "f3000002", label: "speakers" },
];

const DEMO_VALUE_COUNT: i64 = 23;

/// Demo catalog: categories, specification groups, the sixteen comparable specifications and
/// three comparable product pairs.
pub struct DemoCatalog;

impl DemoCatalog {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_catalog.sql");

    /// Loads the demo catalog. Rows use fixed ids so loading twice is a no-op.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let products: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM product").fetch_one(pool).await?;
        Ok(SeedResult {
            pairs_seeded: DEMO_PAIRS
                .iter()
                .map(|pair| PairSeedInfo { label: pair.label, left: pair.left, right: pair.right })
                .collect(),
            products_in_catalog: products,
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let categories: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM category WHERE id IN {}",
            sql_array_from_ids(DEMO_CATEGORY_IDS)
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("categories", categories == DEMO_CATEGORY_IDS.len() as i64));

        let groups: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM specification_group WHERE id IN {}",
            sql_array_from_ids(DEMO_GROUP_IDS)
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("specification-groups", groups == DEMO_GROUP_IDS.len() as i64));

        checks.push(("specification-kinds", Self::verify_specification_kinds(pool).await?));

        let specifications: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM specification WHERE id <= ?1",
        )
        .bind(DEMO_SPECIFICATION_COUNT)
        .fetch_one(pool)
        .await?;
        checks.push(("specifications", specifications == DEMO_SPECIFICATION_COUNT));

        for pair in DEMO_PAIRS {
            let same_category: i64 = sqlx::query_scalar(
                "SELECT EXISTS(
                    SELECT 1 FROM product l JOIN product r ON l.category_id = r.category_id
                    WHERE l.public_id = ?1 AND r.public_id = ?2
                 )",
            )
            .bind(pair.left)
            .bind(pair.right)
            .fetch_one(pool)
            .await?;
            checks.push((pair.label, same_category == 1));
        }

        let values: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM product_specification_value WHERE id <= ?1",
        )
        .bind(DEMO_VALUE_COUNT)
        .fetch_one(pool)
        .await?;
        checks.push(("specification-values", values == DEMO_VALUE_COUNT));

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }

    /// Every comparable kind must be stored under its strategy id with its declared type.
    async fn verify_specification_kinds(pool: &DbPool) -> Result<bool, RepositoryError> {
        for kind in SpecificationKind::ALL {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM specification WHERE id = ?1 AND title = ?2 AND type = ?3)",
            )
            .bind(kind.id().0)
            .bind(kind.title())
            .bind(kind.value_type().as_str())
            .fetch_one(pool)
            .await?;
            if matches != 1 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Removes the demo rows, products first so foreign keys stay satisfied.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let product_ids = DEMO_PAIRS
            .iter()
            .flat_map(|pair| [pair.left, pair.right])
            .map(|public_id| format!("'{public_id}'"))
            .collect::<Vec<_>>()
            .join(",");
        sqlx::query(&format!("DELETE FROM product WHERE public_id IN ({product_ids})"))
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM specification WHERE id <= ?1")
            .bind(DEMO_SPECIFICATION_COUNT)
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "DELETE FROM specification_group WHERE id IN {}",
            sql_array_from_ids(DEMO_GROUP_IDS)
        ))
        .execute(&mut *tx)
        .await?;
        sqlx::query(&format!(
            "DELETE FROM category WHERE id IN {}",
            sql_array_from_ids(DEMO_CATEGORY_IDS)
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub fn pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
        DEMO_PAIRS.iter().map(|pair| (pair.left, pair.right))
    }
}

#[derive(Debug, Clone, Copy)]
struct DemoPair {
    left: &'static str,
    right: &'static str,
    label: &'static str,
}

fn sql_array_from_ids(ids: &[i64]) -> String {
    let joined = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    format!("({joined})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub pairs_seeded: Vec<PairSeedInfo>,
    pub products_in_catalog: i64,
}

#[derive(Debug)]
pub struct PairSeedInfo {
    pub label: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use vitrine_core::comparison::{ComparisonEngine, ProductComparator};
    use vitrine_core::domain::product::ProductPublicId;

    use super::*;
    use crate::repositories::{ProductRepository, SqlProductRepository};
    use crate::{connect_with_settings, migrations};

    async fn migrated_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30, 5_000)
            .await
            .expect("connect to test database");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    #[test]
    fn sql_fixture_is_valid() {
        assert!(!DemoCatalog::SQL.is_empty());
        assert!(DemoCatalog::SQL.contains("INSERT OR IGNORE"));
    }

    #[tokio::test]
    async fn load_is_idempotent_and_verifies() {
        let pool = migrated_pool().await;

        let first = DemoCatalog::load(&pool).await.expect("load demo catalog");
        let first_verification = DemoCatalog::verify(&pool).await.expect("verify demo catalog");
        assert!(first_verification.all_present, "{:?}", first_verification.checks);
        assert_eq!(first.pairs_seeded.len(), 3);

        let second = DemoCatalog::load(&pool).await.expect("reload demo catalog");
        let second_verification = DemoCatalog::verify(&pool).await.expect("re-verify");
        assert!(second_verification.all_present);
        assert_eq!(first.products_in_catalog, second.products_in_catalog);
        assert_eq!(first_verification.checks, second_verification.checks);
    }

    #[tokio::test]
    async fn every_demo_pair_compares_cleanly() {
        let pool = migrated_pool().await;
        DemoCatalog::load(&pool).await.expect("load demo catalog");
        let products = SqlProductRepository::new(pool);
        let engine = ComparisonEngine::default();

        for (left, right) in DemoCatalog::pairs() {
            let left = products
                .find_by_public_id(&ProductPublicId(left.into()))
                .await
                .expect("query")
                .expect("left product");
            let right = products
                .find_by_public_id(&ProductPublicId(right.into()))
                .await
                .expect("query")
                .expect("right product");

            let comparison = engine.compare(&left, &right).expect("demo pair is comparable");
            assert!(!comparison.specifications.is_empty());
        }
    }

    #[tokio::test]
    async fn clean_removes_demo_rows() {
        let pool = migrated_pool().await;
        DemoCatalog::load(&pool).await.expect("load demo catalog");

        DemoCatalog::clean(&pool).await.expect("clean demo catalog");

        let verification = DemoCatalog::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM product")
            .fetch_one(&pool)
            .await
            .expect("count products");
        assert_eq!(remaining, 0);
    }
}
