use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::Row;
use thiserror::Error;

use vitrine_core::domain::category::{Category, CategoryId, CategoryPublicId};
use vitrine_core::domain::pagination::{Page, Paginator};
use vitrine_core::domain::product::{Product, ProductId, ProductPublicId};
use vitrine_core::domain::specification::{
    Specification, SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
    SpecificationId, SpecificationPublicId,
};
use vitrine_core::domain::specification_value::{ProductSpecificationValue, SpecificationValueId};
use vitrine_core::errors::{ApplicationError, DomainError};

pub mod category;
pub mod memory;
pub mod product;
pub mod specification;
pub mod specification_group;
pub mod specification_value;

pub use category::SqlCategoryRepository;
pub use memory::InMemoryCatalog;
pub use product::SqlProductRepository;
pub use specification::SqlSpecificationRepository;
pub use specification_group::SqlSpecificationGroupRepository;
pub use specification_value::SqlProductSpecificationValueRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("stored row is invalid: {0}")]
    Domain(#[from] DomainError),
}

impl RepositoryError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(error)) => error.is_unique_violation(),
            _ => false,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(error)) => error.is_foreign_key_violation(),
            _ => false,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Domain(error) => {
                Self::Persistence(format!("stored catalog row is invalid: {error}"))
            }
            other => Self::Persistence(other.to_string()),
        }
    }
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn find_by_public_id(
        &self,
        public_id: &CategoryPublicId,
    ) -> Result<Option<Category>, RepositoryError>;
    async fn create(&self, category: &Category) -> Result<CategoryId, RepositoryError>;
}

/// Products are returned with their specification values only from the single-product lookups;
/// list operations return summaries with an empty value set.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<ProductId, RepositoryError>;
    async fn update(&self, product: &Product) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError>;
    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<&ProductPublicId>,
    ) -> Result<bool, RepositoryError>;
    async fn list(&self, paginator: Paginator) -> Result<Page<Product>, RepositoryError>;
    async fn list_by_category(
        &self,
        category_id: &CategoryId,
        paginator: Paginator,
    ) -> Result<Page<Product>, RepositoryError>;
    async fn find_by_public_id(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<Product>, RepositoryError>;
    /// The product plus the groups holding the specifications it has values for. Groups only carry
    /// those specifications.
    async fn find_with_specification_groups(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<(Product, Vec<SpecificationGroup>)>, RepositoryError>;
}

#[async_trait]
pub trait SpecificationRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: &SpecificationId,
    ) -> Result<Option<Specification>, RepositoryError>;
    async fn find_by_public_id(
        &self,
        public_id: &SpecificationPublicId,
    ) -> Result<Option<Specification>, RepositoryError>;
    async fn list_by_group(
        &self,
        group_id: &SpecificationGroupId,
    ) -> Result<Vec<Specification>, RepositoryError>;
    async fn create(&self, specification: &Specification)
        -> Result<SpecificationId, RepositoryError>;
}

#[async_trait]
pub trait SpecificationGroupRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<SpecificationGroup>, RepositoryError>;
    async fn find_by_public_id(
        &self,
        public_id: &SpecificationGroupPublicId,
    ) -> Result<Option<SpecificationGroup>, RepositoryError>;
    async fn create(
        &self,
        group: &SpecificationGroup,
    ) -> Result<SpecificationGroupId, RepositoryError>;
}

#[async_trait]
pub trait ProductSpecificationValueRepository: Send + Sync {
    async fn create(
        &self,
        value: &ProductSpecificationValue,
    ) -> Result<SpecificationValueId, RepositoryError>;
}

pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name).map_err(|error| RepositoryError::Decode(format!("{name}: {error}")))
}

/// Zero ids are unassigned; binding NULL lets SQLite allocate the rowid.
pub(crate) fn assigned(id: i64) -> Option<i64> {
    (id > 0).then_some(id)
}
