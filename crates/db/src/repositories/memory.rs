use std::collections::BTreeMap;

use tokio::sync::RwLock;

use vitrine_core::domain::category::{Category, CategoryId, CategoryPublicId};
use vitrine_core::domain::pagination::{Page, Paginator};
use vitrine_core::domain::product::{Product, ProductId, ProductPublicId};
use vitrine_core::domain::specification::{
    Specification, SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
    SpecificationId, SpecificationPublicId,
};
use vitrine_core::domain::specification_value::{ProductSpecificationValue, SpecificationValueId};

use super::{
    CategoryRepository, ProductRepository, ProductSpecificationValueRepository, RepositoryError,
    SpecificationGroupRepository, SpecificationRepository,
};

#[derive(Default)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    groups: BTreeMap<i64, SpecificationGroup>,
    specifications: BTreeMap<i64, Specification>,
    products: BTreeMap<i64, Product>,
    values: BTreeMap<i64, ProductSpecificationValue>,
}

impl CatalogState {
    fn values_for(&self, product_id: ProductId) -> Vec<ProductSpecificationValue> {
        self.values.values().filter(|value| value.product_id == product_id).cloned().collect()
    }

    fn page<'a>(
        &self,
        products: impl Iterator<Item = &'a Product>,
        paginator: Paginator,
    ) -> Page<Product> {
        let matching: Vec<&Product> = products.collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(paginator.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(paginator.limit).unwrap_or(0))
            .map(|product| Product { specification_values: Vec::new(), ..product.clone() })
            .collect();
        Page { items, total }
    }
}

fn next_id<T>(rows: &BTreeMap<i64, T>, requested: i64) -> i64 {
    if requested > 0 {
        requested
    } else {
        rows.keys().next_back().copied().unwrap_or(0) + 1
    }
}

/// One process-local catalog implementing every repository trait.
///
/// Ids are allocated like autoincrement rowids and value sets are attached on single-product
/// reads, matching the SQL repositories.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

#[async_trait::async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn find_by_public_id(
        &self,
        public_id: &CategoryPublicId,
    ) -> Result<Option<Category>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|category| &category.public_id == public_id).cloned())
    }

    async fn create(&self, category: &Category) -> Result<CategoryId, RepositoryError> {
        let mut state = self.state.write().await;
        let id = next_id(&state.categories, category.id.0);
        state.categories.insert(id, Category { id: CategoryId(id), ..category.clone() });
        Ok(CategoryId(id))
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create(&self, product: &Product) -> Result<ProductId, RepositoryError> {
        let mut state = self.state.write().await;
        let id = ProductId(next_id(&state.products, product.id.0));
        for value in &product.specification_values {
            let value_id = next_id(&state.values, value.id.0);
            state.values.insert(
                value_id,
                ProductSpecificationValue {
                    id: SpecificationValueId(value_id),
                    product_id: id,
                    ..value.clone()
                },
            );
        }
        state
            .products
            .insert(id.0, Product { id, specification_values: Vec::new(), ..product.clone() });
        Ok(id)
    }

    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.products.get_mut(&product.id.0) {
            *stored = Product { specification_values: Vec::new(), ..product.clone() };
        }
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.products.remove(&id.0);
        state.values.retain(|_, value| value.product_id != *id);
        Ok(())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<&ProductPublicId>,
    ) -> Result<bool, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .any(|product| product.name == name && Some(&product.public_id) != excluding))
    }

    async fn list(&self, paginator: Paginator) -> Result<Page<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.page(state.products.values(), paginator))
    }

    async fn list_by_category(
        &self,
        category_id: &CategoryId,
        paginator: Paginator,
    ) -> Result<Page<Product>, RepositoryError> {
        let state = self.state.read().await;
        let products =
            state.products.values().filter(|product| product.category_id == *category_id);
        Ok(state.page(products, paginator))
    }

    async fn find_by_public_id(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.products.values().find(|product| &product.public_id == public_id).map(
            |product| Product {
                specification_values: state.values_for(product.id),
                ..product.clone()
            },
        ))
    }

    async fn find_with_specification_groups(
        &self,
        public_id: &ProductPublicId,
    ) -> Result<Option<(Product, Vec<SpecificationGroup>)>, RepositoryError> {
        let Some(product) = ProductRepository::find_by_public_id(self, public_id).await? else {
            return Ok(None);
        };

        let state = self.state.read().await;
        let mut groups: BTreeMap<i64, SpecificationGroup> = BTreeMap::new();
        let mut specifications: Vec<&Specification> = product
            .specification_values
            .iter()
            .filter_map(|value| state.specifications.get(&value.specification_id.0))
            .collect();
        specifications.sort_by_key(|specification| specification.id);

        for specification in specifications {
            let Some(group) = state.groups.get(&specification.group_id.0) else {
                continue;
            };
            groups
                .entry(group.id.0)
                .or_insert_with(|| SpecificationGroup { specifications: Vec::new(), ..group.clone() })
                .specifications
                .push(specification.clone());
        }

        Ok(Some((product, groups.into_values().collect())))
    }
}

#[async_trait::async_trait]
impl SpecificationRepository for InMemoryCatalog {
    async fn find_by_id(
        &self,
        id: &SpecificationId,
    ) -> Result<Option<Specification>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.specifications.get(&id.0).cloned())
    }

    async fn find_by_public_id(
        &self,
        public_id: &SpecificationPublicId,
    ) -> Result<Option<Specification>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.specifications.values().find(|spec| &spec.public_id == public_id).cloned())
    }

    async fn list_by_group(
        &self,
        group_id: &SpecificationGroupId,
    ) -> Result<Vec<Specification>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.specifications.values().filter(|spec| spec.group_id == *group_id).cloned().collect())
    }

    async fn create(
        &self,
        specification: &Specification,
    ) -> Result<SpecificationId, RepositoryError> {
        let mut state = self.state.write().await;
        let id = next_id(&state.specifications, specification.id.0);
        state
            .specifications
            .insert(id, Specification { id: SpecificationId(id), ..specification.clone() });
        Ok(SpecificationId(id))
    }
}

#[async_trait::async_trait]
impl SpecificationGroupRepository for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<SpecificationGroup>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.groups.values().cloned().collect())
    }

    async fn find_by_public_id(
        &self,
        public_id: &SpecificationGroupPublicId,
    ) -> Result<Option<SpecificationGroup>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.groups.values().find(|group| &group.public_id == public_id).cloned())
    }

    async fn create(
        &self,
        group: &SpecificationGroup,
    ) -> Result<SpecificationGroupId, RepositoryError> {
        let mut state = self.state.write().await;
        let id = next_id(&state.groups, group.id.0);
        state.groups.insert(
            id,
            SpecificationGroup {
                id: SpecificationGroupId(id),
                specifications: Vec::new(),
                ..group.clone()
            },
        );
        Ok(SpecificationGroupId(id))
    }
}

#[async_trait::async_trait]
impl ProductSpecificationValueRepository for InMemoryCatalog {
    async fn create(
        &self,
        value: &ProductSpecificationValue,
    ) -> Result<SpecificationValueId, RepositoryError> {
        let mut state = self.state.write().await;
        let id = next_id(&state.values, value.id.0);
        state.values.insert(id, ProductSpecificationValue { id: SpecificationValueId(id), ..value.clone() });
        Ok(SpecificationValueId(id))
    }
}
