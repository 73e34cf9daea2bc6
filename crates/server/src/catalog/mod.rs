//! Catalog use cases: the operations the HTTP API exposes, composed from repositories and the
//! comparison engine.

pub mod dto;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use vitrine_core::comparison::{ComparisonEngine, ProductComparator};
use vitrine_core::domain::category::CategoryPublicId;
use vitrine_core::domain::pagination::{Page, Paginator};
use vitrine_core::domain::product::{NewProduct, Product, ProductPublicId, ProductUpdate};
use vitrine_core::domain::specification::{
    SpecificationGroupPublicId, SpecificationId, SpecificationPublicId, SpecificationType,
};
use vitrine_core::domain::specification_value::{
    ProductSpecificationValue, SpecValue, SpecificationValueId,
};
use vitrine_core::errors::ApplicationError;
use vitrine_db::repositories::{
    CategoryRepository, InMemoryCatalog, ProductRepository, ProductSpecificationValueRepository,
    RepositoryError, SpecificationGroupRepository, SpecificationRepository,
    SqlCategoryRepository, SqlProductRepository, SqlProductSpecificationValueRepository,
    SqlSpecificationGroupRepository, SqlSpecificationRepository,
};
use vitrine_db::DbPool;

use self::dto::{
    insights, CategoriesResponse, CategoryDto, ComparisonResponse, CompareProductsRequest,
    CreateProductRequest, CreateSpecificationValueRequest, CreatedProductResponse,
    CreatedResponse, DeletedResponse, MetricComparisonDto, PaginationQuery, PaginatorDto,
    ProductSummaryDto, ProductWithSpecificationsResponse, ProductsPageResponse, SpecValueDto,
    SpecificationComparisonDto, SpecificationDto, SpecificationGroupDto,
    SpecificationGroupsResponse, SpecificationsResponse, UpdateProductRequest, UpdatedResponse,
};

const PRODUCT_NOT_FOUND: &str = "Product not found";
const CATEGORY_NOT_FOUND: &str = "Category not found";
const PRODUCT_ALREADY_EXISTS: &str = "Product already exists";

#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    specifications: Arc<dyn SpecificationRepository>,
    groups: Arc<dyn SpecificationGroupRepository>,
    values: Arc<dyn ProductSpecificationValueRepository>,
    comparator: Arc<dyn ProductComparator>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        specifications: Arc<dyn SpecificationRepository>,
        groups: Arc<dyn SpecificationGroupRepository>,
        values: Arc<dyn ProductSpecificationValueRepository>,
        comparator: Arc<dyn ProductComparator>,
    ) -> Self {
        Self { categories, products, specifications, groups, values, comparator }
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            Arc::new(SqlCategoryRepository::new(pool.clone())),
            Arc::new(SqlProductRepository::new(pool.clone())),
            Arc::new(SqlSpecificationRepository::new(pool.clone())),
            Arc::new(SqlSpecificationGroupRepository::new(pool.clone())),
            Arc::new(SqlProductSpecificationValueRepository::new(pool)),
            Arc::new(ComparisonEngine::default()),
        )
    }

    /// Every repository backed by one shared process-local catalog.
    pub fn in_memory(catalog: Arc<InMemoryCatalog>) -> Self {
        Self::new(
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            catalog,
            Arc::new(ComparisonEngine::default()),
        )
    }

    pub async fn list_categories(&self) -> Result<CategoriesResponse, ApplicationError> {
        let categories = self.categories.list_all().await?;
        Ok(CategoriesResponse { categories: categories.iter().map(CategoryDto::from).collect() })
    }

    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<CreatedProductResponse, ApplicationError> {
        let category = self
            .categories
            .find_by_public_id(&CategoryPublicId(request.category_public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound(CATEGORY_NOT_FOUND.to_owned()))?;

        if self.products.exists_by_name(&request.name, None).await? {
            return Err(ApplicationError::Conflict(PRODUCT_ALREADY_EXISTS.to_owned()));
        }

        let product = Product::new(NewProduct {
            category_id: category.id,
            name: request.name,
            description: request.description,
            price: request.price,
            rating: 0,
            image_url: request.image_url,
            ..NewProduct::default()
        })?;

        let id = self
            .products
            .create(&product)
            .await
            .map_err(conflict_on_unique(PRODUCT_ALREADY_EXISTS))?;
        info!(
            event_name = "catalog.product.created",
            product_id = id.0,
            public_id = %product.public_id,
            "product created"
        );

        Ok(CreatedProductResponse { public_id: product.public_id.0 })
    }

    pub async fn compare_products(
        &self,
        request: CompareProductsRequest,
    ) -> Result<ComparisonResponse, ApplicationError> {
        let left = self.require_product(request.left_public_id).await?;
        let right = self.require_product(request.right_public_id).await?;

        let comparison = self.comparator.compare(&left, &right)?;

        let mut declared_types: HashMap<SpecificationId, SpecificationType> = HashMap::new();
        let mut specifications = Vec::with_capacity(comparison.specifications.len());
        for compared in &comparison.specifications {
            let spec_type =
                self.declared_type(&mut declared_types, compared.left.specification_id).await?;
            specifications.push(SpecificationComparisonDto {
                spec_type,
                left: SpecValueDto::for_type(spec_type, &compared.left.value),
                right: SpecValueDto::for_type(spec_type, &compared.right.value),
                insights: insights(&compared.insights),
            });
        }

        info!(
            event_name = "catalog.products.compared",
            left = %left.public_id,
            right = %right.public_id,
            specifications = specifications.len(),
            "products compared"
        );

        Ok(ComparisonResponse {
            price: MetricComparisonDto {
                left: comparison.price.left,
                right: comparison.price.right,
                insights: insights(&comparison.price.insights),
            },
            rating: MetricComparisonDto {
                left: comparison.rating.left,
                right: comparison.rating.right,
                insights: insights(&comparison.rating.insights),
            },
            specifications,
        })
    }

    pub async fn delete_product(
        &self,
        public_id: String,
    ) -> Result<DeletedResponse, ApplicationError> {
        let product = self.require_product(public_id).await?;
        self.products.delete(&product.id).await?;
        info!(
            event_name = "catalog.product.deleted",
            public_id = %product.public_id,
            "product deleted"
        );

        Ok(DeletedResponse { deleted: true, message: "Product deleted successfully".to_owned() })
    }

    pub async fn update_product(
        &self,
        public_id: String,
        request: UpdateProductRequest,
    ) -> Result<UpdatedResponse, ApplicationError> {
        let mut product = self.require_product(public_id).await?;

        let category = self
            .categories
            .find_by_public_id(&CategoryPublicId(request.category_public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound(CATEGORY_NOT_FOUND.to_owned()))?;

        if self.products.exists_by_name(&request.name, Some(&product.public_id)).await? {
            return Err(ApplicationError::Conflict(PRODUCT_ALREADY_EXISTS.to_owned()));
        }

        product.update(ProductUpdate {
            category_id: category.id,
            name: request.name,
            description: request.description,
            price: request.price,
            rating: request.rating,
            image_url: request.image_url,
        })?;

        self.products
            .update(&product)
            .await
            .map_err(conflict_on_unique(PRODUCT_ALREADY_EXISTS))?;
        info!(
            event_name = "catalog.product.updated",
            public_id = %product.public_id,
            "product updated"
        );

        Ok(UpdatedResponse { updated: true, message: "Product updated successfully".to_owned() })
    }

    pub async fn list_products(
        &self,
        query: PaginationQuery,
    ) -> Result<ProductsPageResponse, ApplicationError> {
        let page = self.products.list(paginator(&query)?).await?;
        Ok(products_page(page))
    }

    pub async fn list_products_by_category(
        &self,
        category_public_id: String,
        query: PaginationQuery,
    ) -> Result<ProductsPageResponse, ApplicationError> {
        let paginator = paginator(&query)?;
        let category = self
            .categories
            .find_by_public_id(&CategoryPublicId(category_public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound(CATEGORY_NOT_FOUND.to_owned()))?;

        let page = self.products.list_by_category(&category.id, paginator).await?;
        Ok(products_page(page))
    }

    pub async fn get_product(&self, public_id: String) -> Result<ProductSummaryDto, ApplicationError> {
        let product = self.require_product(public_id).await?;
        Ok(ProductSummaryDto::from(&product))
    }

    pub async fn get_product_with_specifications(
        &self,
        public_id: String,
    ) -> Result<ProductWithSpecificationsResponse, ApplicationError> {
        let (product, groups) = self
            .products
            .find_with_specification_groups(&ProductPublicId(public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound(PRODUCT_NOT_FOUND.to_owned()))?;

        Ok(ProductWithSpecificationsResponse::new(&product, &groups))
    }

    pub async fn create_specification_value(
        &self,
        request: CreateSpecificationValueRequest,
    ) -> Result<CreatedResponse, ApplicationError> {
        let product = self.require_product(request.product_public_id).await?;
        let specification = self
            .specifications
            .find_by_public_id(&SpecificationPublicId(request.specification_public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Specification not found".to_owned()))?;

        if product
            .specification_values
            .iter()
            .any(|value| value.specification_id == specification.id)
        {
            return Err(ApplicationError::Conflict(
                "Product specification value already exists".to_owned(),
            ));
        }

        let value = SpecValue::for_type(
            specification.spec_type,
            request.string_value,
            request.int_value,
            request.bool_value,
        )?;
        let value = ProductSpecificationValue::new(
            SpecificationValueId(0),
            product.id,
            specification.id,
            value,
        )?;

        let id = self
            .values
            .create(&value)
            .await
            .map_err(conflict_on_unique("Product specification value already exists"))?;
        info!(
            event_name = "catalog.specification_value.created",
            value_id = id.0,
            product = %product.public_id,
            specification_id = %specification.id,
            "specification value created"
        );

        Ok(CreatedResponse {
            created: true,
            message: "Product specification value created successfully".to_owned(),
        })
    }

    pub async fn list_specifications(
        &self,
        group_public_id: String,
    ) -> Result<SpecificationsResponse, ApplicationError> {
        let group = self
            .groups
            .find_by_public_id(&SpecificationGroupPublicId(group_public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Specification group not found".to_owned()))?;

        let specifications = self.specifications.list_by_group(&group.id).await?;
        Ok(SpecificationsResponse {
            specifications: specifications.iter().map(SpecificationDto::from).collect(),
        })
    }

    pub async fn list_specification_groups(
        &self,
    ) -> Result<SpecificationGroupsResponse, ApplicationError> {
        let groups = self.groups.list_all().await?;
        Ok(SpecificationGroupsResponse {
            groups: groups.iter().map(SpecificationGroupDto::from).collect(),
        })
    }

    async fn require_product(&self, public_id: String) -> Result<Product, ApplicationError> {
        self.products
            .find_by_public_id(&ProductPublicId(public_id))
            .await?
            .ok_or_else(|| ApplicationError::NotFound(PRODUCT_NOT_FOUND.to_owned()))
    }

    async fn declared_type(
        &self,
        cache: &mut HashMap<SpecificationId, SpecificationType>,
        id: SpecificationId,
    ) -> Result<SpecificationType, ApplicationError> {
        if let Some(spec_type) = cache.get(&id) {
            return Ok(*spec_type);
        }
        let specification = self.specifications.find_by_id(&id).await?.ok_or_else(|| {
            ApplicationError::Persistence(format!("specification {id} referenced by a value is missing"))
        })?;
        cache.insert(id, specification.spec_type);
        Ok(specification.spec_type)
    }
}

fn paginator(query: &PaginationQuery) -> Result<Paginator, ApplicationError> {
    Ok(Paginator::new(
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(Paginator::DEFAULT_LIMIT),
    )?)
}

fn products_page(page: Page<Product>) -> ProductsPageResponse {
    ProductsPageResponse {
        paginator: PaginatorDto { total: page.total },
        products: page.items.iter().map(ProductSummaryDto::from).collect(),
    }
}

fn conflict_on_unique(message: &'static str) -> impl Fn(RepositoryError) -> ApplicationError {
    move |error| {
        if error.is_unique_violation() {
            ApplicationError::Conflict(message.to_owned())
        } else {
            ApplicationError::from(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vitrine_core::domain::category::{Category, CategoryId, CategoryPublicId};
    use vitrine_core::domain::specification::{
        Specification, SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
        SpecificationId, SpecificationPublicId, SpecificationType,
    };
    use vitrine_core::errors::{ApplicationError, DomainError};
    use vitrine_db::repositories::{
        CategoryRepository, InMemoryCatalog, SpecificationGroupRepository, SpecificationRepository,
    };

    use super::dto::{
        CompareProductsRequest, CreateProductRequest, CreateSpecificationValueRequest,
        PaginationQuery, UpdateProductRequest,
    };
    use super::CatalogService;

    async fn service() -> CatalogService {
        let catalog = Arc::new(InMemoryCatalog::default());
        for (id, public_id, name) in [(1, "cat00001", "Speakers"), (2, "cat00002", "Fridges")] {
            let category =
                Category::new(CategoryId(id), Some(CategoryPublicId(public_id.into())), name, "")
                    .expect("category");
            CategoryRepository::create(catalog.as_ref(), &category).await.expect("category");
        }
        let group = SpecificationGroup::new(
            SpecificationGroupId(1),
            Some(SpecificationGroupPublicId("grp00001".into())),
            "Features",
            "",
            Vec::new(),
        )
        .expect("group");
        SpecificationGroupRepository::create(catalog.as_ref(), &group).await.expect("group");
        for (id, public_id, title, spec_type) in [
            (8, "spc00008", "Battery Life (h)", SpecificationType::Int),
            (9, "spc00009", "Waterproof", SpecificationType::Bool),
            (17, "spc00017", "Color", SpecificationType::String),
        ] {
            let specification = Specification::new(
                SpecificationId(id),
                Some(SpecificationPublicId(public_id.into())),
                SpecificationGroupId(1),
                title,
                spec_type,
            )
            .expect("specification");
            SpecificationRepository::create(catalog.as_ref(), &specification)
                .await
                .expect("specification");
        }
        CatalogService::in_memory(catalog)
    }

    fn new_product(name: &str, price: i64) -> CreateProductRequest {
        CreateProductRequest {
            name: name.into(),
            description: String::new(),
            price,
            image_url: String::new(),
            category_public_id: "cat00001".into(),
        }
    }

    fn value(product: &str, specification: &str) -> CreateSpecificationValueRequest {
        CreateSpecificationValueRequest {
            product_public_id: product.into(),
            specification_public_id: specification.into(),
            string_value: None,
            int_value: None,
            bool_value: None,
        }
    }

    fn update(name: &str, rating: i64) -> UpdateProductRequest {
        UpdateProductRequest {
            name: name.into(),
            description: String::new(),
            price: 10_000,
            image_url: String::new(),
            rating,
            category_public_id: "cat00001".into(),
        }
    }

    #[tokio::test]
    async fn created_product_starts_unrated_and_is_listed() {
        let service = service().await;

        let created = service.create_product(new_product("Boom 3", 49_900)).await.expect("create");
        assert_eq!(created.public_id.len(), 8);

        let product = service.get_product(created.public_id.clone()).await.expect("get");
        assert_eq!(product.rating, 0);
        assert_eq!(product.price, 49_900);

        let page = service.list_products(PaginationQuery::default()).await.expect("list");
        assert_eq!(page.paginator.total, 1);
        assert_eq!(page.products[0].public_id, created.public_id);
    }

    #[tokio::test]
    async fn duplicate_names_and_unknown_categories_are_rejected() {
        let service = service().await;
        service.create_product(new_product("Boom 3", 49_900)).await.expect("create");

        let duplicate = service.create_product(new_product("Boom 3", 1)).await;
        assert_eq!(duplicate, Err(ApplicationError::Conflict("Product already exists".into())));

        let mut orphan = new_product("Flip 6", 1);
        orphan.category_public_id = "missing0".into();
        assert_eq!(
            service.create_product(orphan).await,
            Err(ApplicationError::NotFound("Category not found".into()))
        );
    }

    #[tokio::test]
    async fn invalid_product_input_is_a_validation_error() {
        let service = service().await;

        let error = service.create_product(new_product("", 1)).await.expect_err("empty name");
        assert_eq!(error, ApplicationError::Domain(DomainError::validation("Name cannot be empty")));

        let error = service.create_product(new_product("Boom", -1)).await.expect_err("negative");
        assert!(matches!(error, ApplicationError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_keeps_own_name_and_rejects_invalid_rating() {
        let service = service().await;
        let boom = service.create_product(new_product("Boom 3", 49_900)).await.expect("create");
        service.create_product(new_product("Flip 6", 39_900)).await.expect("create");

        let updated = service
            .update_product(boom.public_id.clone(), update("Boom 3", 45))
            .await
            .expect("update");
        assert!(updated.updated);
        assert_eq!(service.get_product(boom.public_id.clone()).await.expect("get").rating, 45);

        let taken = service.update_product(boom.public_id.clone(), update("Flip 6", 45)).await;
        assert_eq!(taken, Err(ApplicationError::Conflict("Product already exists".into())));

        let invalid = service.update_product(boom.public_id.clone(), update("Boom 3", 51)).await;
        assert!(matches!(invalid, Err(ApplicationError::Domain(DomainError::Validation(_)))));
        assert_eq!(service.get_product(boom.public_id).await.expect("get").rating, 45);
    }

    #[tokio::test]
    async fn delete_removes_the_product() {
        let service = service().await;
        let boom = service.create_product(new_product("Boom 3", 49_900)).await.expect("create");

        let deleted = service.delete_product(boom.public_id.clone()).await.expect("delete");
        assert!(deleted.deleted);
        assert_eq!(
            service.get_product(boom.public_id.clone()).await,
            Err(ApplicationError::NotFound("Product not found".into()))
        );
        assert!(service.delete_product(boom.public_id).await.is_err());
    }

    #[tokio::test]
    async fn specification_values_follow_the_declared_type() {
        let service = service().await;
        let boom = service.create_product(new_product("Boom 3", 49_900)).await.expect("create");

        let mut battery = value(&boom.public_id, "spc00008");
        battery.bool_value = Some(true);
        let missing_slot = service.create_specification_value(battery.clone()).await;
        assert!(matches!(missing_slot, Err(ApplicationError::Domain(DomainError::Validation(_)))));

        battery.int_value = Some(15);
        let created = service.create_specification_value(battery.clone()).await.expect("create");
        assert!(created.created);

        let duplicate = service.create_specification_value(battery).await;
        assert!(matches!(duplicate, Err(ApplicationError::Conflict(_))));

        let detail =
            service.get_product_with_specifications(boom.public_id).await.expect("detail");
        assert_eq!(detail.specifications_groups.len(), 1);
        let specification = &detail.specifications_groups[0].specifications[0];
        assert_eq!(specification.value.int_value, Some(15));
        assert_eq!(specification.value.bool_value, None);
    }

    #[tokio::test]
    async fn compare_reports_price_rating_and_shared_specifications() {
        let service = service().await;
        let boom = service.create_product(new_product("Boom 3", 59_900)).await.expect("create");
        let flip = service.create_product(new_product("Flip 6", 49_900)).await.expect("create");
        service.update_product(boom.public_id.clone(), update("Boom 3", 45)).await.expect("rate");

        for (product, waterproof) in [(&boom, true), (&flip, false)] {
            let mut request = value(&product.public_id, "spc00009");
            request.bool_value = Some(waterproof);
            service.create_specification_value(request).await.expect("value");
        }
        let mut color = value(&boom.public_id, "spc00017");
        color.string_value = Some("Blue".into());
        service.create_specification_value(color).await.expect("color");

        let comparison = service
            .compare_products(CompareProductsRequest {
                left_public_id: boom.public_id.clone(),
                right_public_id: flip.public_id.clone(),
            })
            .await
            .expect("compare");

        assert_eq!((comparison.price.left, comparison.price.right), (10_000, 49_900));
        assert_eq!(comparison.price.insights[0].message, "economized R$ 399,00");
        assert!(comparison.price.insights.iter().all(|insight| insight.favorable));
        assert_eq!(comparison.rating.insights[0].message, "has higher rating");
        assert_eq!(comparison.specifications.len(), 1);
        let waterproof = &comparison.specifications[0];
        assert_eq!(waterproof.spec_type, SpecificationType::Bool);
        assert_eq!(waterproof.left.bool_value, Some(true));
        assert!(waterproof.insights.iter().any(|insight| insight.message == "is waterproof"));
    }

    #[tokio::test]
    async fn compare_guards_surface_as_business_errors() {
        let service = service().await;
        let boom = service.create_product(new_product("Boom 3", 59_900)).await.expect("create");
        let mut fridge = new_product("Fridge", 359_900);
        fridge.category_public_id = "cat00002".into();
        let fridge = service.create_product(fridge).await.expect("create");

        let same = service
            .compare_products(CompareProductsRequest {
                left_public_id: boom.public_id.clone(),
                right_public_id: boom.public_id.clone(),
            })
            .await;
        assert_eq!(
            same,
            Err(ApplicationError::Domain(DomainError::business("cannot compare the same product")))
        );

        let mixed = service
            .compare_products(CompareProductsRequest {
                left_public_id: boom.public_id.clone(),
                right_public_id: fridge.public_id,
            })
            .await;
        assert!(matches!(mixed, Err(ApplicationError::Domain(DomainError::Business(_)))));

        let missing = service
            .compare_products(CompareProductsRequest {
                left_public_id: boom.public_id,
                right_public_id: "missing0".into(),
            })
            .await;
        assert_eq!(missing, Err(ApplicationError::NotFound("Product not found".into())));
    }

    #[tokio::test]
    async fn pagination_bounds_and_category_filter() {
        let service = service().await;
        for index in 0..3 {
            service
                .create_product(new_product(&format!("Speaker {index}"), 1_000))
                .await
                .expect("create");
        }

        let page = service
            .list_products_by_category(
                "cat00001".into(),
                PaginationQuery { skip: Some(1), limit: Some(1) },
            )
            .await
            .expect("page");
        assert_eq!(page.paginator.total, 3);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Speaker 1");

        let empty = service
            .list_products_by_category("cat00002".into(), PaginationQuery::default())
            .await
            .expect("page");
        assert_eq!(empty.paginator.total, 0);

        let invalid = service
            .list_products(PaginationQuery { skip: Some(-1), limit: None })
            .await;
        assert!(matches!(invalid, Err(ApplicationError::Domain(DomainError::Validation(_)))));
    }

    #[tokio::test]
    async fn specification_listings() {
        let service = service().await;

        let groups = service.list_specification_groups().await.expect("groups");
        assert_eq!(groups.groups.len(), 1);
        assert_eq!(groups.groups[0].public_id, "grp00001");

        let specifications = service.list_specifications("grp00001".into()).await.expect("specs");
        assert_eq!(specifications.specifications.len(), 3);
        assert_eq!(specifications.specifications[0].name, "Battery Life (h)");

        assert_eq!(
            service.list_specifications("missing0".into()).await,
            Err(ApplicationError::NotFound("Specification group not found".into()))
        );
    }
}
