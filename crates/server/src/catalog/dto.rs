//! Transport shapes for the catalog API.

use serde::{Deserialize, Serialize};

use vitrine_core::domain::category::Category;
use vitrine_core::domain::insight::Insight;
use vitrine_core::domain::product::Product;
use vitrine_core::domain::specification::{Specification, SpecificationGroup, SpecificationType};
use vitrine_core::domain::specification_value::SpecValue;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub public_id: String,
    pub name: String,
    pub description: String,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            public_id: category.public_id.0.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    pub category_public_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProductResponse {
    pub public_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    pub rating: i64,
    pub category_public_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub updated: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub created: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorDto {
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummaryDto {
    pub public_id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub rating: i64,
    pub image_url: String,
}

impl From<&Product> for ProductSummaryDto {
    fn from(product: &Product) -> Self {
        Self {
            public_id: product.public_id.0.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            rating: product.rating,
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsPageResponse {
    pub paginator: PaginatorDto,
    pub products: Vec<ProductSummaryDto>,
}

/// A value with only the slot of its specification's declared type populated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecValueDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
}

impl SpecValueDto {
    pub fn for_type(spec_type: SpecificationType, value: &SpecValue) -> Self {
        match spec_type {
            SpecificationType::String => {
                Self { string_value: value.as_str().map(str::to_owned), ..Self::default() }
            }
            SpecificationType::Int => Self { int_value: value.as_int(), ..Self::default() },
            SpecificationType::Bool => Self { bool_value: value.as_bool(), ..Self::default() },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecificationDto {
    pub public_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub spec_type: SpecificationType,
    #[serde(flatten)]
    pub value: SpecValueDto,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecificationGroupDto {
    pub public_id: String,
    pub name: String,
    pub description: String,
    pub specifications: Vec<ProductSpecificationDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWithSpecificationsResponse {
    #[serde(flatten)]
    pub product: ProductSummaryDto,
    pub specifications_groups: Vec<ProductSpecificationGroupDto>,
}

impl ProductWithSpecificationsResponse {
    pub fn new(product: &Product, groups: &[SpecificationGroup]) -> Self {
        let specifications_groups = groups
            .iter()
            .map(|group| ProductSpecificationGroupDto {
                public_id: group.public_id.0.clone(),
                name: group.name.clone(),
                description: group.description.clone(),
                specifications: group
                    .specifications
                    .iter()
                    .filter_map(|specification| {
                        product
                            .specification_values
                            .iter()
                            .find(|value| value.specification_id == specification.id)
                            .map(|value| ProductSpecificationDto {
                                public_id: specification.public_id.0.clone(),
                                name: specification.title.clone(),
                                spec_type: specification.spec_type,
                                value: SpecValueDto::for_type(specification.spec_type, &value.value),
                            })
                    })
                    .collect(),
            })
            .filter(|group| !group.specifications.is_empty())
            .collect();

        Self { product: ProductSummaryDto::from(product), specifications_groups }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSpecificationValueRequest {
    pub product_public_id: String,
    pub specification_public_id: String,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub int_value: Option<i64>,
    #[serde(default)]
    pub bool_value: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SpecificationsQuery {
    pub specification_group_public_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationDto {
    pub public_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub spec_type: SpecificationType,
}

impl From<&Specification> for SpecificationDto {
    fn from(specification: &Specification) -> Self {
        Self {
            public_id: specification.public_id.0.clone(),
            name: specification.title.clone(),
            spec_type: specification.spec_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationsResponse {
    pub specifications: Vec<SpecificationDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationGroupDto {
    pub public_id: String,
    pub name: String,
    pub description: String,
}

impl From<&SpecificationGroup> for SpecificationGroupDto {
    fn from(group: &SpecificationGroup) -> Self {
        Self {
            public_id: group.public_id.0.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationGroupsResponse {
    pub groups: Vec<SpecificationGroupDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareProductsRequest {
    pub left_public_id: String,
    pub right_public_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightDto {
    pub favorable: bool,
    pub neutral: bool,
    pub message: String,
}

impl From<&Insight> for InsightDto {
    fn from(insight: &Insight) -> Self {
        Self {
            favorable: insight.favorable,
            neutral: insight.neutral,
            message: insight.message.clone(),
        }
    }
}

pub fn insights(insights: &[Insight]) -> Vec<InsightDto> {
    insights.iter().map(InsightDto::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricComparisonDto {
    pub left: i64,
    pub right: i64,
    pub insights: Vec<InsightDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationComparisonDto {
    #[serde(rename = "type")]
    pub spec_type: SpecificationType,
    pub left: SpecValueDto,
    pub right: SpecValueDto,
    pub insights: Vec<InsightDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub price: MetricComparisonDto,
    pub rating: MetricComparisonDto,
    pub specifications: Vec<SpecificationComparisonDto>,
}
