pub mod comparison;
pub mod config;
pub mod domain;
pub mod errors;

pub use comparison::{
    ComparisonEngine, PriceComparison, ProductComparator, ProductComparison, RatingComparison,
    SpecificationComparison, SpecificationKind, StrategyTable,
};
pub use domain::category::{Category, CategoryId, CategoryPublicId};
pub use domain::insight::Insight;
pub use domain::pagination::{Page, Paginator};
pub use domain::product::{NewProduct, Product, ProductId, ProductPublicId, ProductUpdate};
pub use domain::specification::{
    Specification, SpecificationGroup, SpecificationGroupId, SpecificationGroupPublicId,
    SpecificationId, SpecificationPublicId, SpecificationType,
};
pub use domain::specification_value::{ProductSpecificationValue, SpecValue, SpecificationValueId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
