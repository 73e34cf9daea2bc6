//! Product comparison: result types, the strategy table and the engine the use-case layer calls.
//!
//! Comparison is pure and synchronous. Every call works on request-scoped entities and the
//! engine holds only an immutable strategy table, so one engine can be shared across tasks.

pub mod strategies;

use serde::{Deserialize, Serialize};

use crate::domain::insight::Insight;
use crate::domain::product::Product;
use crate::domain::specification_value::ProductSpecificationValue;
use crate::errors::DomainError;

pub use strategies::{SpecificationKind, StrategyFn, StrategyTable};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub left: i64,
    pub right: i64,
    pub insights: Vec<Insight>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingComparison {
    pub left: i64,
    pub right: i64,
    pub insights: Vec<Insight>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationComparison {
    pub left: ProductSpecificationValue,
    pub right: ProductSpecificationValue,
    pub insights: Vec<Insight>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductComparison {
    pub price: PriceComparison,
    pub rating: RatingComparison,
    pub specifications: Vec<SpecificationComparison>,
}

pub trait ProductComparator: Send + Sync {
    fn compare(&self, left: &Product, right: &Product) -> Result<ProductComparison, DomainError>;
}

#[derive(Clone, Debug, Default)]
pub struct ComparisonEngine {
    strategies: StrategyTable,
}

impl ComparisonEngine {
    pub fn new(strategies: StrategyTable) -> Self {
        Self { strategies }
    }
}

impl ProductComparator for ComparisonEngine {
    fn compare(&self, left: &Product, right: &Product) -> Result<ProductComparison, DomainError> {
        left.compare(right, &self.strategies)
    }
}
