use std::fmt;

use serde::{Deserialize, Serialize};

use crate::comparison::{PriceComparison, ProductComparison, RatingComparison, StrategyTable};
use crate::domain::category::CategoryId;
use crate::domain::insight::Insight;
use crate::domain::money::format_brl;
use crate::domain::public_id;
use crate::domain::specification_value::ProductSpecificationValue;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Placeholder for products not yet persisted.
    pub const UNASSIGNED: Self = Self(0);
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductPublicId(pub String);

impl fmt::Display for ProductPublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const MAX_RATING: i64 = 50;

/// Catalog product. Price is in minor currency units; rating is tenths of a star (0..=50).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub public_id: ProductPublicId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub rating: i64,
    pub image_url: String,
    pub specification_values: Vec<ProductSpecificationValue>,
}

/// Input for `Product::new`. A missing public id is generated.
#[derive(Clone, Debug, Default)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub public_id: Option<ProductPublicId>,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub rating: i64,
    pub image_url: String,
    pub specification_values: Vec<ProductSpecificationValue>,
}

#[derive(Clone, Debug)]
pub struct ProductUpdate {
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub rating: i64,
    pub image_url: String,
}

impl Product {
    pub fn new(input: NewProduct) -> Result<Self, DomainError> {
        let product = Self {
            id: input.id.unwrap_or(ProductId::UNASSIGNED),
            public_id: ProductPublicId(public_id::resolve(input.public_id.map(|value| value.0))),
            category_id: input.category_id,
            name: input.name,
            description: input.description,
            price: input.price,
            rating: input.rating,
            image_url: input.image_url,
            specification_values: input.specification_values,
        };
        product.validate()?;
        Ok(product)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0 < 0 {
            return Err(DomainError::validation("ID field cannot be less than 0"));
        }
        public_id::validate(&self.public_id.0)?;
        if self.category_id.0 <= 0 {
            return Err(DomainError::validation("CategoryID field must be greater than 0"));
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("Name cannot be empty"));
        }
        if self.name.chars().count() > 255 {
            return Err(DomainError::validation("Name cannot be longer than 255 characters"));
        }
        if self.description.chars().count() > 2000 {
            return Err(DomainError::validation(
                "Description cannot be longer than 2000 characters",
            ));
        }
        if self.price < 0 {
            return Err(DomainError::validation("Price cannot be negative"));
        }
        if !(0..=MAX_RATING).contains(&self.rating) {
            return Err(DomainError::validation("Rating must be between 0 and 50"));
        }
        Ok(())
    }

    /// Applies `update` only if the resulting product is still valid.
    pub fn update(&mut self, update: ProductUpdate) -> Result<(), DomainError> {
        let mut candidate = self.clone();
        candidate.category_id = update.category_id;
        candidate.name = update.name;
        candidate.description = update.description;
        candidate.price = update.price;
        candidate.rating = update.rating;
        candidate.image_url = update.image_url;
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    pub fn has_specifications(&self) -> bool {
        !self.specification_values.is_empty()
    }

    pub fn validate_before_compare(&self, other: &Self) -> Result<(), DomainError> {
        if self.id.0 <= 0 || other.id.0 <= 0 {
            return Err(DomainError::business("cannot compare products with ID <= 0"));
        }
        if self.id == other.id {
            return Err(DomainError::business("cannot compare the same product"));
        }
        if self.category_id != other.category_id {
            return Err(DomainError::business(
                "cannot compare products with different categories",
            ));
        }
        Ok(())
    }

    /// Compares `self` (left) against `other` (right).
    ///
    /// Specification values are matched from the left side only; values the right product
    /// lacks are skipped. The first failing specification aborts the whole comparison.
    pub fn compare(
        &self,
        other: &Self,
        strategies: &StrategyTable,
    ) -> Result<ProductComparison, DomainError> {
        self.validate_before_compare(other)?;

        let price = self.compare_price(other.price);
        let rating = self.compare_rating(other.rating);

        let mut specifications = Vec::new();
        if self.has_specifications() {
            for left in &self.specification_values {
                for right in other
                    .specification_values
                    .iter()
                    .filter(|right| right.specification_id == left.specification_id)
                {
                    specifications.push(left.compare(right, strategies)?);
                }
            }
        }

        Ok(ProductComparison { price, rating, specifications })
    }

    pub fn compare_price(&self, other_price: i64) -> PriceComparison {
        let diff = self.price - other_price;
        let mut insights = Vec::new();

        if diff > 0 {
            insights.push(Insight::unfavorable(
                self.id,
                format!("additional cost of {}", format_brl(diff)),
            ));
            if other_price != 0 {
                insights.push(Insight::unfavorable(
                    self.id,
                    format!("is {}% more expensive", percentage_of(diff, other_price)),
                ));
            }
        } else if diff < 0 {
            let saved = diff.abs();
            insights.push(Insight::favorable(self.id, format!("economized {}", format_brl(saved))));
            if other_price != 0 {
                insights.push(Insight::favorable(
                    self.id,
                    format!("is {}% less expensive", percentage_of(saved, other_price)),
                ));
            }
        } else {
            insights.push(Insight::neutral(self.id, "has equal price"));
        }

        PriceComparison { left: self.price, right: other_price, insights }
    }

    pub fn compare_rating(&self, other_rating: i64) -> RatingComparison {
        let insight = match self.rating.cmp(&other_rating) {
            std::cmp::Ordering::Greater => Insight::favorable(self.id, "has higher rating"),
            std::cmp::Ordering::Less => Insight::unfavorable(self.id, "has lower rating"),
            std::cmp::Ordering::Equal => Insight::neutral(self.id, "has same rating"),
        };

        RatingComparison { left: self.rating, right: other_rating, insights: vec![insight] }
    }
}

// Truncating integer percentage; widened so large prices cannot overflow.
fn percentage_of(amount: i64, base: i64) -> i128 {
    i128::from(amount) * 100 / i128::from(base)
}
