use serde::{Deserialize, Serialize};

use crate::comparison::{SpecificationComparison, StrategyTable};
use crate::domain::product::ProductId;
use crate::domain::specification::{SpecificationId, SpecificationType};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificationValueId(pub i64);

/// The typed value one product holds for one specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SpecValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl SpecValue {
    /// Builds a value from nullable storage slots. Exactly one slot may be set.
    pub fn from_slots(
        string_value: Option<String>,
        int_value: Option<i64>,
        bool_value: Option<bool>,
    ) -> Result<Self, DomainError> {
        match (string_value, int_value, bool_value) {
            (Some(value), None, None) => Ok(Self::String(value)),
            (None, Some(value), None) => Ok(Self::Int(value)),
            (None, None, Some(value)) => Ok(Self::Bool(value)),
            (None, None, None) => Err(DomainError::validation(
                "at least one value (String, Int, or Bool) must be provided",
            )),
            _ => Err(DomainError::validation(
                "only one value (String, Int, or Bool) may be provided",
            )),
        }
    }

    /// Picks the slot a specification of `spec_type` stores, ignoring the others.
    pub fn for_type(
        spec_type: SpecificationType,
        string_value: Option<String>,
        int_value: Option<i64>,
        bool_value: Option<bool>,
    ) -> Result<Self, DomainError> {
        let value = match spec_type {
            SpecificationType::String => string_value.map(Self::String),
            SpecificationType::Int => int_value.map(Self::Int),
            SpecificationType::Bool => bool_value.map(Self::Bool),
        };
        value.ok_or_else(|| {
            DomainError::validation(format!(
                "specification of type {spec_type} requires {spec_type}_value"
            ))
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn value_type(&self) -> SpecificationType {
        match self {
            Self::String(_) => SpecificationType::String,
            Self::Int(_) => SpecificationType::Int,
            Self::Bool(_) => SpecificationType::Bool,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecificationValue {
    pub id: SpecificationValueId,
    pub product_id: ProductId,
    pub specification_id: SpecificationId,
    pub value: SpecValue,
}

impl ProductSpecificationValue {
    pub fn new(
        id: SpecificationValueId,
        product_id: ProductId,
        specification_id: SpecificationId,
        value: SpecValue,
    ) -> Result<Self, DomainError> {
        let spec_value = Self { id, product_id, specification_id, value };
        spec_value.validate()?;
        Ok(spec_value)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0 < 0 {
            return Err(DomainError::validation("ID field cannot be less than 0"));
        }
        if self.product_id.0 <= 0 {
            return Err(DomainError::validation("ProductID field must be greater than 0"));
        }
        if self.specification_id.0 <= 0 {
            return Err(DomainError::validation("SpecificationID field must be greater than 0"));
        }
        Ok(())
    }

    /// Rejects pairs that cannot be meaningfully compared.
    pub fn validate_before_compare(&self, other: &Self) -> Result<(), DomainError> {
        if self.id.0 <= 0 || other.id.0 <= 0 {
            return Err(DomainError::business("cannot compare specification values with ID <= 0"));
        }
        if self.id == other.id {
            return Err(DomainError::business("cannot compare the same specification value"));
        }
        if self.product_id.0 <= 0 || other.product_id.0 <= 0 {
            return Err(DomainError::business("cannot compare products with ID <= 0"));
        }
        if self.product_id == other.product_id {
            return Err(DomainError::business("cannot compare the same product"));
        }
        if self.specification_id.0 <= 0 || other.specification_id.0 <= 0 {
            return Err(DomainError::business("cannot compare specifications with ID <= 0"));
        }
        if self.specification_id != other.specification_id {
            return Err(DomainError::business(
                "cannot compare products with different specifications",
            ));
        }
        Ok(())
    }

    pub fn compare(
        &self,
        other: &Self,
        strategies: &StrategyTable,
    ) -> Result<SpecificationComparison, DomainError> {
        self.validate_before_compare(other)?;
        let insights = strategies.apply(self, other)?;
        Ok(SpecificationComparison { left: self.clone(), right: other.clone(), insights })
    }
}
