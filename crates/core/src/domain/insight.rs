use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// One observation produced while comparing two products, owned by the left-hand product.
///
/// An insight with neither flag set is unfavorable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub product_id: ProductId,
    pub favorable: bool,
    pub neutral: bool,
    pub message: String,
}

impl Insight {
    pub fn favorable(product_id: ProductId, message: impl Into<String>) -> Self {
        Self { product_id, favorable: true, neutral: false, message: message.into() }
    }

    pub fn unfavorable(product_id: ProductId, message: impl Into<String>) -> Self {
        Self { product_id, favorable: false, neutral: false, message: message.into() }
    }

    pub fn neutral(product_id: ProductId, message: impl Into<String>) -> Self {
        Self { product_id, favorable: false, neutral: true, message: message.into() }
    }

    pub fn is_unfavorable(&self) -> bool {
        !self.favorable && !self.neutral
    }
}

#[cfg(test)]
mod tests {
    use super::Insight;
    use crate::domain::product::ProductId;

    #[test]
    fn constructors_set_flags() {
        let favorable = Insight::favorable(ProductId(1), "has higher rating");
        let unfavorable = Insight::unfavorable(ProductId(1), "has lower rating");
        let neutral = Insight::neutral(ProductId(1), "has same rating");

        assert!(favorable.favorable && !favorable.neutral);
        assert!(unfavorable.is_unfavorable());
        assert!(neutral.neutral && !neutral.favorable);
        assert!(!neutral.is_unfavorable());
    }
}
