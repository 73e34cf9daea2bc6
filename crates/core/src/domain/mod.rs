pub mod category;
pub mod insight;
pub mod money;
pub mod pagination;
pub mod product;
pub mod public_id;
pub mod specification;
pub mod specification_value;
