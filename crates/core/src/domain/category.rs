use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::public_id;
use crate::errors::DomainError;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPublicId(pub String);

impl fmt::Display for CategoryPublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub public_id: CategoryPublicId,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(
        id: CategoryId,
        public_id: Option<CategoryPublicId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let category = Self {
            id,
            public_id: CategoryPublicId(public_id::resolve(public_id.map(|value| value.0))),
            name: name.into(),
            description: description.into(),
        };
        category.validate()?;
        Ok(category)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0 < 0 {
            return Err(DomainError::validation("ID field cannot be less than 0"));
        }
        public_id::validate(&self.public_id.0)?;
        if self.name.is_empty() {
            return Err(DomainError::validation("Name cannot be empty"));
        }
        if self.name.chars().count() > 255 {
            return Err(DomainError::validation("Name cannot be longer than 255 characters"));
        }
        Ok(())
    }
}
