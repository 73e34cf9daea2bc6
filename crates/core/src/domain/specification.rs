use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::public_id;
use crate::errors::DomainError;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpecificationId(pub i64);

impl fmt::Display for SpecificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificationPublicId(pub String);

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpecificationGroupId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificationGroupPublicId(pub String);

/// Which value slot a specification's values must populate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecificationType {
    String,
    Int,
    Bool,
}

impl SpecificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for SpecificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecificationType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "bool" => Ok(Self::Bool),
            "" => Err(DomainError::validation("Type cannot be empty")),
            other => Err(DomainError::validation(format!(
                "Type `{other}` is not one of string|int|bool"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub id: SpecificationId,
    pub public_id: SpecificationPublicId,
    pub group_id: SpecificationGroupId,
    pub title: String,
    pub spec_type: SpecificationType,
}

impl Specification {
    pub fn new(
        id: SpecificationId,
        public_id: Option<SpecificationPublicId>,
        group_id: SpecificationGroupId,
        title: impl Into<String>,
        spec_type: SpecificationType,
    ) -> Result<Self, DomainError> {
        let specification = Self {
            id,
            public_id: SpecificationPublicId(public_id::resolve(public_id.map(|value| value.0))),
            group_id,
            title: title.into(),
            spec_type,
        };
        specification.validate()?;
        Ok(specification)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0 < 0 {
            return Err(DomainError::validation("ID field cannot be less than 0"));
        }
        if self.group_id.0 <= 0 {
            return Err(DomainError::validation(
                "SpecificationGroupID field must be greater than 0",
            ));
        }
        public_id::validate(&self.public_id.0)?;
        if self.title.is_empty() {
            return Err(DomainError::validation("Title cannot be empty"));
        }
        if self.title.chars().count() > 255 {
            return Err(DomainError::validation("Title cannot be longer than 255 characters"));
        }
        Ok(())
    }
}

/// A named bucket of related specifications, e.g. "Electrical".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationGroup {
    pub id: SpecificationGroupId,
    pub public_id: SpecificationGroupPublicId,
    pub name: String,
    pub description: String,
    pub specifications: Vec<Specification>,
}

impl SpecificationGroup {
    pub fn new(
        id: SpecificationGroupId,
        public_id: Option<SpecificationGroupPublicId>,
        name: impl Into<String>,
        description: impl Into<String>,
        specifications: Vec<Specification>,
    ) -> Result<Self, DomainError> {
        let group = Self {
            id,
            public_id: SpecificationGroupPublicId(public_id::resolve(
                public_id.map(|value| value.0),
            )),
            name: name.into(),
            description: description.into(),
            specifications,
        };
        group.validate()?;
        Ok(group)
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
        if self.description.chars().count() > 2000 {
            return Err(DomainError::validation(
                "Description cannot be longer than 2000 characters",
            ));
        }
        Ok(())
    }

    pub fn has_specifications(&self) -> bool {
        !self.specifications.is_empty()
    }
}
