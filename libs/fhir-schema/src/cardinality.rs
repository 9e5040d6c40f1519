use crate::error::SchemaError;
use std::fmt;
use std::str::FromStr;

/// Declared repetition bounds of a field. `max: None` is `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    pub min: u32,
    pub max: Option<u32>,
}

impl Cardinality {
    pub const OPTIONAL: Self = Self { min: 0, max: Some(1) };
    pub const REQUIRED: Self = Self { min: 1, max: Some(1) };
    pub const MANY: Self = Self { min: 0, max: None };
    pub const ONE_OR_MORE: Self = Self { min: 1, max: None };

    pub fn new(min: u32, max: Option<u32>) -> Result<Self, SchemaError> {
        let card = Self { min, max };
        match max {
            Some(0) => Err(SchemaError::InvalidCardinality(card.to_string())),
            Some(m) if m < min => Err(SchemaError::InvalidCardinality(card.to_string())),
            _ => Ok(card),
        }
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    /// A field is repeating when more than one item may appear.
    pub fn is_repeating(&self) -> bool {
        self.max.map_or(true, |m| m > 1)
    }

    pub fn allows(&self, count: usize) -> bool {
        let count = count as u64;
        count >= u64::from(self.min) && self.max.map_or(true, |m| count <= u64::from(m))
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

impl FromStr for Cardinality {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidCardinality(s.to_string());
        let (min, max) = s.trim().split_once("..").ok_or_else(invalid)?;
        let min = min.parse::<u32>().map_err(|_| invalid())?;
        let max = match max {
            "*" => None,
            m => Some(m.parse::<u32>().map_err(|_| invalid())?),
        };
        Self::new(min, max)
    }
}
