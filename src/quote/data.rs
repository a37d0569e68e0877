//! Quote parameter and result records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sex of the client as used for demographic pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    /// Get the single-letter representation used in requests and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" | "m" => Ok(Sex::M),
            "F" | "f" => Ok(Sex::F),
            other => Err(format!("Unknown sex: {}", other)),
        }
    }
}

/// Input parameters for a single quote
///
/// Immutable once constructed; together with the product name this
/// identifies a unique computation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteParams {
    /// Actuarial age of the client
    pub actuarial_age: u8,

    /// Sex of the client (accepted for parity with the request shape;
    /// the return formula does not use it)
    pub sex: Sex,

    /// Monthly premium amount
    pub monthly_premium: f64,

    /// Number of years over which premiums are paid
    pub payment_term_years: u32,
}

/// Input parameters for a collection request
///
/// The payment term is supplied per item by the period configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionParams {
    /// Actuarial age of the client
    pub actuarial_age: u8,

    /// Sex of the client
    pub sex: Sex,

    /// Monthly premium amount
    pub monthly_premium: f64,
}

/// A stored quote record
///
/// Created once by the quote service, appended to the in-memory store and
/// never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Monotonically increasing identifier
    pub id: u64,

    /// Product name the quote was issued for
    pub product: String,

    /// Input parameters the figures were derived from
    pub params: QuoteParams,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Cumulative return as a decimal fraction (1.1106 = 111.06%)
    pub return_percentage: f64,

    /// Effective annual rate as a decimal fraction
    pub implicit_rate: f64,

    /// Insured sum: total contribution over the term
    pub insured_sum: f64,

    /// Total payout at the end of the term
    pub payout_amount: f64,

    /// Premium paid per year
    pub annual_premium: f64,

    /// Per-year payout percentages, ending in the final return percentage
    pub payout_table: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_round_trip() {
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::M);
        assert_eq!("f".parse::<Sex>().unwrap(), Sex::F);
        assert_eq!(Sex::F.as_str(), "F");
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn test_sex_serde_format() {
        assert_eq!(serde_json::to_string(&Sex::M).unwrap(), r#""M""#);
        let sex: Sex = serde_json::from_str(r#""F""#).unwrap();
        assert_eq!(sex, Sex::F);
    }
}
