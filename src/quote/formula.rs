//! Deterministic quote figures
//!
//! Every function here is pure: identical inputs produce bit-identical
//! outputs, with no randomness and no time dependence. Cache correctness
//! in the services depends on this.

use thiserror::Error;

use super::data::Sex;

/// Minimum payment term accepted by the cumulative return formula
///
/// Below this the base term goes negative and the fractional power is
/// undefined, so the engine rejects instead of emitting NaN.
pub const MIN_RETURN_TERM: u32 = 4;

/// A payment term outside a formula's domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("invalid payment term {term}: must be at least {min}")]
    InvalidTerm { term: u32, min: u32 },
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cumulative return percentage for a (term, premium, age) combination
///
/// Longer terms are rewarded super-linearly, higher premiums and younger
/// ages linearly, with an extra step bonus from 6 years up. The result is
/// clamped to [110, 140] and rounded to 2 decimals.
pub fn return_percentage(term: u32, premium: f64, age: u8) -> Result<f64, FormulaError> {
    if term < MIN_RETURN_TERM {
        return Err(FormulaError::InvalidTerm {
            term,
            min: MIN_RETURN_TERM,
        });
    }

    let t = term as f64;
    let base = 108.0 + (t - 4.0) * 5.0;
    let term_bonus = (t - 4.0).powf(1.3) * 1.8;
    let premium_bonus = premium / 100.0 * 0.3;
    let age_bonus = ((45.0 - age as f64) * 0.08).max(0.0);
    let long_term_bonus = if term >= 6 { (t - 5.0) * 2.5 } else { 0.0 };

    let pct = base + term_bonus + premium_bonus + age_bonus + long_term_bonus;

    Ok(round2(pct.clamp(110.0, 140.0)))
}

/// Effective annual rate implied by a cumulative return over a term
///
/// Annualizes the cumulative return, applies a mild per-term multiplier,
/// then clamps to [1.0, 10.0] and rounds to 2 decimals.
pub fn implicit_annual_rate(return_percentage: f64, term: u32) -> Result<f64, FormulaError> {
    if term < 1 {
        return Err(FormulaError::InvalidTerm { term, min: 1 });
    }

    let fraction = return_percentage / 100.0;
    let annual = (fraction.powf(1.0 / term as f64) - 1.0) * 100.0;
    let term_multiplier = 1.0 + (term as f64 - 4.0) * 0.02;

    Ok(round2((annual * term_multiplier).clamp(1.0, 10.0)))
}

/// Per-year payout percentages: 60 the first year, 70 in between, the
/// final return percentage in the last year
///
/// For a one-year term the first and last year coincide and the single
/// entry is the return percentage; no 60 entry survives.
pub fn payout_table(return_percentage: f64, term: u32) -> Result<Vec<f64>, FormulaError> {
    if term < 1 {
        return Err(FormulaError::InvalidTerm { term, min: 1 });
    }

    let last = (term - 1) as usize;
    let table = (0..=last)
        .map(|year| {
            if year == last {
                return_percentage
            } else if year == 0 {
                60.0
            } else {
                70.0
            }
        })
        .collect();

    Ok(table)
}

/// Amounts derived from premium, term and cumulative return
///
/// Exact arithmetic identities; rounding happens only at presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedAmounts {
    /// premium * 12 * term
    pub total_contribution: f64,

    /// total_contribution * return_percentage / 100
    pub total_payout: f64,

    /// total_payout - total_contribution
    pub total_gain: f64,

    /// total_contribution - total_gain
    pub profitability: f64,

    /// premium * 12
    pub annual_premium: f64,
}

/// Compute the derived amounts for a premium, term and cumulative return
pub fn derived_amounts(premium: f64, term: u32, return_percentage: f64) -> DerivedAmounts {
    let total_contribution = premium * 12.0 * term as f64;
    let total_payout = total_contribution * return_percentage / 100.0;
    let total_gain = total_payout - total_contribution;

    DerivedAmounts {
        total_contribution,
        total_payout,
        total_gain,
        profitability: total_contribution - total_gain,
        annual_premium: premium * 12.0,
    }
}

/// Full set of figures for one input combination
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteFigures {
    /// Cumulative return percentage, in [110, 140]
    pub return_percentage: f64,

    /// Effective annual rate, in [1.0, 10.0]
    pub implicit_annual_rate: f64,

    /// Per-year payout percentages, length == term
    pub payout_table: Vec<f64>,

    /// Derived currency amounts
    pub amounts: DerivedAmounts,
}

/// Compute every figure for one (age, sex, premium, term) combination
///
/// Sex is accepted for parity with the request shape but does not enter
/// any formula.
pub fn quote_figures(age: u8, _sex: Sex, premium: f64, term: u32) -> Result<QuoteFigures, FormulaError> {
    let pct = return_percentage(term, premium, age)?;

    Ok(QuoteFigures {
        return_percentage: pct,
        implicit_annual_rate: implicit_annual_rate(pct, term)?,
        payout_table: payout_table(pct, term)?,
        amounts: derived_amounts(premium, term, pct),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_combination() {
        // term 4, premium 300, age 18: 108 + 0 + 0.9 + 2.16 + 0 = 111.06
        let pct = return_percentage(4, 300.0, 18).unwrap();
        assert_relative_eq!(pct, 111.06, epsilon = 1e-9);

        let table = payout_table(pct, 4).unwrap();
        assert_eq!(table.len(), 4);
        assert_relative_eq!(table[0], 60.0);
        assert_relative_eq!(table[1], 70.0);
        assert_relative_eq!(table[2], 70.0);
        assert_relative_eq!(table[3], 111.06, epsilon = 1e-9);

        let rate = implicit_annual_rate(pct, 4).unwrap();
        assert_relative_eq!(rate, 2.66, epsilon = 1e-9);
    }

    #[test]
    fn test_return_percentage_bounds() {
        for term in 4..=7 {
            for &premium in &[100.0, 300.0, 500.0, 1000.0, 5000.0] {
                for &age in &[18u8, 30, 45, 60, 90] {
                    let pct = return_percentage(term, premium, age).unwrap();
                    assert!(
                        (110.0..=140.0).contains(&pct),
                        "out of range for term={} premium={} age={}: {}",
                        term,
                        premium,
                        age,
                        pct
                    );
                }
            }
        }
    }

    #[test]
    fn test_return_percentage_rewards_longer_terms() {
        let p4 = return_percentage(4, 300.0, 30).unwrap();
        let p5 = return_percentage(5, 300.0, 30).unwrap();
        let p6 = return_percentage(6, 300.0, 30).unwrap();
        let p7 = return_percentage(7, 300.0, 30).unwrap();
        assert!(p4 < p5 && p5 < p6 && p6 < p7);
    }

    #[test]
    fn test_return_percentage_is_deterministic() {
        let a = return_percentage(6, 380.0, 25).unwrap();
        let b = return_percentage(6, 380.0, 25).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_age_bonus_floors_at_zero() {
        // Ages past 45 must not be penalized below the pure term/premium value
        let at_45 = return_percentage(5, 200.0, 45).unwrap();
        let at_80 = return_percentage(5, 200.0, 80).unwrap();
        assert_relative_eq!(at_45, at_80, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_terms_are_rejected() {
        assert_eq!(
            return_percentage(3, 300.0, 18),
            Err(FormulaError::InvalidTerm { term: 3, min: 4 })
        );
        assert_eq!(
            implicit_annual_rate(111.06, 0),
            Err(FormulaError::InvalidTerm { term: 0, min: 1 })
        );
        assert_eq!(
            payout_table(111.06, 0),
            Err(FormulaError::InvalidTerm { term: 0, min: 1 })
        );
        assert!(quote_figures(18, Sex::M, 300.0, 2).is_err());
    }

    #[test]
    fn test_implicit_annual_rate_bounds() {
        for term in 1..=10 {
            for &pct in &[110.0, 120.0, 130.0, 140.0] {
                let rate = implicit_annual_rate(pct, term).unwrap();
                assert!(
                    (1.0..=10.0).contains(&rate),
                    "rate out of range for pct={} term={}: {}",
                    pct,
                    term,
                    rate
                );
            }
        }
    }

    #[test]
    fn test_payout_table_single_year() {
        let table = payout_table(112.5, 1).unwrap();
        assert_eq!(table, vec![112.5]);
    }

    #[test]
    fn test_payout_table_shape() {
        for term in 2..=8 {
            let table = payout_table(125.0, term).unwrap();
            assert_eq!(table.len(), term as usize);
            assert_relative_eq!(table[0], 60.0);
            assert_relative_eq!(*table.last().unwrap(), 125.0);
            for interior in &table[1..term as usize - 1] {
                assert_relative_eq!(*interior, 70.0);
            }
        }
    }

    #[test]
    fn test_derived_amounts_identities_exact() {
        for &(premium, term, pct) in &[
            (300.0, 4, 111.06),
            (380.0, 6, 128.4),
            (1000.0, 7, 140.0),
            (0.0, 5, 115.0),
        ] {
            let amounts = derived_amounts(premium, term, pct);
            assert_eq!(amounts.total_contribution, premium * 12.0 * term as f64);
            assert_eq!(amounts.total_gain, amounts.total_payout - amounts.total_contribution);
            assert_eq!(amounts.profitability, amounts.total_contribution - amounts.total_gain);
            assert_eq!(amounts.annual_premium, premium * 12.0);
        }
    }

    #[test]
    fn test_derived_amounts_reference_values() {
        let amounts = derived_amounts(300.0, 4, 111.06);
        assert_relative_eq!(amounts.total_contribution, 14_400.0);
        assert_relative_eq!(amounts.total_payout, 15_992.64, epsilon = 1e-9);
        assert_relative_eq!(amounts.total_gain, 1_592.64, epsilon = 1e-9);
        assert_relative_eq!(amounts.profitability, 12_807.36, epsilon = 1e-9);
        assert_relative_eq!(amounts.annual_premium, 3_600.0);
    }

    #[test]
    fn test_quote_figures_composition() {
        let figures = quote_figures(18, Sex::M, 300.0, 4).unwrap();
        assert_relative_eq!(figures.return_percentage, 111.06, epsilon = 1e-9);
        assert_eq!(figures.payout_table.len(), 4);
        assert_relative_eq!(
            *figures.payout_table.last().unwrap(),
            figures.return_percentage,
            epsilon = 1e-9
        );
        // Sex does not enter the formulas
        let other = quote_figures(18, Sex::F, 300.0, 4).unwrap();
        assert_eq!(figures, other);
    }
}
