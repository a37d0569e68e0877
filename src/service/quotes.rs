//! Single-quote service: runs the formula engine and owns the quote store

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::quote::{formula, FormulaError, Quote, QuoteParams};

/// Creates and stores single quotes
///
/// Owns the in-memory quote sequence and the id counter. Ids are assigned
/// with an atomic fetch-add, so concurrent create calls never collide.
/// The pure-formula path does not consult the single-quote cache
/// namespace; that namespace is reserved for external calculation
/// backends and still shows up in the cache statistics.
pub struct QuoteService {
    store: Mutex<Vec<Quote>>,
    next_id: AtomicU64,
}

impl QuoteService {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a quote for one (age, sex, premium, term) combination
    ///
    /// Runs the formula engine, assigns the next sequential id, stamps the
    /// creation time and appends the immutable record to the store.
    pub fn create(&self, product: &str, params: QuoteParams) -> Result<Quote, FormulaError> {
        let figures = formula::quote_figures(
            params.actuarial_age,
            params.sex,
            params.monthly_premium,
            params.payment_term_years,
        )?;

        let quote = Quote {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            product: product.to_string(),
            created_at: Utc::now(),
            return_percentage: figures.return_percentage / 100.0,
            implicit_rate: figures.implicit_annual_rate / 100.0,
            insured_sum: figures.amounts.total_contribution,
            payout_amount: figures.amounts.total_payout,
            annual_premium: figures.amounts.annual_premium,
            payout_table: Some(figures.payout_table),
            params,
        };

        self.store.lock().unwrap().push(quote.clone());
        log::debug!("stored quote {} for product {}", quote.id, quote.product);

        Ok(quote)
    }

    /// Snapshot of every stored quote, in creation order
    pub fn all(&self) -> Vec<Quote> {
        self.store.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Sex;
    use approx::assert_relative_eq;

    fn params(term: u32) -> QuoteParams {
        QuoteParams {
            actuarial_age: 18,
            sex: Sex::M,
            monthly_premium: 300.0,
            payment_term_years: term,
        }
    }

    #[test]
    fn test_create_fills_derived_fields() {
        let service = QuoteService::new();
        let quote = service.create("RUMBO", params(4)).unwrap();

        assert_eq!(quote.id, 1);
        assert_eq!(quote.product, "RUMBO");
        // Stored as decimal fractions
        assert_relative_eq!(quote.return_percentage, 1.1106, epsilon = 1e-9);
        assert_relative_eq!(quote.implicit_rate, 0.0266, epsilon = 1e-9);
        assert_relative_eq!(quote.insured_sum, 14_400.0);
        assert_relative_eq!(quote.payout_amount, 15_992.64, epsilon = 1e-9);
        assert_relative_eq!(quote.annual_premium, 3_600.0);
        assert_eq!(quote.payout_table.as_ref().unwrap().len(), 4);
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_ids_are_sequential() {
        let service = QuoteService::new();
        for expected in 1..=5u64 {
            let quote = service.create("RUMBO", params(4)).unwrap();
            assert_eq!(quote.id, expected);
        }
        let stored = service.all();
        assert_eq!(stored.len(), 5);
        assert!(stored.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn test_invalid_term_is_rejected_and_not_stored() {
        let service = QuoteService::new();
        assert!(service.create("RUMBO", params(3)).is_err());
        assert!(service.is_empty());
    }

    #[test]
    fn test_concurrent_creates_never_collide() {
        let service = std::sync::Arc::new(QuoteService::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = std::sync::Arc::clone(&service);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        service.create("RUMBO", params(5)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids: Vec<u64> = service.all().iter().map(|quote| quote.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
    }
}
