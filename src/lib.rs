//! Cotizador System - Deterministic quoting engine for savings-plan insurance products
//!
//! This library provides:
//! - Pure quote formulas (cumulative return, effective annual rate, payout table)
//! - Per-premium payment-term configuration
//! - Fingerprint-keyed memoization of quote collections
//! - Quote and collection services with an in-memory store
//! - Chart rendering and temporary image hosting

pub mod cache;
pub mod periods;
pub mod quote;
pub mod render;
pub mod service;

// Re-export commonly used types
pub use cache::{CacheRegistry, CacheStats};
pub use periods::{PeriodConfigProvider, PeriodTable};
pub use quote::{CollectionParams, CollectionResult, FormulaError, Quote, QuoteParams, Sex};
pub use service::{CollectionService, QuoteService};
