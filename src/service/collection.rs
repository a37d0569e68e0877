//! Collection orchestration: all configured payment terms for one premium

use std::sync::Arc;

use rayon::prelude::*;

use crate::cache::{self, CacheRegistry, CacheStats};
use crate::periods::PeriodConfigProvider;
use crate::quote::{
    formula, CollectionParams, CollectionResult, FormulaError, QuoteDetail, QuoteFigures,
    TermQuote,
};
use crate::render::{ChartSpec, CollectionRenderer};

/// Batches quotes across every payment term configured for a premium,
/// memoizing the bundle per (age, sex, premium)
pub struct CollectionService {
    provider: Arc<dyn PeriodConfigProvider>,
    caches: Arc<CacheRegistry>,
    renderer: Option<Arc<dyn CollectionRenderer>>,
}

impl CollectionService {
    pub fn new(provider: Arc<dyn PeriodConfigProvider>, caches: Arc<CacheRegistry>) -> Self {
        Self {
            provider,
            caches,
            renderer: None,
        }
    }

    /// Attach a renderer for the collection summary image
    pub fn with_renderer(mut self, renderer: Arc<dyn CollectionRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Compute (or recall) the quote bundle for every term configured for
    /// the premium
    ///
    /// A cache hit returns the stored bundle without touching the provider,
    /// the engine or the renderer. An unconfigured premium yields an empty
    /// result with count 0, not an error. Rendering is best-effort and runs
    /// with no cache lock held.
    pub fn create_collection(
        &self,
        product: &str,
        params: &CollectionParams,
        generate_image: bool,
        use_cache: bool,
    ) -> Result<CollectionResult, FormulaError> {
        let key = cache::collection_fingerprint(params);

        if use_cache {
            if let Some(cached) = self.caches.collections.lock().unwrap().get(&key) {
                log::info!(
                    "collection cache hit: premium={} age={} sex={}",
                    params.monthly_premium,
                    params.actuarial_age,
                    params.sex.as_str()
                );
                return Ok(cached);
            }
        }

        let terms = self.provider.terms_for_premium(params.monthly_premium);
        if terms.is_empty() {
            log::info!(
                "no payment terms configured for premium {}",
                params.monthly_premium
            );
            return Ok(CollectionResult::empty(params.monthly_premium));
        }

        // Terms are independent and the engine is pure, so fan out per
        // term; collect preserves the provider order.
        let computed = terms
            .par_iter()
            .map(|&term| {
                let figures = formula::quote_figures(
                    params.actuarial_age,
                    params.sex,
                    params.monthly_premium,
                    term,
                )?;
                Ok((term, figures))
            })
            .collect::<Result<Vec<(u32, QuoteFigures)>, FormulaError>>()?;

        let quotes: Vec<TermQuote> = computed
            .iter()
            .map(|(term, figures)| TermQuote {
                term: *term,
                detail: QuoteDetail::from_figures(figures),
            })
            .collect();

        let mut result = CollectionResult {
            premium: params.monthly_premium,
            terms,
            count: quotes.len(),
            quotes,
            image_url: None,
        };

        if generate_image {
            result.image_url = self.render_image(product, params, &computed);
        }

        if use_cache {
            self.caches
                .collections
                .lock()
                .unwrap()
                .put(key, result.clone());
            log::info!(
                "collection cached: premium={} age={} sex={} terms={}",
                params.monthly_premium,
                params.actuarial_age,
                params.sex.as_str(),
                result.count
            );
        }

        Ok(result)
    }

    /// Render the summary image; a failure degrades to no image
    fn render_image(
        &self,
        product: &str,
        params: &CollectionParams,
        computed: &[(u32, QuoteFigures)],
    ) -> Option<String> {
        let renderer = self.renderer.as_ref()?;

        let file_stem = format!(
            "{}_premium{}_age{}_{}",
            product.to_lowercase(),
            params.monthly_premium as i64,
            params.actuarial_age,
            params.sex.as_str()
        );
        let spec = ChartSpec::from_figures(params.monthly_premium, file_stem, computed);

        match renderer.render(&spec) {
            Ok(image) => image.url.or_else(|| Some(image.path.display().to_string())),
            Err(err) => {
                log::warn!("could not render collection image: {}", err);
                None
            }
        }
    }

    /// Clear the collection cache, returning how many entries were removed
    pub fn clear_cache(&self) -> usize {
        let removed = self.caches.clear_collections();
        log::info!("collection cache cleared: {} entries", removed);
        removed
    }

    /// Entry counts for both cache namespaces
    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }
}
