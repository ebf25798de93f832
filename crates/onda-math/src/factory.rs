//! Process-wide providers of shared transform instances.
//!
//! A [`TransformFactory`] builds transforms for a requested frame size. The
//! crate keeps one lazily-initialized provider per transform family —
//! [`fft_transforms`] and [`dct_transforms`] — each wrapping its factory in a
//! small size-keyed LRU cache, so pipelines that alternate between a handful
//! of frame sizes reuse planned instances instead of re-planning.
//!
//! The built-in factories can be replaced once, at composition-root startup,
//! through [`install_fft_factory`] / [`install_dct_factory`]. The first
//! install wins; a repeated install, or one attempted after the provider has
//! been touched, is rejected with a warning and the earlier factory stays in
//! effect. Callers never observe a failed installation as an error.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::dct::Dct;
use crate::fft::Fft;
use crate::transform::Transform;
use crate::Result;

/// Builds transform instances for a requested number of samples.
pub trait TransformFactory: Send + Sync {
    /// Creates a transform for frames of `num_samples` samples.
    fn create(&self, num_samples: usize) -> Result<Arc<dyn Transform>>;
}

/// Built-in factory producing [`Fft`] transforms.
#[derive(Debug, Default)]
pub struct FftFactory;

impl TransformFactory for FftFactory {
    fn create(&self, num_samples: usize) -> Result<Arc<dyn Transform>> {
        Ok(Arc::new(Fft::new(num_samples)?))
    }
}

/// Built-in factory producing [`Dct`] transforms.
#[derive(Debug, Default)]
pub struct DctFactory;

impl TransformFactory for DctFactory {
    fn create(&self, num_samples: usize) -> Result<Arc<dyn Transform>> {
        Ok(Arc::new(Dct::new(num_samples)?))
    }
}

/// Number of transform instances a [`CachingFactory`] retains.
const CACHE_CAPACITY: usize = 8;

/// A [`TransformFactory`] wrapper that caches created instances by size.
///
/// The cache is a small LRU keyed by sample count: a hit moves the entry to
/// the most-recent position, an insert past [`CACHE_CAPACITY`] evicts the
/// least recently used entry. Alternating among more sizes than the capacity
/// defeats the cache — a performance caveat, not a correctness hazard,
/// since creation is serialized behind the cache lock either way.
pub struct CachingFactory {
    inner: Box<dyn TransformFactory>,
    cache: Mutex<Vec<(usize, Arc<dyn Transform>)>>,
}

impl CachingFactory {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: Box<dyn TransformFactory>) -> Self {
        Self {
            inner,
            cache: Mutex::new(Vec::with_capacity(CACHE_CAPACITY)),
        }
    }
}

impl TransformFactory for CachingFactory {
    fn create(&self, num_samples: usize) -> Result<Arc<dyn Transform>> {
        let mut cache = self.cache.lock();
        if let Some(index) = cache.iter().position(|(size, _)| *size == num_samples) {
            let entry = cache.remove(index);
            let transform = Arc::clone(&entry.1);
            cache.push(entry);
            return Ok(transform);
        }
        tracing::debug!(num_samples, "transform cache miss, planning new instance");
        let transform = self.inner.create(num_samples)?;
        if cache.len() == CACHE_CAPACITY {
            cache.remove(0);
        }
        cache.push((num_samples, Arc::clone(&transform)));
        Ok(transform)
    }
}

/// One lazily-initialized provider slot.
///
/// `configured` holds a factory injected before first use; `active` is built
/// on first access and never replaced afterwards.
struct Provider {
    name: &'static str,
    configured: Mutex<Option<Box<dyn TransformFactory>>>,
    active: OnceLock<CachingFactory>,
}

impl Provider {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            configured: Mutex::new(None),
            active: OnceLock::new(),
        }
    }

    fn install(&self, factory: Box<dyn TransformFactory>) -> bool {
        if self.active.get().is_some() {
            tracing::warn!(
                provider = self.name,
                "factory installed after first use, keeping the active factory"
            );
            return false;
        }
        let mut configured = self.configured.lock();
        if configured.is_some() {
            tracing::warn!(
                provider = self.name,
                "factory installed twice, keeping the first"
            );
            return false;
        }
        *configured = Some(factory);
        true
    }

    fn get(&self, built_in: fn() -> Box<dyn TransformFactory>) -> &CachingFactory {
        self.active.get_or_init(|| {
            let factory = self.configured.lock().take().unwrap_or_else(built_in);
            CachingFactory::new(factory)
        })
    }
}

static FFT_PROVIDER: Provider = Provider::new("fft");
static DCT_PROVIDER: Provider = Provider::new("dct");

/// The process-wide FFT provider.
///
/// Built on first access from the installed factory, or from [`FftFactory`]
/// when none was installed.
pub fn fft_transforms() -> &'static CachingFactory {
    FFT_PROVIDER.get(|| Box::new(FftFactory))
}

/// The process-wide DCT provider, analogous to [`fft_transforms`].
pub fn dct_transforms() -> &'static CachingFactory {
    DCT_PROVIDER.get(|| Box::new(DctFactory))
}

/// Replaces the factory behind [`fft_transforms`].
///
/// Must be called at composition-root startup, before the provider's first
/// use. Returns whether the factory was installed; a repeated or late
/// install leaves the earlier factory in place and logs a warning.
pub fn install_fft_factory(factory: Box<dyn TransformFactory>) -> bool {
    FFT_PROVIDER.install(factory)
}

/// Replaces the factory behind [`dct_transforms`]; see
/// [`install_fft_factory`] for the timing contract.
pub fn install_dct_factory(factory: Box<dyn TransformFactory>) -> bool {
    DCT_PROVIDER.install(factory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caching_factory_reuses_instances_by_size() {
        let factory = CachingFactory::new(Box::new(FftFactory));
        let a = factory.create(64).unwrap();
        let b = factory.create(64).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let c = factory.create(128).unwrap();
        assert_eq!(c.num_samples(), 128);
        // 64 is still cached
        let d = factory.create(64).unwrap();
        assert!(Arc::ptr_eq(&a, &d));
    }

    #[test]
    fn test_caching_factory_evicts_least_recently_used() {
        let factory = CachingFactory::new(Box::new(FftFactory));
        let first = factory.create(2).unwrap();
        for exp in 2..=(CACHE_CAPACITY as u32) {
            factory.create(1 << exp).unwrap();
        }
        // touching size 2 keeps it alive through the next insert
        assert!(Arc::ptr_eq(&first, &factory.create(2).unwrap()));
        factory.create(1 << (CACHE_CAPACITY as u32 + 1)).unwrap();
        assert!(Arc::ptr_eq(&first, &factory.create(2).unwrap()));
        // filling the cache with fresh sizes eventually evicts it
        for exp in 12..(12 + CACHE_CAPACITY as u32) {
            factory.create(1 << exp).unwrap();
        }
        assert!(!Arc::ptr_eq(&first, &factory.create(2).unwrap()));
    }

    #[test]
    fn test_caching_factory_propagates_creation_errors() {
        let factory = CachingFactory::new(Box::new(FftFactory));
        assert!(factory.create(3).is_err());
        assert!(factory.create(0).is_err());
        // an error does not poison the cache
        assert!(factory.create(4).is_ok());
    }

    #[test]
    fn test_fft_provider_returns_shared_instances() {
        let a = fft_transforms().create(64).unwrap();
        let b = fft_transforms().create(64).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.num_samples(), 64);
    }

    #[test]
    fn test_dct_provider_install_after_first_use_is_rejected() {
        let transform = dct_transforms().create(8).unwrap();
        assert_eq!(transform.num_samples(), 8);
        assert!(!install_dct_factory(Box::new(DctFactory)));
    }

    #[test]
    fn test_provider_first_install_wins() {
        let provider = Provider::new("test");
        assert!(provider.install(Box::new(FftFactory)));
        assert!(!provider.install(Box::new(DctFactory)));
        // the FFT factory from the first install answers, so inverse works
        let transform = provider.get(|| Box::new(DctFactory)).create(4).unwrap();
        assert!(transform.inverse(&[1.0, 0.0, 0.0, 0.0], &[0.0; 4]).is_ok());
        assert!(!provider.install(Box::new(DctFactory)));
    }
}
