//! The text-measurement capability consumed by layout and hit-testing.
//!
//! Shaping and rasterization live outside the engine. Layout only needs the
//! advance width of a string and a font's vertical metrics, and it needs them
//! to be deterministic within a session.

use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::segment::FontDescriptor;

/// Vertical metrics of a font, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub line_height: i32,
}

/// Width and line metrics provider.
pub trait TextMeasurer {
    /// Advance width of `text` set in `font`.
    fn measure(&self, text: &str, font: &FontDescriptor) -> i32;

    /// Vertical metrics of `font`.
    fn metrics(&self, font: &FontDescriptor) -> FontMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, font: &FontDescriptor) -> i32 {
        (**self).measure(text, font)
    }

    fn metrics(&self, font: &FontDescriptor) -> FontMetrics {
        (**self).metrics(font)
    }
}

/// Default number of `(text, font)` widths a [`CachedMeasurer`] keeps.
pub const DEFAULT_WIDTH_CAPACITY: NonZeroUsize = match NonZeroUsize::new(4096) {
    Some(n) => n,
    None => panic!("capacity must be non-zero"),
};

/// Memoizes another measurer per `(text, font)`.
///
/// Layout measures each text segment on every pass, so repeated queries are
/// common. Widths live in an LRU of bounded size; edited text keeps producing
/// new strings and old ones are evicted. The cache uses interior mutability
/// because the core is single-threaded.
pub struct CachedMeasurer<M> {
    inner: M,
    widths: RefCell<LruCache<(String, FontDescriptor), i32>>,
    metrics: RefCell<HashMap<FontDescriptor, FontMetrics>>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, DEFAULT_WIDTH_CAPACITY)
    }

    /// Keep at most `capacity` widths.
    pub fn with_capacity(inner: M, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            widths: RefCell::new(LruCache::new(capacity)),
            metrics: RefCell::new(HashMap::new()),
        }
    }

    /// Number of cached widths.
    pub fn cached_widths(&self) -> usize {
        self.widths.borrow().len()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.widths.borrow().cap()
    }

    /// Drop every cached entry, e.g. after fonts were reloaded.
    pub fn clear(&self) {
        self.widths.borrow_mut().clear();
        self.metrics.borrow_mut().clear();
    }

    /// The uncached measurer, for one-off work such as glyph boundaries.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure(&self, text: &str, font: &FontDescriptor) -> i32 {
        let key = (text.to_owned(), font.clone());
        if let Some(&width) = self.widths.borrow_mut().get(&key) {
            return width;
        }
        let width = self.inner.measure(text, font);
        self.widths.borrow_mut().put(key, width);
        width
    }

    fn metrics(&self, font: &FontDescriptor) -> FontMetrics {
        if let Some(&m) = self.metrics.borrow().get(font) {
            return m;
        }
        let m = self.inner.metrics(font);
        self.metrics.borrow_mut().insert(font.clone(), m);
        m
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Counting {
        calls: Cell<usize>,
    }

    impl TextMeasurer for Counting {
        fn measure(&self, text: &str, _font: &FontDescriptor) -> i32 {
            self.calls.set(self.calls.get() + 1);
            text.chars().count() as i32 * 7
        }

        fn metrics(&self, _font: &FontDescriptor) -> FontMetrics {
            FontMetrics { ascent: 8, descent: 2, line_height: 12 }
        }
    }

    #[test]
    fn repeated_measure_hits_cache() {
        let m = CachedMeasurer::new(Counting { calls: Cell::new(0) });
        let font = FontDescriptor::default();
        assert_eq!(m.measure("abc", &font), 21);
        assert_eq!(m.measure("abc", &font), 21);
        assert_eq!(m.inner().calls.get(), 1);
        assert_eq!(m.cached_widths(), 1);
    }

    #[test]
    fn fonts_are_part_of_the_key() {
        let m = CachedMeasurer::new(Counting { calls: Cell::new(0) });
        m.measure("abc", &FontDescriptor::new("a", 10));
        m.measure("abc", &FontDescriptor::new("b", 10));
        assert_eq!(m.inner().calls.get(), 2);
    }

    #[test]
    fn clear_empties_cache() {
        let m = CachedMeasurer::new(Counting { calls: Cell::new(0) });
        m.measure("x", &FontDescriptor::default());
        m.clear();
        assert_eq!(m.cached_widths(), 0);
    }

    #[test]
    fn metrics_pass_through() {
        let m = CachedMeasurer::new(Counting { calls: Cell::new(0) });
        assert_eq!(m.metrics(&FontDescriptor::default()).line_height, 12);
    }

    #[test]
    fn least_recently_used_width_is_evicted() {
        let m = CachedMeasurer::with_capacity(Counting { calls: Cell::new(0) }, NonZeroUsize::new(2).unwrap());
        let font = FontDescriptor::default();
        m.measure("a", &font);
        m.measure("b", &font);
        m.measure("a", &font);
        m.measure("c", &font);
        assert_eq!(m.cached_widths(), 2);
        assert_eq!(m.inner().calls.get(), 3);
        m.measure("a", &font);
        assert_eq!(m.inner().calls.get(), 3);
        m.measure("b", &font);
        assert_eq!(m.inner().calls.get(), 4);
    }
}
