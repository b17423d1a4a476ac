//! Extractor configuration.

/// Media type used when neither an operation nor its type declares one.
pub const ANY_MEDIA: &str = "*/*";

/// Tunables for [`EventExtractor`](crate::EventExtractor).
///
/// ```rust
/// use trellis::ExtractorConfig;
///
/// let config = ExtractorConfig {
///     default_media: "application/json".to_owned(),
///     ..ExtractorConfig::default()
/// };
/// assert_eq!(config.parallel_threshold, 16);
/// ```
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// Fallback for both consumed and produced media types.
    pub default_media: String,
    /// Routable operation count from which one type's operations are
    /// evaluated on the rayon pool instead of in line.
    pub parallel_threshold: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { default_media: ANY_MEDIA.to_owned(), parallel_threshold: 16 }
    }
}
