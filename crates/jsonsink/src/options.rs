use crate::{document::Document, error::ErrorPolicy};

/// Configuration shared by [`DomBuilder`] and [`FilteringBuilder`].
///
/// # Examples
///
/// ```rust
/// use jsonsink::{BuilderOptions, Document, DomBuilder, ErrorPolicy};
///
/// let options = BuilderOptions {
///     error_policy: ErrorPolicy::Record,
///     ..Default::default()
/// };
/// let mut doc = Document::new();
/// let builder = DomBuilder::with_options(&mut doc, options);
/// assert!(!builder.is_errored());
/// ```
///
/// [`DomBuilder`]: crate::DomBuilder
/// [`FilteringBuilder`]: crate::FilteringBuilder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// What to do when the producer reports an error or a size limit trips.
    ///
    /// # Default
    ///
    /// [`ErrorPolicy::Raise`]
    pub error_policy: ErrorPolicy,

    /// The largest element count a producer may announce for one array or
    /// object.
    ///
    /// Self-describing binary encodings report container sizes up front. A
    /// reported size above this limit fails with an out-of-range error (id
    /// 408) before any element is read. The `NO_LIMIT` hint is never checked.
    ///
    /// # Default
    ///
    /// [`Document::MAX_CONTAINER_LEN`]
    pub max_container_len: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            max_container_len: Document::MAX_CONTAINER_LEN,
        }
    }
}
