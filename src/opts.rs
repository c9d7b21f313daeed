use smart_default::SmartDefault;

/// A configuration for result collection
///
/// ```rs
/// let mut opts = Opts::default();
/// opts.buffer_capacity = 256;
/// ```
#[derive(Debug, Clone, SmartDefault)]
pub struct Opts {
    /// Fail with `Error::UnsupportedMetadata` when a bookmark shows up on a result.
    /// When disabled the bookmark is logged and forwarded like any other metadata.
    #[default = true]
    pub reject_bookmarks: bool,

    /// Initial capacity of the record buffer used by `sync::BufferedMode`
    #[default = 16]
    pub buffer_capacity: usize,
}
