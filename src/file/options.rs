//! Load configuration.

/// How [`JtFile::open_with`](super::JtFile::open_with) reads and decodes a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Decode segments on the rayon worker pool.
    pub parallel: bool,
    /// Read (or map) the whole file before decoding instead of streaming it.
    pub whole_file: bool,
    /// Memory-map whole-file loads when the `mmap` feature is enabled.
    pub mmap: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { parallel: false, whole_file: false, mmap: cfg!(feature = "mmap") }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parallel decoding; implies a whole-file load.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn whole_file(mut self, whole_file: bool) -> Self {
        self.whole_file = whole_file;
        self
    }

    pub fn mmap(mut self, mmap: bool) -> Self {
        self.mmap = mmap;
        self
    }

    /// Whether the input must be buffered in memory before decoding.
    #[inline]
    pub fn loads_whole_file(&self) -> bool {
        self.parallel || self.whole_file
    }
}
