//! Streaming batch sources.
//!
//! A source delivers batches through a blocking, callback-style `load`: the
//! handler runs to completion before the next batch is produced, which is
//! what gives the pipeline its at-most-one-batch-in-flight guarantee.

pub mod csv_source;
pub mod memory;

pub use csv_source::CsvBatchSource;
pub use memory::MemorySource;

use st_common::Result;
use st_frame::DataFrame;

/// A stream of batches delivered one at a time.
pub trait BatchSource {
    /// Invoke `handler` once per available batch, blocking until the
    /// source is exhausted or fails. A handler error aborts the load and
    /// is returned as-is.
    fn load(&mut self, handler: &mut dyn FnMut(DataFrame) -> Result<()>) -> Result<()>;
}
