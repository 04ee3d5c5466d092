//! File input and output.

pub mod grdecl;
mod progress;

pub use progress::{NoProgress, ProgressLog, ProgressObserver};
