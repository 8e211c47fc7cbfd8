//! Index-tracked binary max-heap
//!
//! The heap keeps a dense array of entries in max-heap order together with a
//! map from identifier to array position, so any live entry can be found in
//! O(1) and re-prioritised in O(log n).

mod error;
mod indexed;

pub use error::HeapError;
pub use indexed::{Entry, IndexedMaxHeap};
