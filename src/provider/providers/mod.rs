//! Shipped [`FactProvider`](super::provider::FactProvider) implementations.

pub mod index;
pub mod memory;

pub use index::{FactIndex, IndexError, IndexProvider, IndexResult};
pub use memory::MemoryProvider;
