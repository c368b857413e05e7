//! # KASANE: Multiplexed External Knowledge for Semantic Analysis
//!
//! KASANE lets a semantic-analysis engine consult any number of external
//! knowledge providers (precompiled indexes, debugging and REPL layers,
//! lazily-loaded module stores) through the single provider-shaped handle
//! the engine was built for.
//!
//! ## How It Fits Together
//!
//! ```text
//! engine ──> ProviderMultiplexer ──> provider 1
//!                               ├──> provider 2
//!                               └──> provider n   (registration order)
//! ```
//!
//! The engine holds one [`FactProvider`] handle and never learns whether it
//! is talking to one provider or many. The multiplexer forwards every query
//! to each registered provider in registration order and combines the
//! answers per query family:
//!
//! * **Broadcast**: lifecycle notifications and method-pool loads reach
//!   every provider, with no result to combine
//! * **Accumulate**: fact queries concatenate each provider's appended
//!   entries, preserving registration order, never deduplicating
//! * **Short-circuit**: unqualified-lookup recovery stops at the first
//!   provider that answers, because exactly one resolution may win
//!
//! ## Module Map
//!
//! * [`facts`]: the handle types facts are phrased in
//! * [`lookup`]: the unqualified-lookup accumulator and scope handle
//! * [`provider`]: the capability trait, the multiplexer, and the shipped
//!   providers (file-backed index, in-memory)
//! * [`session`]: the analysis context providers bind to and the session
//!   wrapper coupling provider lifecycle to an analysis run
//! * [`error`]: crate-level error aggregation
//!
//! ## Design Constraints
//!
//! Everything is synchronous and single-threaded: providers are consulted
//! sequentially on the calling thread and the multiplexer adds no
//! concurrency, retries, timeouts, or error recovery of its own. Providers
//! are shared handles the embedding system keeps alive; the multiplexer
//! never manages a provider's lifetime.

pub mod error;
pub mod facts;
pub mod lookup;
pub mod provider;
pub mod session;

// Re-exports
pub use error::*;
pub use facts::*;
pub use lookup::*;
pub use provider::{FactProvider, ProviderMultiplexer};
pub use session::*;
