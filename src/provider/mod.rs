//! # External Fact Providers
//!
//! This module defines how the analysis engine reaches knowledge that lives
//! outside its in-memory program model, and how several such sources are
//! presented to the engine as one.
//!
//! ## Core Components
//!
//! * **Provider Interface** ([`provider::FactProvider`]): the capability
//!   surface every external source implements
//! * **Provider Multiplexer** ([`multiplex::ProviderMultiplexer`]): a
//!   provider-shaped facade over an ordered list of providers
//! * **Shipped Providers** ([`providers`]): a file-backed index provider and
//!   an in-memory provider for embedding layers
//!
//! ## Dispatch Policy
//!
//! Three query families exist, each with its own combination rule:
//!
//! 1. Lifecycle and method-pool notifications are broadcast to every
//!    provider, in registration order, with no result
//! 2. Accumulating queries concatenate every provider's appended entries,
//!    in registration order, without deduplication
//! 3. Unqualified-lookup recovery short-circuits at the first provider that
//!    reports success, because exactly one resolution may win

pub mod multiplex;
#[allow(clippy::module_inception)]
pub mod provider;
pub mod providers;

pub use multiplex::ProviderMultiplexer;
pub use provider::FactProvider;
