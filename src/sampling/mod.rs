//! Adaptive sampling.
//!
//! # Data Flow
//! ```text
//! Entry
//!     → router.rs: route(entry)
//!         job.status                          → unsampled core (always admitted)
//!         job.action + "finished graph"|...   → Sampler(100ms, first 2)
//!         anything else                       → Sampler(250ms, first 1)
//!     → policy.rs: per-tick counter keyed by (level, message hash)
//! ```
//!
//! # Design Decisions
//! - Routing is a pure function of the entry; admit and write agree on the route
//! - Counter tables are fixed-size, so memory does not grow with message variety
//! - Counters are atomics; no lock is taken on the admission path

pub mod policy;
pub mod router;

pub use policy::{Sampler, SamplerHook, SamplingDecision, SamplingPolicy};
pub use router::{Route, RouteRules, RoutingCore};
