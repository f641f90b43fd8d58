//! # postcode-resolver
//!
//! Resolve a free-form postal address to the one record a postcode lookup
//! knows it by.
//!
//! Users type addresses loosely: "Flat 20, Rose Tower" where the lookup has
//! "Flat 20 / Rose Tower / 62 Clarence Parade". Given the input and every
//! address registered under its postcode, this crate picks the candidate the
//! user meant, or reports that it cannot tell.
//!
//! ## How matching works
//!
//! - **Tokenizing**: fields are lowercased, stripped to ASCII letters and
//!   digits, split into words, and "47a" style numbers become "47" + "a".
//! - **Canonicalizing**: descriptive lines give the general tokens; building
//!   number, building name and sub-building name give the primary tokens.
//! - **Scoring**: every candidate token found in the input scores 1, or 2 if
//!   it is one of the candidate's primary tokens. Unmatched candidate tokens
//!   count towards a close penalty.
//! - **Resolving**: the top score wins outright; a tie goes to a strictly
//!   lower close penalty; anything else is ambiguous.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use postcode_resolver::{Address, AddressResolver, FlatFileSource};
//!
//! # async fn run() -> postcode_resolver::Result<()> {
//! // Stored lookups live in ./data/<postcode>.json
//! let resolver = AddressResolver::new(FlatFileSource::with_data_dir("data"));
//!
//! let input = Address::new()
//!     .with_line_one("Flat 20")
//!     .with_line_two("Rose Tower")
//!     .with_postcode("PO5 2HX");
//!
//! match resolver.validate_address(&input).await?.matched() {
//!     Some(found) => println!("Matched: {}", found.candidate.address),
//!     None => println!("Please give more detail"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod canonicalizer;
pub mod error;
pub mod profiling;
#[cfg(feature = "remote")]
pub mod remote;
pub mod resolver;
pub mod scorer;
pub mod source;
pub mod tokenizer;
pub mod types;

// Re-export main API
pub use canonicalizer::{canonicalize, TokenizedAddress};
pub use error::{Error, Result};
pub use profiling::{ResolutionProfiler, ResolutionSummary};
#[cfg(feature = "remote")]
pub use remote::{IdealPostcodesSource, RemoteConfig};
#[cfg(feature = "parallel")]
pub use resolver::resolve_batch_parallel;
pub use resolver::{rank, resolve, resolve_decision, Resolution};
pub use scorer::{score, ScoredCandidate};
pub use source::{normalize_postcode, AddressSource, FlatFileConfig, FlatFileSource, InMemorySource};
pub use tokenizer::{tokenize, TokenSet};
pub use types::*;

use std::time::Instant;
use tracing::{info, warn};

/// Main entry point: resolves addresses against candidates from a source.
///
/// The source is injected at construction. The resolver keeps no per-call
/// state besides its profiling counters, so one instance can serve
/// concurrent requests.
///
/// # Examples
///
/// ```rust
/// use postcode_resolver::{Address, AddressResolver, InMemorySource};
///
/// let source = InMemorySource::new().with_addresses([
///     Address::new().with_line_one("Flat 20").with_line_two("Rose Tower").with_postcode("PO5 2HX"),
///     Address::new().with_line_one("Flat 21").with_line_two("Rose Tower").with_postcode("PO5 2HX"),
/// ]);
/// let resolver = AddressResolver::new(source);
///
/// let input = Address::new().with_line_one("flat 21, rose tower").with_postcode("po5 2hx");
/// let resolution = tokio_test::block_on(resolver.validate_address(&input))?;
/// assert_eq!(resolution.matched().unwrap().candidate.address.line_one, "Flat 21");
/// # Ok::<(), postcode_resolver::Error>(())
/// ```
#[derive(Debug)]
pub struct AddressResolver<S> {
    source: S,
    profiler: ResolutionProfiler,
}

impl<S: AddressSource> AddressResolver<S> {
    /// Create a resolver over the given address source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            profiler: ResolutionProfiler::new(),
        }
    }

    /// Resolve an address against every candidate registered under its postcode.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the candidate lookup fails. An empty
    /// lookup or an ambiguous tie is not an error; see [`Resolution`].
    pub async fn validate_address(&self, address: &Address) -> Result<Resolution> {
        let lookup_started = Instant::now();
        let candidates = match self.source.get_candidates(&address.postcode).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Lookup for postcode {} failed: {e}", address.postcode);
                self.profiler.record_lookup(lookup_started.elapsed());
                self.profiler.record_lookup_failure();
                return Err(e);
            }
        };
        self.profiler.record_lookup(lookup_started.elapsed());

        let resolve_started = Instant::now();
        let resolution = resolve_decision(address, &candidates);
        self.profiler
            .record_resolution(&resolution, resolve_started.elapsed());

        match &resolution {
            Resolution::Matched(found) => info!(
                "Resolved address in {} to '{}' (score {}, penalty {})",
                address.postcode, found.candidate.address, found.score, found.close_penalty
            ),
            Resolution::Ambiguous { tied } => info!(
                "Address in {} is ambiguous between {} candidates",
                address.postcode,
                tied.len()
            ),
            Resolution::NoCandidates => {
                info!("No candidates registered for postcode {}", address.postcode)
            }
        }

        Ok(resolution)
    }

    /// Get the address source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a snapshot of resolution outcomes so far.
    pub fn stats(&self) -> ResolutionSummary {
        self.profiler.summary()
    }

    /// Reset the resolution counters.
    pub fn reset_stats(&self) {
        self.profiler.reset();
    }
}
