//! Resolve addresses against the stored lookups in `data/`.
//!
//! Run with: cargo run --example resolve_flat_file
//! Set RUST_LOG=postcode_resolver=debug to see every candidate's score.

use postcode_resolver::{Address, AddressResolver, Error, FlatFileSource, Resolution};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let resolver = AddressResolver::new(FlatFileSource::with_data_dir(data_dir));

    let inputs = [
        // Unique match
        Address::new()
            .with_line_one("Flat 20")
            .with_line_two("Rose Tower")
            .with_postcode("PO5 2HX"),
        // Suffix split: "20a" matches "Flat 20A"
        Address::new()
            .with_line_one("20a Rose Tower, Clarence Parade")
            .with_postcode("PO5 2HX"),
        // Not enough detail to tell the flats apart
        Address::new()
            .with_line_one("Rose Tower")
            .with_postcode("PO5 2HX"),
    ];

    for input in &inputs {
        println!("Input: {input}");
        match resolver.validate_address(input).await? {
            Resolution::Matched(found) => {
                println!("  Matched: {}", found.candidate.address);
                println!(
                    "  Score {}, close penalty {}, matched tokens {:?}",
                    found.score, found.close_penalty, found.matches
                );
                println!("{}", serde_json::to_string_pretty(&found)?);
            }
            Resolution::Ambiguous { tied } => {
                println!("  Ambiguous between {} candidates:", tied.len());
                for candidate in tied {
                    println!("    {}", candidate.candidate.address);
                }
            }
            Resolution::NoCandidates => println!("  No addresses for this postcode"),
        }
        println!();
    }

    let stats = resolver.stats();
    println!(
        "{} resolutions, match rate {:.0}%",
        stats.total_resolutions(),
        stats.match_rate() * 100.0
    );

    // Missing lookups surface as errors
    let unknown = Address::new().with_line_one("1 Nowhere").with_postcode("ZZ9 9ZZ");
    if let Err(e) = resolver.validate_address(&unknown).await {
        println!("Lookup failed as expected: {e}");
    }

    Ok(())
}
