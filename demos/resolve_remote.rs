//! Resolve an address with candidates from the Ideal Postcodes API.
//!
//! Run with:
//!   IDEAL_POSTCODES_API_KEY=ak_... cargo run --example resolve_remote -- "PO5 2HX" "Flat 20" "Rose Tower"

use postcode_resolver::{
    Address, AddressResolver, Error, IdealPostcodesSource, RemoteConfig, Resolution,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let postcode = args.next().unwrap_or_else(|| "PO5 2HX".to_string());
    let lines: Vec<String> = args.collect();

    let mut input = Address::new().with_postcode(postcode);
    if let Some(line) = lines.first() {
        input = input.with_line_one(line.as_str());
    }
    if let Some(line) = lines.get(1) {
        input = input.with_line_two(line.as_str());
    }
    if let Some(line) = lines.get(2) {
        input = input.with_line_three(line.as_str());
    }

    let source = IdealPostcodesSource::with_config(RemoteConfig::from_env()?)?;
    let resolver = AddressResolver::new(source);

    match resolver.validate_address(&input).await? {
        Resolution::Matched(found) => println!("{}", found.candidate.address),
        Resolution::Ambiguous { tied } => {
            println!("Ambiguous: {} candidates share the best score", tied.len())
        }
        Resolution::NoCandidates => println!("No addresses for {}", input.postcode),
    }

    Ok(())
}
