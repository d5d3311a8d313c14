//! geocoder-field CLI entry point
//!
//! Headless geocoder field widget - lookup, reverse and inspect

use geocoder_field::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
