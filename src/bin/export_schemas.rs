//! Writes JSON Schemas for the negotiation engine's wire types.
//!
//! ```text
//! cargo run --features cli --bin export_schemas -- --out-dir schemas
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use offer_negotiation::application::services::listing_catalog::ListingSnapshot;
use offer_negotiation::domain::entities::{CounterOffer, Offer, PaymentRequest};
use offer_negotiation::domain::events::OfferTransitioned;
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "export_schemas", about = "Export JSON Schemas for offer types")]
struct Args {
    /// Directory to write `<type>.schema.json` files into.
    #[arg(long, default_value = "schemas")]
    out_dir: PathBuf,

    /// Print schemas to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,
}

fn schemas() -> Vec<(&'static str, RootSchema)> {
    vec![
        ("offer", schema_for!(Offer)),
        ("counter_offer", schema_for!(CounterOffer)),
        ("payment_request", schema_for!(PaymentRequest)),
        ("listing_snapshot", schema_for!(ListingSnapshot)),
        ("offer_transitioned", schema_for!(OfferTransitioned)),
    ]
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.stdout {
        fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("creating {}", args.out_dir.display()))?;
    }

    for (name, schema) in schemas() {
        let json = serde_json::to_string_pretty(&schema)
            .with_context(|| format!("serializing {name} schema"))?;
        if args.stdout {
            println!("{json}");
            continue;
        }
        let path = args.out_dir.join(format!("{name}.schema.json"));
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
