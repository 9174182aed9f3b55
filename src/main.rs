//! Property Insurance CLI
//!
//! Command-line interface for previewing premium estimates, pricing a file
//! of deals, and inspecting the active rate table

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use property_insurance::{
    batch::{self, BatchRunner},
    property::{load_deals, FieldValue, RawEstimateInput, RawRiskFlags},
    EstimateOutput, InsuranceEstimator, RateTables, ValidationContext,
};

#[derive(Parser)]
#[command(name = "property-insurance", version, about = "Property insurance premium estimator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the premium for a single property
    Estimate(EstimateArgs),
    /// Price every deal in a CSV file
    Batch(BatchArgs),
    /// Print the active rate table as JSON
    Rates(RatesArgs),
}

#[derive(Args)]
struct PricingArgs {
    /// JSON rate table to use instead of the standard one
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Reference year for the year-built range check (default: current year)
    #[arg(long)]
    as_of_year: Option<i32>,
}

impl PricingArgs {
    fn estimator(&self) -> anyhow::Result<InsuranceEstimator> {
        match &self.rates {
            Some(path) => {
                let tables = RateTables::from_json_path(path)
                    .with_context(|| format!("failed to load rate table {}", path.display()))?;
                Ok(InsuranceEstimator::new(tables)?)
            }
            None => Ok(InsuranceEstimator::standard()),
        }
    }

    fn context(&self) -> ValidationContext {
        self.as_of_year
            .map(ValidationContext::as_of)
            .unwrap_or_else(ValidationContext::current)
    }
}

/// Field values are taken as text and go through the same validation as the deal form
#[derive(Args)]
struct EstimateArgs {
    /// Living area in square feet
    #[arg(long)]
    sqft: Option<String>,

    #[arg(long)]
    year_built: Option<String>,

    /// owner, rental or vacant
    #[arg(long)]
    occupancy: Option<String>,

    /// Roof age in years
    #[arg(long)]
    roof_age: Option<String>,

    /// frame, masonry or unknown
    #[arg(long)]
    construction: Option<String>,

    /// 1000, 2500 or 5000
    #[arg(long)]
    deductible: Option<String>,

    /// Replacement cost to use instead of sqft x cost per sqft
    #[arg(long)]
    replacement_cost: Option<String>,

    #[arg(long)]
    flood: bool,

    #[arg(long)]
    wildfire: bool,

    #[arg(long)]
    hurricane: bool,

    #[arg(long)]
    hail: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    pricing: PricingArgs,
}

impl EstimateArgs {
    fn raw_input(&self) -> RawEstimateInput {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
        RawEstimateInput {
            sqft: text(&self.sqft),
            year_built: text(&self.year_built),
            occupancy: text(&self.occupancy),
            roof_age_years: text(&self.roof_age),
            construction: text(&self.construction),
            deductible: text(&self.deductible),
            replacement_cost_override: text(&self.replacement_cost),
            risk_flags: RawRiskFlags {
                flood: Some(self.flood.into()),
                wildfire: Some(self.wildfire.into()),
                hurricane: Some(self.hurricane.into()),
                hail: Some(self.hail.into()),
            },
            ..Default::default()
        }
    }
}

#[derive(Args)]
struct BatchArgs {
    /// CSV file of deals (dealId, sqft, yearBuilt, ... columns)
    #[arg(long)]
    input: PathBuf,

    /// Where to write results (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    pricing: PricingArgs,
}

#[derive(Args)]
struct RatesArgs {
    /// JSON rate table to check and print instead of the standard one
    #[arg(long)]
    rates: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Estimate(args) => run_estimate(&args),
        Command::Batch(args) => run_batch(&args),
        Command::Rates(args) => run_rates(&args),
    }
}

fn run_estimate(args: &EstimateArgs) -> anyhow::Result<ExitCode> {
    let estimator = args.pricing.estimator()?;
    let ctx = args.pricing.context();

    let output = match estimator.estimate(&args.raw_input(), &ctx) {
        Ok(output) => output,
        Err(errors) => {
            eprintln!("Preview unavailable:");
            for error in errors.iter() {
                eprintln!("  {}: {}", error.field(), error);
            }
            return Ok(ExitCode::from(2));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_estimate(&output);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_estimate(output: &EstimateOutput) {
    let b = &output.breakdown;

    println!("Insurance Estimate");
    println!("==================\n");
    println!("  Annual premium:   ${:.2}", output.rounded_annual());
    println!("  Monthly premium:  ${:.2}", output.rounded_monthly());
    println!();
    println!("Breakdown:");
    println!("  Replacement cost: ${:.2}", output.replacement_cost);
    println!("  Cost per sqft:    ${:.2}", b.cost_per_sqft);
    println!("  Base rate:        {:.4}%", b.base_rate * 100.0);
    if b.base_rate_adjustments.is_empty() {
        println!("  Adjustments:      none");
    } else {
        for label in &b.base_rate_adjustments {
            println!("  Adjustment:       {}", label);
        }
    }
    println!("  Occupancy:        x{:.4}", b.occupancy_multiplier);
    println!("  Deductible:       x{:.4}", b.deductible_multiplier);
    println!("  Risk:             x{:.4}", b.risk_multiplier);
}

fn run_batch(args: &BatchArgs) -> anyhow::Result<ExitCode> {
    let deals = load_deals(&args.input)
        .with_context(|| format!("failed to load deals from {}", args.input.display()))?;
    let runner = BatchRunner::new(args.pricing.estimator()?, args.pricing.context());

    let outcomes = runner.run(&deals);
    let summary = batch::summarize(&outcomes);

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            batch::write_outcomes(file, &outcomes)?;
        }
        None => batch::write_outcomes(io::stdout().lock(), &outcomes)?,
    }

    eprintln!(
        "{} estimated, {} rejected, total annual ${:.2}, total monthly ${:.2}",
        summary.estimated, summary.rejected, summary.total_annual, summary.total_monthly
    );
    Ok(ExitCode::SUCCESS)
}

fn run_rates(args: &RatesArgs) -> anyhow::Result<ExitCode> {
    let tables = match &args.rates {
        Some(path) => RateTables::from_json_path(path)
            .with_context(|| format!("failed to load rate table {}", path.display()))?,
        None => RateTables::standard(),
    };
    println!("{}", tables.to_json_pretty()?);
    Ok(ExitCode::SUCCESS)
}
