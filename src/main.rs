use clap::{Args, Parser, Subcommand};
use latex_allocation::io::{reporting, scenarios};
use latex_allocation::{
    logging, ConfigOverrides, DailyInput, DecisionEngine, PlantConfig, RealizedPrices, Result,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily raw-material allocation: process, hold or dispose")]
struct Cli {
    /// JSON file with plant constants (missing keys keep defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OverrideArgs {
    /// Processing capacity per day
    #[arg(long, global = true)]
    capacity: Option<f64>,

    /// Maximum mass held in storage
    #[arg(long, global = true)]
    max_stock: Option<f64>,

    #[arg(long, global = true)]
    max_storage_days: Option<u32>,

    /// Days between processing and finished-product sale
    #[arg(long, global = true)]
    lead_days: Option<u32>,

    #[arg(long, global = true)]
    processing_cost: Option<f64>,

    #[arg(long, global = true)]
    storage_day1_cost: Option<f64>,

    #[arg(long, global = true)]
    storage_day2plus_cost: Option<f64>,

    #[arg(long, global = true)]
    transport_per_batch: Option<f64>,

    #[arg(long, global = true)]
    batch_size: Option<f64>,
}

impl From<&OverrideArgs> for ConfigOverrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            processing_capacity: args.capacity,
            max_stock: args.max_stock,
            max_storage_days: args.max_storage_days,
            processing_lead_days: args.lead_days,
            processing_cost_per_unit: args.processing_cost,
            storage_cost_day1_per_unit: args.storage_day1_cost,
            storage_cost_day2plus_per_unit_per_day: args.storage_day2plus_cost,
            transport_cost_per_batch: args.transport_per_batch,
            batch_size: args.batch_size,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide for a single day's snapshot
    Decide {
        #[arg(long)]
        incoming: f64,
        #[arg(long, default_value_t = 0.0)]
        stock: f64,
        /// Raw material price today
        #[arg(long)]
        fresh_price: f64,
        /// Finished-product price if processed today
        #[arg(long)]
        price_n: Option<f64>,
        /// Finished-product price one day later
        #[arg(long)]
        price_n1: Option<f64>,
        /// Realised finished-product price for the money view (defaults to --price-n)
        #[arg(long)]
        sale_price: Option<f64>,
        #[arg(long, default_value_t = 0)]
        storage_days: u32,
    },
    /// Evaluate every row of a CSV file and write the decisions to another
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "decisions.csv")]
        output: PathBuf,
    },
    /// Generate incoming volumes (normal, or constant) and evaluate each
    Sweep {
        #[arg(long, default_value_t = 100)]
        count: usize,
        /// Use this volume for every scenario instead of a normal draw
        #[arg(long, conflicts_with_all = ["mean", "std_dev"])]
        constant: Option<f64>,
        #[arg(long, default_value_t = 70_000.0)]
        mean: f64,
        #[arg(long, default_value_t = 10_000.0)]
        std_dev: f64,
        #[arg(long, default_value_t = 0.0)]
        stock: f64,
        #[arg(long)]
        fresh_price: f64,
        #[arg(long)]
        price_n: Option<f64>,
        #[arg(long)]
        price_n1: Option<f64>,
        /// Seed for reproducible sweeps
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "sweep.csv")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // 1. SETUP CONFIGURATION
    let base = match &cli.config {
        Some(path) => PlantConfig::from_json_file(path)?,
        None => PlantConfig::default(),
    };
    let config = base.with_overrides(&ConfigOverrides::from(&cli.overrides));
    let engine = DecisionEngine::new(config)?;
    tracing::info!(?config, "plant config ready");

    // 2. DISPATCH
    match cli.command {
        Command::Decide {
            incoming,
            stock,
            fresh_price,
            price_n,
            price_n1,
            sale_price,
            storage_days,
        } => {
            let input = DailyInput {
                incoming_material: incoming,
                current_stock: stock,
                price_fresh_today: fresh_price,
                price_finished_plus_n: price_n,
                price_finished_plus_n_plus_1: price_n1,
            };
            let decision = engine.decide(&input)?;

            println!("=== Decision ===");
            println!("{}", to_json(&decision)?);
            println!("Rationale: {}", decision.rationale);
            println!(
                "Capacity used: {:.1}%",
                decision.capacity_utilization(engine.config())? * 100.0
            );
            if let Ok(storage) = decision.storage_utilization(engine.config()) {
                println!("Storage used: {:.1}%", storage * 100.0);
            }

            if let Some(finished_sale) = sale_price.or(price_n) {
                let prices = RealizedPrices {
                    fresh_today: fresh_price,
                    finished_sale,
                    storage_days,
                };
                let summary = engine.evaluate_financials(&decision, &prices)?;
                println!("\n=== Financials ===");
                println!("{}", to_json(&summary)?);
            }
        }
        Command::Batch { input, output } => {
            let inputs = scenarios::load_inputs_csv(&input)?;
            let outcomes = engine.decide_batch(&inputs);
            let records = reporting::build_records(&inputs, &outcomes);
            reporting::write_decision_log(&output, &records)?;
            report_rejections(&records);
        }
        Command::Sweep {
            count,
            constant,
            mean,
            std_dev,
            stock,
            fresh_price,
            price_n,
            price_n1,
            seed,
            output,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let model = match constant {
                Some(value) => scenarios::SupplyModel::Constant(value),
                None => scenarios::SupplyModel::Normal { mean, std_dev },
            };
            let volumes = model.generate(count, &mut rng)?;
            let template = scenarios::ScenarioTemplate {
                current_stock: stock,
                price_fresh_today: fresh_price,
                future_prices: price_n.zip(price_n1),
            };
            let inputs = scenarios::build_inputs(&volumes, &template);
            let outcomes = engine.decide_batch(&inputs);
            let records = reporting::build_records(&inputs, &outcomes);
            reporting::write_decision_log(&output, &records)?;
            report_rejections(&records);
        }
    }

    Ok(())
}

fn report_rejections(records: &[reporting::DecisionRecord]) {
    let rejected = records.iter().filter(|r| r.error.is_some()).count();
    if rejected > 0 {
        tracing::warn!(rejected, total = records.len(), "some scenarios were rejected");
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
