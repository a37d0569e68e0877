//! Cotizador System CLI
//!
//! Computes the quote collection for one premium and prints the summary
//! table, optionally rendering and uploading the chart image.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use cotizador_system::periods::loader;
use cotizador_system::render::{SvgChartRenderer, TmpfilesClient};
use cotizador_system::{CacheRegistry, CollectionParams, CollectionService, PeriodTable, Sex};

#[derive(Debug, Parser)]
#[command(name = "cotizador", about = "Savings-plan quote collections")]
struct Args {
    /// Monthly premium
    #[arg(long, default_value_t = 300.0)]
    premium: f64,

    /// Actuarial age of the client
    #[arg(long, default_value_t = 18)]
    age: u8,

    /// Sex of the client (M or F)
    #[arg(long, default_value = "M")]
    sex: Sex,

    /// Product name
    #[arg(long, default_value = "RUMBO")]
    product: String,

    /// Period-configuration JSON file; the built-in catalogue is used if absent
    #[arg(long)]
    periods: Option<PathBuf>,

    /// Output directory for the rendered chart
    #[arg(long, default_value = "db")]
    output_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_image: bool,

    /// Upload the rendered chart to the temporary file host
    #[arg(long)]
    upload: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Cotizador System v0.1.0");
    println!("=======================\n");

    let table = match &args.periods {
        Some(path) => loader::load_periods_json(path).map_err(|err| {
            anyhow::anyhow!(
                "could not load period configuration from {}: {}",
                path.display(),
                err
            )
        })?,
        None => PeriodTable::default_table(),
    };

    let mut renderer = SvgChartRenderer::new(&args.output_dir);
    if args.upload {
        renderer = renderer.with_uploader(TmpfilesClient::new());
    }

    let caches = Arc::new(CacheRegistry::new());
    let mut service = CollectionService::new(Arc::new(table), caches);
    if !args.no_image {
        service = service.with_renderer(Arc::new(renderer));
    }

    let params = CollectionParams {
        actuarial_age: args.age,
        sex: args.sex,
        monthly_premium: args.premium,
    };
    let collection = service.create_collection(&args.product, &params, !args.no_image, true)?;

    if collection.count == 0 {
        println!("No payment terms configured for premium {:.2}", args.premium);
        return Ok(());
    }

    println!(
        "Product: {}  Premium: {:.2}/month  Age: {}  Sex: {}\n",
        args.product,
        collection.premium,
        args.age,
        args.sex.as_str()
    );
    println!(
        "{:>5} {:>14} {:>14} {:>12} {:>12} {:>10} {:>8}",
        "Years", "Contribution", "Payout", "Gain", "Profit.", "Return %", "TREA %"
    );
    println!("{}", "-".repeat(81));

    for quote in &collection.quotes {
        let detail = &quote.detail;
        println!(
            "{:>5} {:>14} {:>14} {:>12} {:>12} {:>10} {:>8}",
            quote.term,
            detail.total_contribution,
            detail.total_payout,
            detail.total_gain,
            detail.profitability,
            detail.return_percentage,
            detail.effective_annual_rate,
        );
    }

    if let Some(url) = &collection.image_url {
        println!("\nCollection image: {}", url);
    }

    Ok(())
}
