// src/bin/verify_totals.rs

use anyhow::{Context, Result};
use genmap::{
    config::DashConfig,
    reshape::{check_totals, filter_generation, totals_series},
    Dataset,
};
use std::{env, path::PathBuf, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // 1) Source: first CLI argument, else the configured path
    let data_path = match env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => DashConfig::from_env()?.data_path,
    };
    let dataset = Dataset::load(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))?;

    // 2) Print per-generation sums vs the totals row
    println!(
        "\n{: <12} {:>12} {:>12} {:>12} {:>12}",
        "Generation", "Births", "Total row", "Deaths", "Total row"
    );
    println!("{:-<64}", "");
    for total in totals_series(&dataset) {
        let view = filter_generation(&dataset, &total.generation)?;
        println!(
            "{: <12} {:>12} {:>12} {:>12} {:>12}",
            total.generation,
            view.total_births(),
            total.births.unwrap_or(0),
            view.total_deaths(),
            total.deaths.unwrap_or(0)
        );
    }
    println!(
        "\n{} located rows, {} dropped for missing coordinates",
        dataset.records().len(),
        dataset.dropped_rows()
    );

    // 3) Non-zero exit when any generation disagrees
    let mismatches = check_totals(&dataset)?;
    if !mismatches.is_empty() {
        eprintln!("{} generation(s) disagree with the totals row", mismatches.len());
        exit(1);
    }
    Ok(())
}
