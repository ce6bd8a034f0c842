use anyhow::{Context, Result};
use genmap::{
    config::DashConfig,
    export,
    reshape::long_form,
    DashboardView, Dataset, Selection,
};
use std::{env, fs, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,genmap=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let config = DashConfig::from_env()?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {:?}", config.out_dir))?;

    // ─── 3) load once ────────────────────────────────────────────────
    let start = Instant::now();
    let dataset = Dataset::load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let generations = dataset.generations();
    info!(elapsed = ?start.elapsed(), generations = ?generations, "dataset ready");

    // ─── 4) pick a generation ────────────────────────────────────────
    let generation = config.resolve_generation(env::args().nth(1), &generations)?;
    let selection = Selection::new(generation).with_options(config.view);

    // ─── 5) build + export ───────────────────────────────────────────
    let view = DashboardView::build(&dataset, &selection)?;
    info!(
        generation = %view.generation,
        locations = view.filtered.rows.len(),
        births = view.filtered.total_births(),
        deaths = view.filtered.total_deaths(),
        "built dashboard"
    );
    export::write_view(&view, &config.out_dir)?;
    export::write_long_form(&long_form(&dataset), config.out_dir.join("long_form.parquet"))?;

    info!("all done");
    Ok(())
}
