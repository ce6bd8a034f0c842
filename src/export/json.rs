use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::views::DashboardView;

#[derive(Serialize)]
struct Bundle<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    view: &'a DashboardView,
}

/// File name used for a generation's bundle.
pub fn bundle_file_name(generation: &str) -> String {
    format!("dashboard_gen_{}.json", generation)
}

/// Write `view` as pretty JSON into `out_dir`, returning the file path.
pub fn write_view<P: AsRef<Path>>(view: &DashboardView, out_dir: P) -> Result<PathBuf> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;

    let path = out_dir.join(bundle_file_name(&view.generation));
    let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
    let bundle = Bundle {
        generated_at: Utc::now(),
        view,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &bundle)
        .with_context(|| format!("writing {:?}", path))?;

    info!(path = %path.display(), "wrote dashboard bundle");
    Ok(path)
}
