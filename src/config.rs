use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::views::ViewOptions;

/// Names the YAML config file to read.
pub const CONFIG_ENV: &str = "GENMAP_CONFIG";
/// Overrides `data_path` from any config file.
pub const DATA_ENV: &str = "GENMAP_DATA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// CSV source, read once at startup.
    pub data_path: PathBuf,
    /// Where bundles and the long-form table are written.
    pub out_dir: PathBuf,
    /// Generation to show when none is given on the command line.
    pub generation: Option<String>,
    pub view: ViewOptions,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("updated_dodge_data_with_coordinates.csv"),
            out_dir: PathBuf::from("out"),
            generation: None,
            view: ViewOptions::default(),
        }
    }
}

impl DashConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))
    }

    /// Config file named by `GENMAP_CONFIG` (or defaults), then `GENMAP_DATA`.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => {
                info!(path = ?path, "loading config");
                Self::load(PathBuf::from(path))?
            }
            None => {
                debug!("no {} set, using defaults", CONFIG_ENV);
                Self::default()
            }
        };
        if let Some(data) = env::var_os(DATA_ENV) {
            config.data_path = PathBuf::from(data);
        }
        Ok(config)
    }

    /// Generation to show: `requested` (the command line), else the
    /// configured one, else the youngest in `available`. Fails listing
    /// `available` when the choice is not among them.
    pub fn resolve_generation(
        &self,
        requested: Option<String>,
        available: &[String],
    ) -> Result<String> {
        let generation = match requested.or_else(|| self.generation.clone()) {
            Some(g) => g,
            None => match available.first() {
                Some(g) => g.clone(),
                None => bail!("dataset has no generations"),
            },
        };
        if !available.contains(&generation) {
            bail!(
                "generation `{}` is not in the dataset (available: {})",
                generation,
                available.join(", ")
            );
        }
        Ok(generation)
    }
}
