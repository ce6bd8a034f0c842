//! Generation-aware reshaping of genealogical migration records into
//! chart-ready views.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod reshape;
pub mod roman;
pub mod session;
pub mod views;

pub use dataset::Dataset;
pub use error::{DashError, Result};
pub use views::{DashboardView, Selection, ViewOptions};
