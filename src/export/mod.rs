pub mod json;
pub mod parquet;

pub use self::json::write_view;
pub use self::parquet::{long_form_batch, write_long_form};
