use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, StringArray, UInt32Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::reshape::LongFormEntry;

pub fn long_form_schema() -> Schema {
    Schema::new(vec![
        Field::new("location", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("generation", DataType::Utf8, false),
        Field::new("births", DataType::UInt32, false),
        Field::new("deaths", DataType::UInt32, true),
    ])
}

/// Columnar copy of the long form; missing deaths become nulls.
pub fn long_form_batch(entries: &[LongFormEntry]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            entries.iter().map(|e| e.location.as_str()),
        )),
        Arc::new(Float64Array::from_iter_values(entries.iter().map(|e| e.latitude))),
        Arc::new(Float64Array::from_iter_values(entries.iter().map(|e| e.longitude))),
        Arc::new(StringArray::from_iter_values(
            entries.iter().map(|e| e.generation.as_str()),
        )),
        Arc::new(UInt32Array::from_iter_values(entries.iter().map(|e| e.births))),
        Arc::new(entries.iter().map(|e| e.deaths).collect::<UInt32Array>()),
    ];
    RecordBatch::try_new(Arc::new(long_form_schema()), columns)
        .context("building long form record batch")
}

/// Write the long form to a Snappy-compressed Parquet file at `path`.
pub fn write_long_form<P: AsRef<Path>>(entries: &[LongFormEntry], path: P) -> Result<()> {
    let path = path.as_ref();
    let batch = long_form_batch(entries)?;

    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for long form")?;
    writer.write(&batch).context("writing long form batch")?;
    writer.close().context("closing long form writer")?;

    info!(path = %path.display(), rows = entries.len(), "wrote long form parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::reshape::long_form;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    #[test]
    fn batch_keeps_missing_deaths_null() -> Result<()> {
        let ds = fixtures::migration();
        let batch = long_form_batch(&long_form(&ds))?;
        assert_eq!(batch.num_rows(), 4);

        let deaths = batch
            .column(5)
            .as_any()
            .downcast_ref::<UInt32Array>()
            .unwrap();
        // Salem, generation II has an empty death cell
        assert!(deaths.is_null(0));
        assert_eq!(deaths.value(1), 1);
        Ok(())
    }

    #[test]
    fn parquet_round_trip_row_count() -> Result<()> {
        let ds = fixtures::migration();
        let dir = tempdir()?;
        let path = dir.path().join("long_form.parquet");
        write_long_form(&long_form(&ds), &path)?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let mut rows = 0;
        for batch in reader {
            rows += batch?.num_rows();
        }
        assert_eq!(rows, 4);
        Ok(())
    }
}
