use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::merge::merge_tables;
use crate::model::{MergedOutput, Table};

fn write_merged<W: Write>(
    writer: &mut csv::Writer<W>,
    merged: &MergedOutput,
) -> Result<(), ExtractError> {
    writer.write_record(&merged.headers)?;
    for row in &merged.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, tables: &[Table], delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_merged(&mut writer, &merge_tables(tables))
}

pub fn write_csv_to_string(tables: &[Table], delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_merged(&mut writer, &merge_tables(tables))?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
