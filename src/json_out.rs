use std::io::Write;

use crate::error::ExtractError;
use crate::model::DocumentTables;

pub fn write_json<W: Write>(writer: W, result: &DocumentTables) -> Result<(), ExtractError> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

pub fn write_json_to_string(result: &DocumentTables) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(result)?)
}
