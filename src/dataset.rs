use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One base record: the `value` object of a dataset line.
pub type BaseRecord = Map<String, Value>;

/// Reads the line-delimited base dataset into memory for cycling.
///
/// Each line must be a JSON object carrying the record under its `value`
/// field; the record itself must be an object (the write loop overwrites
/// its `id`). The first malformed line aborts the whole load with its
/// 1-based line number.
pub fn load_base_dataset(path: &Path) -> Result<Vec<BaseRecord>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::DatasetNotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let parsed: Value = serde_json::from_str(line.trim())
            .map_err(|err| malformed(path, number, err.to_string()))?;
        let mut top = match parsed {
            Value::Object(obj) => obj,
            _ => return Err(malformed(path, number, "line is not a JSON object")),
        };
        let value = top
            .remove("value")
            .ok_or_else(|| malformed(path, number, "missing \"value\" field"))?;
        match value {
            Value::Object(record) => records.push(record),
            _ => return Err(malformed(path, number, "\"value\" is not a JSON object")),
        }
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset(path.to_path_buf()));
    }
    Ok(records)
}

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}
