use chrono::Local;
use serde_json::Value;
use std::path::Path;

pub fn read_json(path: impl AsRef<Path>) -> Result<Value, anyhow::Error> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}

/// Two-space indentation, non-ASCII left as-is, trailing newline.
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn timestamp() -> String {
    Local::now().format("%Y/%m/%d %H:%M:%S").to_string()
}
