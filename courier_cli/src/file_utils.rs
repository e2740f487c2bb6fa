use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse {}", path.display()))?;
    Ok(value)
}

/// Pretty JSON to `path`, or to stdout without one.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<(), anyhow::Error> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }

    Ok(())
}
