//! Loading a [`ComponentDb`] from CSV.
//!
//! The header row gives the schema; every following record is a row.
//! Records shorter than the header leave their trailing fields absent,
//! cells beyond the header are ignored.

use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use smol_str::SmolStr;
use tracing::info;

use super::{ComponentDb, Row};
use crate::{Error, Result};

impl ComponentDb {
    /// Read a comma-separated, double-quoted table from `reader`.
    pub fn from_csv_reader(reader: impl io::Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<SmolStr> = reader.headers()?.iter().map(SmolStr::new).collect();
        let mut db = ComponentDb::new(headers.iter().cloned());

        for record in reader.records() {
            let record = record?;
            db.push_row(headers.iter().cloned().zip(record.iter()).collect::<Row>());
        }

        Ok(db)
    }

    /// Read the CSV file at `path`.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        let db = Self::from_csv_reader(io::BufReader::new(file))?;
        info!(
            "loaded {} components with {} fields from {}",
            db.len(),
            db.prop_names().len(),
            path.display()
        );
        Ok(db)
    }
}
