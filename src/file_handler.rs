use crate::dataset::{Column, DataFrame};
use crate::error::{BsidesError, Result};

use csv::ReaderBuilder;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct FileHandler;

impl FileHandler {
    ///
    /// # load_columns
    /// Load selected positional columns of a header-less CSV file.
    ///
    /// ## Arguments
    /// * `path` - Path to the CSV file
    /// * `positions` - Zero-based field positions to keep
    /// * `names` - Column name for each position
    ///
    /// ## Errors
    /// * `BsidesError::Io` - If the file is missing or unreadable
    /// * `BsidesError::Csv` - If the CSV is malformed
    /// * `BsidesError::InvalidRow` - If a record is too short
    ///
    /// ## Returns
    /// * `Result<DataFrame>` - One row per record, columns in the order of `names`
    pub fn load_columns<P: AsRef<Path>>(
        path: P,
        positions: &[usize],
        names: &[&str],
    ) -> Result<DataFrame> {
        let path = path.as_ref();
        debug!("Reading columns {positions:?} from {}", path.display());

        let file = File::open(path)?;
        Self::read_columns(file, positions, names)
    }

    ///
    /// # read_columns
    /// Same as `load_columns`, reading from any source.
    pub fn read_columns<R: Read>(
        reader: R,
        positions: &[usize],
        names: &[&str],
    ) -> Result<DataFrame> {
        if positions.len() != names.len() {
            return Err(BsidesError::Other(format!(
                "{} column positions given for {} names",
                positions.len(),
                names.len()
            )));
        }

        let expected = positions.iter().max().map_or(0, |max| max + 1);
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); positions.len()];

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        for record in reader.records() {
            let record = record?;

            if record.len() < expected {
                return Err(BsidesError::InvalidRow {
                    line: record.position().map_or(0, csv::Position::line),
                    expected,
                    found: record.len(),
                });
            }

            for (values, &position) in raw.iter_mut().zip(positions) {
                values.push(record[position].to_string());
            }
        }

        let columns = names
            .iter()
            .zip(&raw)
            .map(|(name, values)| Column::infer(name, values))
            .collect();

        DataFrame::new(columns)
    }
}
