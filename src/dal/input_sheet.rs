use std::{io::Read, path::Path};

use thiserror::Error;

const NAME_COLUMN: &str = "Name";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to read input sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("Input sheet has no `Name` column")]
    MissingNameColumn,
}

pub fn read_names(path: &Path) -> Result<Vec<String>, SheetError> {
    let reader = csv::Reader::from_path(path)?;
    names_from_reader(reader)
}

fn names_from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<String>, SheetError> {
    let name_index = reader
        .headers()?
        .iter()
        .position(|header| header.trim() == NAME_COLUMN)
        .ok_or(SheetError::MissingNameColumn)?;

    let mut names = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(name) = row.get(name_index) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}
