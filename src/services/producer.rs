use std::path::Path;

use serde_json::json;

use crate::dal::{
    input_sheet::{read_names, SheetError},
    work_item_file::{write_input_items, QueueError},
};

#[derive(thiserror::Error, Debug)]
pub enum ProduceError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Identical names end up next to each other, groups keep the order in which
/// each name first appears. Blank names are dropped.
pub fn group_names(names: Vec<String>) -> Vec<String> {
    let mut groups: Vec<(String, usize)> = vec![];

    for name in names {
        let name = name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, count)) => *count += 1,
            None => groups.push((name, 1)),
        }
    }

    groups
        .into_iter()
        .flat_map(|(name, count)| std::iter::repeat(name).take(count))
        .collect()
}

/// Turns the input sheet into one work item carrying every name.
/// Returns the number of search phrases written.
pub fn produce_work_items(input_sheet: &Path, output_path: &Path) -> Result<usize, ProduceError> {
    let names = group_names(read_names(input_sheet)?);

    if names.is_empty() {
        log::warn!("No names found in {}", input_sheet.display());
        return Ok(0);
    }

    let count = names.len();
    write_input_items(output_path, vec![json!({"index": 0, "Name": names})])?;
    log::info!(
        "Created a work item with {} search phrases at {}",
        count,
        output_path.display()
    );

    Ok(count)
}
