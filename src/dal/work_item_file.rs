use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::work_item::{ItemException, ItemState, WorkItem};

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to access work items at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Work items at {} are not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source of units of work. Releasing takes the item by value, so each item
/// is reported done or failed exactly once.
pub trait WorkQueue {
    fn reserve(&mut self) -> Option<WorkItem>;
    fn release(&mut self, item: WorkItem, state: ItemState) -> Result<(), QueueError>;
}

#[derive(Serialize, Deserialize)]
struct InputEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseState {
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleasedItem {
    pub id: String,
    pub state: ReleaseState,
    pub exception: Option<ItemException>,
}

/// Work items read from a JSON file, results written to another one.
pub struct FileWorkQueue {
    pending: VecDeque<WorkItem>,
    released: Vec<ReleasedItem>,
    output_path: PathBuf,
}

impl FileWorkQueue {
    pub fn open(input_path: &Path, output_path: PathBuf) -> Result<Self, QueueError> {
        let content = std::fs::read_to_string(input_path).map_err(|source| QueueError::Io {
            path: input_path.to_path_buf(),
            source,
        })?;
        let entries: Vec<InputEntry> =
            serde_json::from_str(&content).map_err(|source| QueueError::Json {
                path: input_path.to_path_buf(),
                source,
            })?;

        let pending = entries
            .into_iter()
            .map(|entry| WorkItem {
                id: entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                payload: entry.payload,
            })
            .collect();

        Ok(FileWorkQueue {
            pending,
            released: vec![],
            output_path,
        })
    }

    fn persist(&self) -> Result<(), QueueError> {
        let content =
            serde_json::to_string_pretty(&self.released).map_err(|source| QueueError::Json {
                path: self.output_path.clone(),
                source,
            })?;
        write_file(&self.output_path, &content)
    }
}

impl WorkQueue for FileWorkQueue {
    fn reserve(&mut self) -> Option<WorkItem> {
        self.pending.pop_front()
    }

    fn release(&mut self, item: WorkItem, state: ItemState) -> Result<(), QueueError> {
        let released = match state {
            ItemState::Done => ReleasedItem {
                id: item.id,
                state: ReleaseState::Done,
                exception: None,
            },
            ItemState::Failed(exception) => ReleasedItem {
                id: item.id,
                state: ReleaseState::Failed,
                exception: Some(exception),
            },
        };
        self.released.push(released);
        self.persist()
    }
}

/// Writes payloads as a work-item input file for a later consumer run.
pub fn write_input_items(path: &Path, payloads: Vec<Value>) -> Result<(), QueueError> {
    let entries: Vec<InputEntry> = payloads
        .into_iter()
        .map(|payload| InputEntry {
            id: Some(Uuid::new_v4().to_string()),
            payload,
        })
        .collect();

    let content = serde_json::to_string_pretty(&entries).map_err(|source| QueueError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), QueueError> {
    let io_error = |source| QueueError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, content).map_err(io_error)
}
