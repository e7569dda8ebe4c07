use crate::error::AppError;
use crate::model::{Filter, Task};
use crate::store::TaskStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";

/// On-disk layout. Keys are camelCase for compatibility with blobs written
/// by earlier releases of the app.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    tasks: Vec<Task>,
    task_id_counter: u64,
    #[serde(default)]
    current_filter: Filter,
}

#[derive(Debug, Clone)]
pub struct StoreLoad {
    pub store: TaskStore,
    pub error: Option<AppError>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_store(path: &Path) -> Result<TaskStore, AppError> {
    if !path.exists() {
        return Ok(TaskStore::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredState =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    TaskStore::from_parts(stored.tasks, stored.task_id_counter, stored.current_filter)
}

/// Load that never fails the caller: a corrupt or unreadable blob falls back
/// to the empty default store and the error is handed back for reporting.
pub fn load_store_with_fallback(path: &Path) -> StoreLoad {
    match load_store(path) {
        Ok(store) => StoreLoad { store, error: None },
        Err(err) => StoreLoad {
            store: TaskStore::default(),
            error: Some(err),
        },
    }
}

pub fn save_store(path: &Path, store: &TaskStore) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredState {
        tasks: store.tasks().to_vec(),
        task_id_counter: store.task_id_counter(),
        current_filter: store.current_filter(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
