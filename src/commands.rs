// IPC Bridge - Tauri Command Handlers
// This module contains all commands exposed to the frontend via Tauri's invoke system

use std::sync::Mutex;
use tauri::{command, State};

use crate::session::{Session, Tab, TabStore, TabUpdate};
use crate::storage::{AppSettings, DatabaseManager, KeyValueStore, StorageError};
use crate::workbench::{WorkbenchConfig, WorkbenchEdit};

/// Application state managed by Tauri
pub struct AppState {
    pub session: Mutex<TabStore<DatabaseManager>>,
}

/// Convert StorageError to a string for IPC
impl From<StorageError> for String {
    fn from(err: StorageError) -> Self {
        err.to_string()
    }
}

/// Run a read-only closure against the tab store
fn read_session<T>(
    state: &State<'_, AppState>,
    f: impl FnOnce(&TabStore<DatabaseManager>) -> T,
) -> Result<T, String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    Ok(f(&store))
}

/// Run a mutation and hand back the resulting session.
/// The change is kept in memory even when saving or a tab storage update
/// fails; the UI is told so.
fn mutate_session(
    state: &State<'_, AppState>,
    f: impl FnOnce(&mut TabStore<DatabaseManager>),
) -> Result<Session, String> {
    let mut store = state.session.lock().map_err(|e| e.to_string())?;
    f(&mut store);
    if let Some(err) = store.last_error() {
        return Err(err.to_string());
    }
    Ok(store.session().clone())
}

// ============================================================================
// Session Commands (tab bar / endpoint bar)
// ============================================================================

/// Get the ordered tab list and the active tab id
#[command]
pub fn get_session(state: State<'_, AppState>) -> Result<Session, String> {
    read_session(&state, |store| store.session().clone())
}

/// Get the active tab, if any
#[command]
pub fn get_active_tab(state: State<'_, AppState>) -> Result<Option<Tab>, String> {
    read_session(&state, |store| store.get_active_tab().cloned())
}

/// Open a new default tab and select it
#[command]
pub fn add_tab(state: State<'_, AppState>) -> Result<Session, String> {
    mutate_session(&state, |store| {
        store.add_tab();
    })
}

/// Close a tab
#[command]
pub fn remove_tab(state: State<'_, AppState>, id: String) -> Result<Session, String> {
    mutate_session(&state, |store| store.remove_tab(&id))
}

/// Select a tab
#[command]
pub fn set_active_tab(state: State<'_, AppState>, id: String) -> Result<Session, String> {
    mutate_session(&state, |store| store.set_active_tab(&id))
}

/// Update any of a tab's editable fields
#[command]
pub fn update_tab(
    state: State<'_, AppState>,
    id: String,
    input: TabUpdate,
) -> Result<Session, String> {
    mutate_session(&state, |store| store.update_tab(&id, input))
}

/// Rename a tab (trimmed, blank names ignored)
#[command]
pub fn rename_tab(
    state: State<'_, AppState>,
    id: String,
    title: String,
) -> Result<Session, String> {
    mutate_session(&state, |store| {
        store.rename_tab(&id, &title);
    })
}

/// Clone a tab, including its workbench history
#[command]
pub fn clone_tab(state: State<'_, AppState>, id: String) -> Result<Session, String> {
    mutate_session(&state, |store| {
        store.clone_tab(&id);
    })
}

/// Move a tab to a new position
#[command]
pub fn move_tab(
    state: State<'_, AppState>,
    id: String,
    new_index: i64,
) -> Result<Session, String> {
    mutate_session(&state, |store| {
        // Negative positions are out of range, same as past-the-end ones
        if let Ok(index) = usize::try_from(new_index) {
            store.move_tab(&id, index);
        }
    })
}

#[command]
pub fn move_tab_left(state: State<'_, AppState>, id: String) -> Result<Session, String> {
    mutate_session(&state, |store| store.move_tab_left(&id))
}

#[command]
pub fn move_tab_right(state: State<'_, AppState>, id: String) -> Result<Session, String> {
    mutate_session(&state, |store| store.move_tab_right(&id))
}

// ============================================================================
// Workbench Commands
// ============================================================================

/// Configuration for the workbench showing the active tab
#[command]
pub fn get_workbench_config(
    state: State<'_, AppState>,
) -> Result<Option<WorkbenchConfig>, String> {
    read_session(&state, |store| store.active_workbench_config())
}

/// Query editor changed. Undefined values from the editor are ignored.
#[command]
pub fn edit_tab_query(
    state: State<'_, AppState>,
    tab_id: String,
    query: Option<String>,
) -> Result<Session, String> {
    apply_edit(&state, &tab_id, query.map(WorkbenchEdit::Query))
}

/// Variables editor changed
#[command]
pub fn edit_tab_variables(
    state: State<'_, AppState>,
    tab_id: String,
    variables: Option<String>,
) -> Result<Session, String> {
    apply_edit(&state, &tab_id, variables.map(WorkbenchEdit::Variables))
}

/// Headers editor changed
#[command]
pub fn edit_tab_headers(
    state: State<'_, AppState>,
    tab_id: String,
    headers: Option<String>,
) -> Result<Session, String> {
    apply_edit(&state, &tab_id, headers.map(WorkbenchEdit::Headers))
}

fn apply_edit(
    state: &State<'_, AppState>,
    tab_id: &str,
    edit: Option<WorkbenchEdit>,
) -> Result<Session, String> {
    match edit {
        Some(edit) => mutate_session(state, |store| store.apply_workbench_edit(tab_id, edit)),
        None => read_session(state, |store| store.session().clone()),
    }
}

// ============================================================================
// Tab Storage Commands (backing the workbench's Storage object)
// ============================================================================

// Unknown tab ids read as empty and ignore writes, so no namespace is ever
// created for a tab the session does not have.

#[command]
pub fn tab_storage_get(
    state: State<'_, AppState>,
    tab_id: String,
    key: String,
) -> Result<Option<String>, String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    match store.tab_storage(&tab_id)? {
        Some(storage) => Ok(storage.get_item(&key)?),
        None => Ok(None),
    }
}

#[command]
pub fn tab_storage_set(
    state: State<'_, AppState>,
    tab_id: String,
    key: String,
    value: String,
) -> Result<(), String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    if let Some(storage) = store.tab_storage(&tab_id)? {
        storage.set_item(&key, &value)?;
    }
    Ok(())
}

#[command]
pub fn tab_storage_remove(
    state: State<'_, AppState>,
    tab_id: String,
    key: String,
) -> Result<(), String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    if let Some(storage) = store.tab_storage(&tab_id)? {
        storage.remove_item(&key)?;
    }
    Ok(())
}

#[command]
pub fn tab_storage_clear(state: State<'_, AppState>, tab_id: String) -> Result<(), String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    if let Some(storage) = store.tab_storage(&tab_id)? {
        storage.clear()?;
    }
    Ok(())
}

/// All keys in a tab's namespace, prefix stripped. `key(i)` and `length` on
/// the frontend are derived from this list.
#[command]
pub fn tab_storage_keys(
    state: State<'_, AppState>,
    tab_id: String,
) -> Result<Vec<String>, String> {
    let store = state.session.lock().map_err(|e| e.to_string())?;
    match store.tab_storage(&tab_id)? {
        Some(storage) => Ok(storage.keys()?),
        None => Ok(Vec::new()),
    }
}

// ============================================================================
// App Settings Commands
// ============================================================================

#[command]
pub fn get_app_settings(state: State<'_, AppState>) -> Result<AppSettings, String> {
    read_session(&state, |store| store.settings().clone())
}

#[command]
pub fn update_app_settings(
    state: State<'_, AppState>,
    settings: AppSettings,
) -> Result<(), String> {
    let mut store = state.session.lock().map_err(|e| e.to_string())?;
    Ok(store.set_settings(settings)?)
}
