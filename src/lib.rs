// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/

// Module declarations
#[cfg(feature = "desktop")]
pub mod commands;
pub mod session;
pub mod storage;
pub mod workbench;

pub use session::{Session, SessionError, Tab, TabStore, TabUpdate};
pub use storage::{DatabaseManager, KeyValueStore, MemoryStore, StorageError, TabStorage};
pub use workbench::{WorkbenchConfig, WorkbenchEdit};

/// Install the stderr logger. `RUST_LOG` overrides the default `info` filter.
/// Calling it again once a logger is installed does nothing.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::AppState;
    use std::sync::Mutex;
    use storage::{get_default_db_path, init_default_settings};

    init_logging();

    // Initialize the database
    let db_path = get_default_db_path().expect("Failed to get database path");
    log::info!("[Startup] Database path: {:?}", db_path);
    let db_manager = DatabaseManager::new(db_path).expect("Failed to initialize database");

    init_default_settings(&db_manager).expect("Failed to initialize default settings");

    let tab_store = TabStore::load(db_manager).expect("Failed to load session");
    log::info!("[Startup] Loaded {} tab(s)", tab_store.tabs().len());

    let app_state = AppState {
        session: Mutex::new(tab_store),
    };

    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // Session commands
            commands::get_session,
            commands::get_active_tab,
            commands::add_tab,
            commands::remove_tab,
            commands::set_active_tab,
            commands::update_tab,
            commands::rename_tab,
            commands::clone_tab,
            commands::move_tab,
            commands::move_tab_left,
            commands::move_tab_right,
            // Workbench commands
            commands::get_workbench_config,
            commands::edit_tab_query,
            commands::edit_tab_variables,
            commands::edit_tab_headers,
            // Tab storage commands
            commands::tab_storage_get,
            commands::tab_storage_set,
            commands::tab_storage_remove,
            commands::tab_storage_clear,
            commands::tab_storage_keys,
            // App Settings commands
            commands::get_app_settings,
            commands::update_app_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("logger installed");
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(log::max_level() >= log::LevelFilter::Info);
        }
    }
}
