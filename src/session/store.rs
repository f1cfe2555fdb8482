// Tab store: the session plus its persistence
// Every operation runs to completion and then writes the whole session back

use log::{debug, error, info, warn};

use super::model::Session;
use super::tab::{Tab, TabUpdate};
use super::SessionError;
use crate::storage::{
    copy_namespace, tab_storage_prefix, AppSettings, KeyValueStore, StorageError, StorageResult,
    TabStorage,
};

/// Well-known key holding the serialized session
pub const SESSION_KEY: &str = "graphiql-desktop-tabs";

/// An undecodable session record is moved here before a fresh one is written
pub const SESSION_BACKUP_KEY: &str = "graphiql-desktop-tabs.corrupt";

pub struct TabStore<S: KeyValueStore> {
    store: S,
    session: Session,
    settings: AppSettings,
    last_error: Option<SessionError>,
}

impl<S: KeyValueStore> TabStore<S> {
    /// Load the session and settings from `store`.
    ///
    /// A missing record starts a fresh session with one default tab. Tabs with
    /// missing fields keep what they have and take defaults for the rest. A
    /// record that cannot be decoded at all is copied to `SESSION_BACKUP_KEY`
    /// and replaced with a fresh session. Failing to read the store, or to
    /// back up a bad record, is an error and leaves the record untouched.
    pub fn load(store: S) -> Result<Self, SessionError> {
        let settings = AppSettings::load(&store).map_err(SessionError::Load)?;
        let raw = store.get_item(SESSION_KEY).map_err(SessionError::Load)?;

        let session = match raw {
            Some(json) => match serde_json::from_str::<Session>(&json) {
                Ok(mut session) => {
                    if session.normalize() {
                        warn!("Persisted session was inconsistent, repaired on load");
                    }
                    info!("Restored session with {} tab(s)", session.tabs.len());
                    session
                }
                Err(e) => {
                    store
                        .set_item(SESSION_BACKUP_KEY, &json)
                        .map_err(SessionError::Load)?;
                    warn!(
                        "Unreadable session record moved to {}: {}",
                        SESSION_BACKUP_KEY, e
                    );
                    Session::new()
                }
            },
            None => {
                info!("No saved session, starting with a default tab");
                Session::new()
            }
        };

        let mut tab_store = Self {
            store,
            session,
            settings,
            last_error: None,
        };
        tab_store.persist();
        Ok(tab_store)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.session.tabs
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.session.tab(id)
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.session.active_tab_id.as_deref()
    }

    pub fn get_active_tab(&self) -> Option<&Tab> {
        self.session.active_tab()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The error from the most recent operation, if its save or its tab
    /// storage update failed
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Replace the settings and write them to the store
    pub fn set_settings(&mut self, settings: AppSettings) -> StorageResult<()> {
        settings.save(&self.store)?;
        self.settings = settings;
        Ok(())
    }

    pub fn add_tab(&mut self) -> String {
        let id = self.session.add_tab();
        debug!("Added tab {}", id);
        self.persist();
        id
    }

    pub fn remove_tab(&mut self, id: &str) {
        let mut cleared = Ok(0);
        if let Some(removed) = self.session.remove_tab(id) {
            debug!("Removed tab {}", removed.id);
            if self.settings.clear_tab_storage_on_remove {
                cleared = self.store.remove_with_prefix(&tab_storage_prefix(&removed.id));
            }
        }
        self.persist();
        if let Err(e) = cleared {
            error!("Failed to clear storage for removed tab {}: {}", id, e);
            self.record_storage_error(e);
        }
    }

    /// Select a tab; ids not in the session are ignored
    pub fn set_active_tab(&mut self, id: &str) {
        if !self.session.set_active_tab(id) {
            debug!("Ignoring selection of unknown tab {}", id);
        }
        self.persist();
    }

    pub fn update_tab(&mut self, id: &str, update: TabUpdate) {
        self.session.update_tab(id, update);
        self.persist();
    }

    /// Rename a tab. The title is trimmed; blank titles are ignored.
    pub fn rename_tab(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() || self.session.tab(id).is_none() {
            self.persist();
            return false;
        }
        self.update_tab(id, TabUpdate::title(title));
        true
    }

    /// Duplicate a tab, its workbench storage included, and select the copy
    pub fn clone_tab(&mut self, id: &str) -> Option<String> {
        let Some(copy_id) = self.session.clone_tab(id) else {
            self.persist();
            return None;
        };

        let copied = copy_namespace(&self.store, id, &copy_id);
        self.persist();
        match copied {
            Ok(count) => debug!("Cloned tab {} as {} ({} storage keys)", id, copy_id, count),
            Err(e) => {
                error!("Failed to copy storage from tab {} to {}: {}", id, copy_id, e);
                self.record_storage_error(e);
            }
        }
        Some(copy_id)
    }

    pub fn move_tab(&mut self, id: &str, new_index: usize) {
        self.session.move_tab(id, new_index);
        self.persist();
    }

    pub fn move_tab_left(&mut self, id: &str) {
        match self.session.position(id) {
            Some(index) if index > 0 => self.move_tab(id, index - 1),
            _ => self.persist(),
        }
    }

    pub fn move_tab_right(&mut self, id: &str) {
        match self.session.position(id) {
            Some(index) if index + 1 < self.session.tabs.len() => self.move_tab(id, index + 1),
            _ => self.persist(),
        }
    }

    /// Scoped storage for a tab's workbench, or `None` if the session has no
    /// such tab. Nothing is written for unknown ids.
    pub fn tab_storage(&self, id: &str) -> StorageResult<Option<TabStorage<'_, S>>> {
        if self.session.tab(id).is_none() {
            debug!("No storage for unknown tab {}", id);
            return Ok(None);
        }
        TabStorage::new(&self.store, id).map(Some)
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => {
                if self.last_error.take().is_some() {
                    info!("Session saved again after earlier failure");
                }
            }
            Err(e) => {
                error!("{}", e);
                self.last_error = Some(e);
            }
        }
    }

    /// A failed save outranks a failed tab storage update
    fn record_storage_error(&mut self, err: StorageError) {
        if self.last_error.is_none() {
            self.last_error = Some(SessionError::TabStorage(err));
        }
    }

    fn save(&self) -> Result<(), SessionError> {
        let json = serde_json::to_string(&self.session)?;
        self.store.set_item(SESSION_KEY, &json).map_err(SessionError::Save)
    }
}
