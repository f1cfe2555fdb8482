// Session: the ordered tab list plus the active tab pointer
// Pure state transitions; persistence is layered on top by TabStore

use serde::{Deserialize, Serialize};

use super::tab::{Tab, TabUpdate};

/// The unit of persistence.
///
/// `tabs` is never empty and `active_tab_id`, when set, names one of `tabs`.
/// Every method here preserves both; `normalize` restores them for data read
/// from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
}

impl Session {
    /// A session with a single default tab, selected
    pub fn new() -> Self {
        let tab = Tab::new();
        Self {
            active_tab_id: Some(tab.id.clone()),
            tabs: vec![tab],
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    /// Append a default tab and select it
    pub fn add_tab(&mut self) -> String {
        let tab = Tab::new();
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = Some(id.clone());
        id
    }

    /// Remove a tab, returning it if it existed.
    ///
    /// Removing the last tab leaves one fresh default tab behind. Removing the
    /// active tab selects whatever is first afterwards.
    pub fn remove_tab(&mut self, id: &str) -> Option<Tab> {
        let index = self.position(id)?;
        let removed = self.tabs.remove(index);

        if self.tabs.is_empty() {
            let tab = Tab::new();
            self.active_tab_id = Some(tab.id.clone());
            self.tabs.push(tab);
        } else if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = Some(self.tabs[0].id.clone());
        }

        Some(removed)
    }

    /// Select a tab. Unknown ids are ignored.
    pub fn set_active_tab(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.active_tab_id = Some(id.to_string());
        true
    }

    pub fn update_tab(&mut self, id: &str, update: TabUpdate) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => {
                tab.apply(update);
                true
            }
            None => false,
        }
    }

    /// Insert a copy of `id` right after it and select the copy
    pub fn clone_tab(&mut self, id: &str) -> Option<String> {
        let index = self.position(id)?;
        let copy = self.tabs[index].duplicate();
        let copy_id = copy.id.clone();
        self.tabs.insert(index + 1, copy);
        self.active_tab_id = Some(copy_id.clone());
        Some(copy_id)
    }

    /// Move a tab to `new_index` (remove, then insert). Out-of-range targets
    /// and unknown ids leave the order untouched.
    pub fn move_tab(&mut self, id: &str, new_index: usize) -> bool {
        if new_index >= self.tabs.len() {
            return false;
        }
        let Some(current) = self.position(id) else {
            return false;
        };
        if current == new_index {
            return true;
        }
        let tab = self.tabs.remove(current);
        self.tabs.insert(new_index, tab);
        true
    }

    /// Restore the invariants on a session read from storage.
    /// Returns true if anything had to change.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.tabs.is_empty() {
            self.tabs.push(Tab::new());
            changed = true;
        }

        if self.active_tab().is_none() {
            self.active_tab_id = Some(self.tabs[0].id.clone());
            changed = true;
        }

        changed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
