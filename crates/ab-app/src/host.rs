use ab_core::error::MenuError;
use ab_core::traits::{EntryId, MenuAction, MenuHost};

/// One row of the terminal menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: EntryId,
    pub label: String,
    pub action: MenuAction,
}

/// Terminal menu host: entries in registration order and a highlighted row.
///
/// Rejects a second entry for the same action, and any registration once
/// closed.
#[derive(Debug, Default)]
pub struct TuiMenuHost {
    entries: Vec<MenuEntry>,
    selected: usize,
    next_id: usize,
    closed: bool,
}

impl TuiMenuHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Index de la ligne en surbrillance.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected)
    }

    /// Highlight `index`. Returns `false` if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.entries.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Refuse toute nouvelle entrée.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl MenuHost for TuiMenuHost {
    fn add_entry(&mut self, label: &str, action: MenuAction) -> Result<EntryId, MenuError> {
        if self.closed {
            return Err(MenuError::HostUnavailable("menu fermé".to_string()));
        }
        if self.entries.iter().any(|e| e.action == action) {
            return Err(MenuError::HostUnavailable(format!(
                "entrée {action:?} déjà enregistrée"
            )));
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(MenuEntry {
            id,
            label: label.to_string(),
            action,
        });
        Ok(id)
    }

    fn set_text(&mut self, entry: EntryId, label: &str) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.id == entry) {
            label.clone_into(&mut e.label);
        }
    }

    fn remove_entry(&mut self, entry: EntryId) {
        self.entries.retain(|e| e.id != entry);
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }
}
