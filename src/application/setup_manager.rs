//! Setup list management.
//!
//! Create and rename go through a name dialog; delete goes through a
//! confirmation dialog. The manager only decides *when* to call the store
//! and validates input; the store owns the data.

use crate::domain::{is_default_list, AppError, Hook, Result, Setup, SetupDocument, SetupList};

/// Backing store for setup lists. Every handler is required.
pub trait SetupStore {
    /// All lists, default first.
    fn lists(&self) -> Result<Vec<SetupList>>;

    /// Id of the active list.
    fn active_list_id(&self) -> Result<String>;

    /// Create a list and return it. Does not change the active list.
    fn create_list(&mut self, name: &str) -> Result<SetupList>;

    /// Rename a list in place.
    fn rename_list(&mut self, id: &str, name: &str) -> Result<()>;

    /// Delete a list and its hooks.
    fn delete_list(&mut self, id: &str) -> Result<()>;

    /// Switch the active list.
    fn set_active_list(&mut self, id: &str) -> Result<()>;

    /// A list with its hooks.
    fn setup(&self, id: &str) -> Result<Setup>;

    /// Replace the hooks of a list.
    fn replace_hooks(&mut self, id: &str, hooks: &[Hook]) -> Result<()>;
}

/// Which dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Rename { id: String },
    Delete { id: String },
}

/// Store call decided by a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupCommand {
    Created(SetupList),
    Renamed { id: String, name: String },
    Deleted { id: String },
}

/// Dialog-driven controller over a [`SetupStore`].
pub struct SetupManager<S> {
    store: S,
    dialog: Option<DialogMode>,
    input: String,
}

impl<S: SetupStore> SetupManager<S> {
    /// Wrap a store with no dialog open.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            dialog: None,
            input: String::new(),
        }
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Open dialog, if any.
    pub const fn dialog(&self) -> Option<&DialogMode> {
        self.dialog.as_ref()
    }

    /// Current dialog input.
    #[cfg(test)]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Open the create dialog with an empty name.
    pub fn open_create(&mut self) {
        self.dialog = Some(DialogMode::Create);
        self.input.clear();
    }

    /// Open the rename dialog for the active list, pre-filled with its name.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn open_rename(&mut self) -> Result<()> {
        let id = self.store.active_list_id()?;
        self.open_rename_list(&id)
    }

    /// Open the rename dialog for a specific list.
    ///
    /// # Errors
    /// Returns `ListNotFound` for an unknown id.
    pub fn open_rename_list(&mut self, id: &str) -> Result<()> {
        let list = self
            .store
            .lists()?
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::ListNotFound { id: id.to_string() })?;

        self.dialog = Some(DialogMode::Rename { id: list.id });
        self.input = list.name;
        Ok(())
    }

    /// Open the delete confirmation for `id`.
    ///
    /// # Errors
    /// Returns `ProtectedList` for the default list.
    pub fn open_delete(&mut self, id: &str) -> Result<()> {
        if is_default_list(id) {
            return Err(AppError::ProtectedList { id: id.to_string() });
        }
        self.dialog = Some(DialogMode::Delete { id: id.to_string() });
        self.input.clear();
        Ok(())
    }

    /// Replace the dialog input.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Close any open dialog without acting.
    pub fn close(&mut self) {
        self.dialog = None;
        self.input.clear();
    }

    /// Submit the create or rename dialog.
    ///
    /// A blank name is ignored: nothing is delegated, the dialog stays open,
    /// and `Ok(None)` is returned.
    ///
    /// # Errors
    /// Returns the store error; the dialog stays open in that case.
    pub fn submit(&mut self) -> Result<Option<SetupCommand>> {
        let name = self.input.trim().to_string();
        if name.is_empty() {
            tracing::debug!("Ignoring blank list name");
            return Ok(None);
        }

        let command = match &self.dialog {
            Some(DialogMode::Create) => {
                let list = self.store.create_list(&name)?;
                tracing::info!(id = %list.id, name = %list.name, "Created setup list");
                SetupCommand::Created(list)
            }
            Some(DialogMode::Rename { id }) => {
                self.store.rename_list(id, &name)?;
                tracing::info!(%id, %name, "Renamed setup list");
                SetupCommand::Renamed {
                    id: id.clone(),
                    name,
                }
            }
            Some(DialogMode::Delete { .. }) | None => return Ok(None),
        };

        self.close();
        Ok(Some(command))
    }

    /// Confirm the open delete dialog.
    ///
    /// Returns `Ok(None)` if no delete dialog is open.
    ///
    /// # Errors
    /// Returns `ProtectedList` for the default list, or the store error.
    pub fn confirm_delete(&mut self) -> Result<Option<SetupCommand>> {
        let Some(DialogMode::Delete { id }) = self.dialog.clone() else {
            return Ok(None);
        };
        if is_default_list(&id) {
            self.close();
            return Err(AppError::ProtectedList { id });
        }

        self.store.delete_list(&id)?;
        tracing::info!(%id, "Deleted setup list");
        self.close();
        Ok(Some(SetupCommand::Deleted { id }))
    }

    /// Switch the active list.
    ///
    /// # Errors
    /// Returns the store error (for example an unknown id).
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.store.set_active_list(id)?;
        tracing::info!(%id, "Switched active setup list");
        Ok(())
    }

    /// The active list.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn active_list(&self) -> Result<SetupList> {
        let id = self.store.active_list_id()?;
        self.store
            .lists()?
            .into_iter()
            .find(|l| l.id == id)
            .ok_or(AppError::ListNotFound { id })
    }

    /// The active list with its hooks.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn active_setup(&self) -> Result<Setup> {
        let id = self.store.active_list_id()?;
        self.store.setup(&id)
    }

    /// Snapshot the active setup for export.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn export_active(&self) -> Result<SetupDocument> {
        Ok(SetupDocument::from_setup(&self.active_setup()?))
    }

    /// Apply an imported document.
    ///
    /// With `as_new` a new list named after the document is created and made
    /// active; otherwise the active list's hooks are replaced.
    ///
    /// # Errors
    /// Returns `Validation` if a new list would have a blank name, or the
    /// store error.
    pub fn import(&mut self, document: &SetupDocument, as_new: bool) -> Result<SetupList> {
        let target = if as_new {
            let name = document.name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Imported setup has no name"));
            }
            let list = self.store.create_list(name)?;
            self.store.set_active_list(&list.id)?;
            list
        } else {
            self.active_list()?
        };

        self.store.replace_hooks(&target.id, &document.hooks)?;
        tracing::info!(
            id = %target.id,
            hooks = document.hooks.len(),
            "Imported setup"
        );
        Ok(target)
    }

    /// Replace the hooks of the active list.
    ///
    /// # Errors
    /// Returns error if the store fails.
    pub fn update_active_hooks(&mut self, hooks: &[Hook]) -> Result<()> {
        let id = self.store.active_list_id()?;
        self.store.replace_hooks(&id, hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_LIST_ID, DEFAULT_LIST_NAME};
    use std::collections::HashMap;

    /// In-memory store that counts delegated calls.
    struct MemoryStore {
        lists: Vec<SetupList>,
        hooks: HashMap<String, Vec<Hook>>,
        active: String,
        calls: usize,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                lists: vec![SetupList {
                    id: DEFAULT_LIST_ID.into(),
                    name: DEFAULT_LIST_NAME.into(),
                    created_at: None,
                }],
                hooks: HashMap::new(),
                active: DEFAULT_LIST_ID.into(),
                calls: 0,
            }
        }
    }

    impl SetupStore for MemoryStore {
        fn lists(&self) -> Result<Vec<SetupList>> {
            Ok(self.lists.clone())
        }

        fn active_list_id(&self) -> Result<String> {
            Ok(self.active.clone())
        }

        fn create_list(&mut self, name: &str) -> Result<SetupList> {
            self.calls += 1;
            let list = SetupList {
                id: format!("list-{}", self.lists.len()),
                name: name.into(),
                created_at: None,
            };
            self.lists.push(list.clone());
            Ok(list)
        }

        fn rename_list(&mut self, id: &str, name: &str) -> Result<()> {
            self.calls += 1;
            let list = self
                .lists
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or_else(|| AppError::ListNotFound { id: id.into() })?;
            list.name = name.into();
            Ok(())
        }

        fn delete_list(&mut self, id: &str) -> Result<()> {
            self.calls += 1;
            self.lists.retain(|l| l.id != id);
            Ok(())
        }

        fn set_active_list(&mut self, id: &str) -> Result<()> {
            self.calls += 1;
            if !self.lists.iter().any(|l| l.id == id) {
                return Err(AppError::ListNotFound { id: id.into() });
            }
            self.active = id.into();
            Ok(())
        }

        fn setup(&self, id: &str) -> Result<Setup> {
            let list = self
                .lists
                .iter()
                .find(|l| l.id == id)
                .cloned()
                .ok_or_else(|| AppError::ListNotFound { id: id.into() })?;
            Ok(Setup {
                list,
                hooks: self.hooks.get(id).cloned().unwrap_or_default(),
            })
        }

        fn replace_hooks(&mut self, id: &str, hooks: &[Hook]) -> Result<()> {
            self.calls += 1;
            self.hooks.insert(id.into(), hooks.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_create_trims_and_closes() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_create();
        manager.set_input("  Protoss only  ");

        let command = manager.submit().unwrap().unwrap();

        assert!(matches!(command, SetupCommand::Created(ref l) if l.name == "Protoss only"));
        assert!(manager.dialog().is_none());
        assert_eq!(manager.store().lists.len(), 2);
    }

    #[test]
    fn test_blank_name_is_silently_ignored() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_create();
        manager.set_input("   ");

        assert_eq!(manager.submit().unwrap(), None);
        assert_eq!(manager.dialog(), Some(&DialogMode::Create));
        assert_eq!(manager.store().calls, 0);
    }

    #[test]
    fn test_rename_prefills_active_name() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_rename().unwrap();
        assert_eq!(manager.input(), DEFAULT_LIST_NAME);

        manager.set_input("Terran voices");
        manager.submit().unwrap();
        assert_eq!(manager.active_list().unwrap().name, "Terran voices");

        manager.open_rename().unwrap();
        manager.set_input("");
        assert_eq!(manager.submit().unwrap(), None);
        assert_eq!(manager.active_list().unwrap().name, "Terran voices");
    }

    #[test]
    fn test_rename_specific_list() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_create();
        manager.set_input("Zerg");
        manager.submit().unwrap();

        manager.open_rename_list("list-1").unwrap();
        assert_eq!(manager.input(), "Zerg");
        manager.set_input("Swarm");
        manager.submit().unwrap();

        assert_eq!(manager.store().lists[1].name, "Swarm");
        assert_eq!(manager.active_list().unwrap().name, DEFAULT_LIST_NAME);
        assert!(matches!(
            manager.open_rename_list("missing"),
            Err(AppError::ListNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_default_is_blocked() {
        let mut manager = SetupManager::new(MemoryStore::new());

        let err = manager.open_delete(DEFAULT_LIST_ID).unwrap_err();
        assert!(matches!(err, AppError::ProtectedList { .. }));
        assert!(manager.dialog().is_none());

        // Confirmation without an open dialog does nothing.
        assert_eq!(manager.confirm_delete().unwrap(), None);
        assert_eq!(manager.store().lists.len(), 1);
        assert_eq!(manager.store().calls, 0);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_create();
        manager.set_input("Zerg");
        manager.submit().unwrap();

        manager.open_delete("list-1").unwrap();
        assert_eq!(manager.store().lists.len(), 2);

        manager.close();
        assert_eq!(manager.confirm_delete().unwrap(), None);
        assert_eq!(manager.store().lists.len(), 2);

        manager.open_delete("list-1").unwrap();
        let command = manager.confirm_delete().unwrap();
        assert_eq!(
            command,
            Some(SetupCommand::Deleted {
                id: "list-1".into()
            })
        );
        assert_eq!(manager.store().lists.len(), 1);
        assert!(manager.dialog().is_none());
    }

    #[test]
    fn test_set_active() {
        let mut manager = SetupManager::new(MemoryStore::new());
        manager.open_create();
        manager.set_input("Zerg");
        manager.submit().unwrap();

        manager.set_active("list-1").unwrap();
        assert_eq!(manager.active_list().unwrap().name, "Zerg");
        assert!(manager.set_active("missing").is_err());
    }

    #[test]
    fn test_import_replace_and_as_new() {
        let mut manager = SetupManager::new(MemoryStore::new());
        let document = SetupDocument {
            version: 1,
            name: "Shared".into(),
            exported_at: None,
            hooks: Setup::default_hooks(),
        };

        let target = manager.import(&document, false).unwrap();
        assert_eq!(target.id, DEFAULT_LIST_ID);
        assert_eq!(manager.active_setup().unwrap().hooks.len(), 4);

        let target = manager.import(&document, true).unwrap();
        assert_eq!(target.name, "Shared");
        assert_eq!(manager.active_list().unwrap().id, target.id);

        let blank = SetupDocument {
            name: " ".into(),
            ..document
        };
        assert!(matches!(
            manager.import(&blank, true),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_export_active() {
        let manager = SetupManager::new(MemoryStore::new());
        let doc = manager.export_active().unwrap();
        assert_eq!(doc.name, DEFAULT_LIST_NAME);
        assert!(doc.exported_at.is_some());
    }
}
