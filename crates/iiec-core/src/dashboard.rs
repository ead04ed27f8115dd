// ── Dashboard state ──
//
// The admin page as a state machine: which tab is open, which record the
// form is editing, and the error banner. Drives `AdminClient` for the
// network side and `FormState` for drafts.

use secrecy::SecretString;
use tracing::debug;

use crate::controller::AdminClient;
use crate::error::CoreError;
use crate::form::{FormKind, FormState};
use crate::model::{Entity, EntityId, EntityKind, Section, User};
use crate::mutation::{Confirm, RemoveOutcome, SaveOutcome};
use crate::registry::descriptor;

/// UI state of the admin dashboard.
#[derive(Debug)]
pub struct Dashboard {
    client: AdminClient,
    active_tab: EntityKind,
    editing_item: Option<EntityId>,
    show_form: bool,
    editing_section: Option<EntityId>,
    show_section_form: bool,
    selected_project_id: Option<EntityId>,
    error: Option<String>,
    form: FormState,
}

impl Dashboard {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            active_tab: EntityKind::default(),
            editing_item: None,
            show_form: false,
            editing_section: None,
            show_section_form: false,
            selected_project_id: None,
            error: None,
            form: FormState::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub fn active_tab(&self) -> EntityKind {
        self.active_tab
    }

    pub fn editing_item(&self) -> Option<EntityId> {
        self.editing_item
    }

    pub fn show_form(&self) -> bool {
        self.show_form
    }

    pub fn editing_section(&self) -> Option<EntityId> {
        self.editing_section
    }

    pub fn show_section_form(&self) -> bool {
        self.show_section_form
    }

    pub fn selected_project_id(&self) -> Option<EntityId> {
        self.selected_project_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Cached records of the active tab.
    pub fn items(&self) -> Vec<Entity> {
        self.client.store().entities(self.active_tab)
    }

    // ── Session ──────────────────────────────────────────────────

    /// Log in and load the active tab.
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        let user = self.client.login(email, password).await?;
        self.client.fetch_collection(self.active_tab).await;
        Ok(user)
    }

    /// Restore a stored session and, if it is still valid, load the
    /// active tab.
    pub async fn open(&mut self) -> Result<User, CoreError> {
        let user = self.client.restore_session().await?;
        self.client.fetch_collection(self.active_tab).await;
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.client.logout();
        self.reset_view();
        self.error = None;
    }

    // ── Tabs ─────────────────────────────────────────────────────

    /// Open `tab`, closing any form and selection, and fetch its records.
    ///
    /// Selecting the tab that is already open does nothing.
    pub async fn switch_tab(&mut self, tab: EntityKind) {
        if tab == self.active_tab {
            return;
        }
        debug!(from = %self.active_tab, to = %tab, "switching tab");
        self.active_tab = tab;
        self.reset_view();
        self.client.fetch_collection(tab).await;
    }

    /// Re-fetch the active tab.
    pub async fn refresh(&mut self) {
        self.client.refresh(self.active_tab).await;
    }

    fn reset_view(&mut self) {
        self.editing_item = None;
        self.show_form = false;
        self.editing_section = None;
        self.show_section_form = false;
        self.selected_project_id = None;
    }

    // ── Entity form ──────────────────────────────────────────────

    /// Open a blank form for the active tab.
    pub fn begin_create(&mut self) {
        self.editing_item = None;
        self.form.reset(self.active_tab.into());
        self.show_form = true;
    }

    /// Open the form on an existing record of the active tab.
    pub fn begin_edit(&mut self, id: EntityId) -> Result<(), CoreError> {
        let item = self
            .client
            .store()
            .get(self.active_tab, id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: descriptor(self.active_tab).label.into(),
                identifier: id.to_string(),
            })?;
        self.form.load(&item);
        self.editing_item = Some(id);
        self.show_form = true;
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.show_form = false;
        self.editing_item = None;
        self.form.reset(self.active_tab.into());
    }

    /// Save the active tab's draft.
    ///
    /// The form closes once the record is in local state, whether the
    /// backend took it or not; a rejected write also raises the banner.
    pub async fn submit(&mut self) -> Result<SaveOutcome<Entity>, CoreError> {
        let draft = self.form.draft(self.active_tab);
        let label = descriptor(self.active_tab).label;

        match self.client.save(&draft, self.editing_item).await {
            Ok(outcome) => {
                self.error = outcome
                    .error()
                    .map(|e| format!("Failed to save {label}: {e}"));
                self.show_form = false;
                self.editing_item = None;
                self.form.reset(self.active_tab.into());
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(&e, &format!("Failed to save {label}"));
                Err(e)
            }
        }
    }

    /// Delete a record of the active tab.
    pub async fn delete(
        &mut self,
        id: EntityId,
        confirm: &impl Confirm,
    ) -> Result<RemoveOutcome, CoreError> {
        let label = descriptor(self.active_tab).label;
        match self.client.remove(self.active_tab, id, confirm).await {
            Ok(outcome) => {
                if let Some(e) = outcome.error() {
                    self.error = Some(format!("Failed to delete {label}: {e}"));
                }
                if self.editing_item == Some(id) {
                    self.cancel_form();
                }
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(&e, &format!("Failed to delete {label}"));
                Err(e)
            }
        }
    }

    // ── Section form ─────────────────────────────────────────────

    /// Expand a project's sections, loading them from the backend.
    pub async fn select_project(&mut self, project_id: EntityId) -> Vec<Section> {
        self.selected_project_id = Some(project_id);
        self.client.fetch_sections(project_id).await
    }

    pub fn begin_section_create(&mut self, project_id: EntityId) {
        self.selected_project_id = Some(project_id);
        self.editing_section = None;
        self.form.reset(FormKind::Sections);
        self.show_section_form = true;
    }

    pub fn begin_section_edit(
        &mut self,
        project_id: EntityId,
        section_id: EntityId,
    ) -> Result<(), CoreError> {
        let section = self
            .client
            .store()
            .section(project_id, section_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "section".into(),
                identifier: section_id.to_string(),
            })?;
        self.form.load_section(&section);
        self.selected_project_id = Some(project_id);
        self.editing_section = Some(section_id);
        self.show_section_form = true;
        Ok(())
    }

    pub fn cancel_section_form(&mut self) {
        self.show_section_form = false;
        self.editing_section = None;
        self.form.reset(FormKind::Sections);
    }

    /// Save the section draft under the selected project.
    pub async fn submit_section(&mut self) -> Result<SaveOutcome<Section>, CoreError> {
        let project_id = self.selected_project_id.ok_or_else(|| CoreError::ValidationFailed {
            message: "no project selected".into(),
        })?;
        let draft = self.form.section().clone();

        match self
            .client
            .save_section(project_id, &draft, self.editing_section)
            .await
        {
            Ok(outcome) => {
                self.error = outcome
                    .error()
                    .map(|e| format!("Failed to save section: {e}"));
                self.cancel_section_form();
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(&e, "Failed to save section");
                Err(e)
            }
        }
    }

    pub async fn delete_section(
        &mut self,
        project_id: EntityId,
        section_id: EntityId,
        confirm: &impl Confirm,
    ) -> Result<RemoveOutcome, CoreError> {
        match self
            .client
            .remove_section(project_id, section_id, confirm)
            .await
        {
            Ok(outcome) => {
                if let Some(e) = outcome.error() {
                    self.error = Some(format!("Failed to delete section: {e}"));
                }
                if self.editing_section == Some(section_id) {
                    self.cancel_section_form();
                }
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(&e, "Failed to delete section");
                Err(e)
            }
        }
    }

    /// Auth failures end the session, so they close everything instead
    /// of raising the banner.
    fn record_failure(&mut self, err: &CoreError, context: &str) {
        if err.is_auth() {
            self.reset_view();
            self.error = None;
        } else {
            self.error = Some(format!("{context}: {err}"));
        }
    }
}
