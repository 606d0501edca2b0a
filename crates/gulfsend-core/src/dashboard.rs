use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::api_key::{masked, ApiKey, DEFAULT_KEY_PREFIX};
use crate::clipboard::Clipboard;
use crate::copy::{CopyEvent, CopyFeedback, CopyOutcome, DEFAULT_COPY_FEEDBACK};
use crate::edit::EditState;
use crate::error::DashboardError;
use crate::notify::{Notification, Notifier};
use crate::plan::{Plan, PlanUsage};
use crate::registry::ApiKeyRegistry;

pub const COPY_SUCCESS_MESSAGE: &str = "API key copied to clipboard";
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy API key";
pub const RENAME_SUCCESS_MESSAGE: &str = "API key name updated";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Prefix for generated secrets and for the masked placeholder.
    pub key_prefix: String,
    /// How long a key stays flagged as copied.
    pub copy_feedback: Duration,
    pub plan: Plan,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.into(),
            copy_feedback: DEFAULT_COPY_FEEDBACK,
            plan: Plan::default(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.copy_feedback.is_zero() {
            return Err(DashboardError::InvalidInput(
                "copy feedback delay must be greater than zero".into(),
            ));
        }
        if self.plan.monthly_limit == 0 {
            return Err(DashboardError::InvalidInput(
                "plan limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Session state for the API-key screen.
///
/// Owns the registry plus the per-session selection: which key is revealed,
/// which was just copied and which is being renamed. The three are
/// independent of each other.
pub struct Dashboard {
    registry: ApiKeyRegistry,
    plan: Plan,
    revealed: Option<String>,
    copy: CopyFeedback,
    edit: EditState,
    clipboard: Arc<dyn Clipboard>,
    notifier: Box<dyn Notifier>,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        registry: ApiKeyRegistry,
        clipboard: Arc<dyn Clipboard>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            registry,
            plan: config.plan,
            revealed: None,
            copy: CopyFeedback::new(config.copy_feedback),
            edit: EditState::default(),
            clipboard,
            notifier,
        }
    }

    pub fn registry(&self) -> &ApiKeyRegistry {
        &self.registry
    }

    pub fn list(&self) -> &[ApiKey] {
        self.registry.list()
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn plan_usage(&self) -> PlanUsage {
        PlanUsage::from_registry(&self.plan, &self.registry)
    }

    //  Registry

    pub fn create_key(&mut self, name: &str) -> ApiKey {
        self.registry.create(name)
    }

    pub fn delete_key(&mut self, id: &str) {
        self.registry.delete(id);
        if self.revealed.as_deref() == Some(id) {
            self.revealed = None;
        }
    }

    pub fn rename_key(&mut self, id: &str, new_name: &str) {
        self.registry.rename(id, new_name);
    }

    //  Visibility

    /// Toggle `id`. Revealing one key masks whichever was revealed before.
    /// Returns whether `id` is revealed afterwards.
    pub fn reveal(&mut self, id: &str) -> bool {
        if self.revealed.as_deref() == Some(id) {
            self.revealed = None;
        } else {
            self.revealed = Some(id.to_string());
        }
        debug!(id, revealed = self.revealed.is_some(), "toggled key visibility");
        self.revealed.is_some()
    }

    pub fn revealed_id(&self) -> Option<&str> {
        self.revealed.as_deref()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.as_deref() == Some(id)
    }

    /// Text for the key column: the secret when revealed, the fixed mask
    /// otherwise.
    pub fn display_secret(&self, key: &ApiKey) -> String {
        if self.is_revealed(&key.id) {
            key.secret.clone()
        } else {
            masked(key.secret_prefix(self.registry.key_prefix()))
        }
    }

    //  Clipboard

    /// Start copying the secret of `id`. The copied flag and the toast are
    /// applied later, when the write result comes back through `pump` or
    /// `settle`.
    pub fn copy(&mut self, id: &str) -> Result<(), DashboardError> {
        let secret = self
            .registry
            .get(id)
            .map(|k| k.secret.clone())
            .ok_or_else(|| DashboardError::NotFound(format!("api key {id}")))?;
        self.copy.start(id, secret, Arc::clone(&self.clipboard));
        Ok(())
    }

    pub fn copied_id(&self) -> Option<&str> {
        self.copy.copied_id()
    }

    pub fn is_copied(&self, id: &str) -> bool {
        self.copy.copied_id() == Some(id)
    }

    /// True while a copy is in flight or a copied flag is waiting to revert.
    pub fn needs_polling(&self) -> bool {
        self.copy.is_active()
    }

    /// Apply every copy event that is already waiting. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.copy.try_next() {
            self.apply_copy_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next copy event and apply it.
    pub async fn settle(&mut self) -> Option<CopyOutcome> {
        let event = self.copy.next_event().await?;
        Some(self.apply_copy_event(event))
    }

    fn apply_copy_event(&mut self, event: CopyEvent) -> CopyOutcome {
        let outcome = self.copy.apply(event);
        match &outcome {
            CopyOutcome::Copied { .. } => {
                self.notifier
                    .notify(Notification::success(COPY_SUCCESS_MESSAGE));
            }
            CopyOutcome::Failed { .. } => {
                self.notifier.notify(Notification::error(COPY_FAILURE_MESSAGE));
            }
            CopyOutcome::Reverted { .. } | CopyOutcome::Stale => {}
        }
        outcome
    }

    //  Rename

    pub fn begin_edit(&mut self, id: &str, current_name: &str) {
        self.edit.begin(id, current_name);
    }

    pub fn update_working_name(&mut self, text: &str) {
        self.edit.update(text);
    }

    pub fn commit_edit(&mut self) {
        if let Some((id, name)) = self.edit.commit() {
            self.registry.rename(&id, &name);
            self.notifier
                .notify(Notification::success(RENAME_SUCCESS_MESSAGE));
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::seed::seed_keys;

    fn dashboard() -> (Dashboard, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel();
        let registry = ApiKeyRegistry::with_keys(DEFAULT_KEY_PREFIX, seed_keys());
        let dash = Dashboard::new(
            DashboardConfig::default(),
            registry,
            Arc::new(MemoryClipboard::new()),
            Box::new(tx),
        );
        (dash, rx)
    }

    #[test]
    fn reveal_toggles_twice() {
        let (mut dash, _rx) = dashboard();
        assert!(dash.reveal("1"));
        assert!(!dash.reveal("1"));
        assert_eq!(dash.revealed_id(), None);
    }

    #[test]
    fn reveal_is_exclusive() {
        let (mut dash, _rx) = dashboard();
        dash.reveal("1");
        dash.reveal("2");
        assert!(!dash.is_revealed("1"));
        assert!(dash.is_revealed("2"));
    }

    #[test]
    fn display_secret_masks_hidden_keys() {
        let (mut dash, _rx) = dashboard();
        let key = dash.list()[0].clone();
        assert_eq!(dash.display_secret(&key), "tvly-************************");
        dash.reveal(&key.id);
        assert_eq!(dash.display_secret(&key), key.secret);
    }

    #[test]
    fn mask_keeps_each_key_own_prefix() {
        let (tx, _rx) = mpsc::channel();
        let config = DashboardConfig {
            key_prefix: "sk-".into(),
            ..Default::default()
        };
        let registry = ApiKeyRegistry::with_keys("sk-", seed_keys());
        let mut dash = Dashboard::new(
            config,
            registry,
            Arc::new(MemoryClipboard::new()),
            Box::new(tx),
        );
        let seeded = dash.list()[0].clone();
        assert_eq!(dash.display_secret(&seeded), "tvly-************************");
        let created = dash.create_key("fresh");
        assert_eq!(dash.display_secret(&created), "sk-************************");
    }

    #[test]
    fn delete_clears_reveal_of_that_key() {
        let (mut dash, _rx) = dashboard();
        dash.reveal("3");
        dash.delete_key("3");
        assert_eq!(dash.revealed_id(), None);
        assert!(dash.registry().get("3").is_none());
    }

    #[test]
    fn commit_edit_renames_and_notifies() {
        let (mut dash, rx) = dashboard();
        dash.begin_edit("1", "default");
        dash.update_working_name("prod");
        dash.commit_edit();
        assert_eq!(dash.list()[0].name, "prod");
        assert!(!dash.edit_state().is_editing());
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::success(RENAME_SUCCESS_MESSAGE)
        );
    }

    #[test]
    fn cancel_edit_leaves_name() {
        let (mut dash, rx) = dashboard();
        dash.begin_edit("1", "default");
        dash.update_working_name("prod");
        dash.cancel_edit();
        assert_eq!(dash.list()[0].name, "default");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn commit_when_idle_does_nothing() {
        let (mut dash, rx) = dashboard();
        let before = dash.list().to_vec();
        dash.commit_edit();
        assert_eq!(dash.list(), before.as_slice());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn copy_unknown_key_is_not_found() {
        let (mut dash, _rx) = dashboard();
        let err = dash.copy("missing").unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
        assert!(!dash.needs_polling());
    }

    #[test]
    fn config_validation() {
        assert!(DashboardConfig::default().validate().is_ok());

        let zero_delay = DashboardConfig {
            copy_feedback: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            zero_delay.validate(),
            Err(DashboardError::InvalidInput(_))
        ));

        let mut zero_limit = DashboardConfig::default();
        zero_limit.plan.monthly_limit = 0;
        assert!(zero_limit.validate().is_err());
    }
}
