/// Inline rename state for the key table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: String, working_name: String },
}

impl EditState {
    /// Start editing `id`. An edit already in progress is replaced without
    /// being saved.
    pub fn begin(&mut self, id: &str, current_name: &str) {
        *self = EditState::Editing {
            id: id.to_string(),
            working_name: current_name.to_string(),
        };
    }

    pub fn update(&mut self, text: &str) {
        if let EditState::Editing { working_name, .. } = self {
            *working_name = text.to_string();
        }
    }

    /// Leave editing, handing back the `(id, working_name)` to save.
    pub fn commit(&mut self) -> Option<(String, String)> {
        match std::mem::take(self) {
            EditState::Editing { id, working_name } => Some((id, working_name)),
            EditState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = EditState::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            EditState::Editing { id, .. } => Some(id),
            EditState::Idle => None,
        }
    }

    pub fn working_name(&self) -> Option<&str> {
        match self {
            EditState::Editing { working_name, .. } => Some(working_name),
            EditState::Idle => None,
        }
    }
}
