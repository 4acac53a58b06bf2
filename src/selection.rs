//! Hover-preview vs. click-locked inspection.
//!
//! Hovering a marker previews it; clicking pins it so the detail panel can be
//! used without being replaced as the pointer crosses neighbouring markers.

use crate::record::RecordId;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    None,
    Hovering(RecordId),
    Locked(RecordId),
}

impl SelectionState {
    pub fn record(&self) -> Option<&RecordId> {
        match self {
            SelectionState::None => None,
            SelectionState::Hovering(id) | SelectionState::Locked(id) => Some(id),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, SelectionState::Locked(_))
    }
}

/// What the detail view should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Display(RecordId),
    Hide,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Preview a record. Has no effect while a record is locked.
    pub fn hover(&mut self, id: &RecordId) -> SelectionOutcome {
        if self.state.is_locked() {
            return SelectionOutcome::Ignored;
        }
        self.state = SelectionState::Hovering(id.clone());
        SelectionOutcome::Display(id.clone())
    }

    /// Lock onto a record, replacing any current selection.
    pub fn click(&mut self, id: &RecordId) -> SelectionOutcome {
        debug!(%id, "selection locked");
        self.state = SelectionState::Locked(id.clone());
        SelectionOutcome::Display(id.clone())
    }

    /// Leave the locked state and hide the detail view.
    pub fn exit(&mut self) -> SelectionOutcome {
        if !self.state.is_locked() {
            return SelectionOutcome::Ignored;
        }
        debug!("selection unlocked");
        self.state = SelectionState::None;
        SelectionOutcome::Hide
    }

    /// Re-display the current record in place.
    pub fn refresh(&self) -> SelectionOutcome {
        match self.state.record() {
            Some(id) => SelectionOutcome::Display(id.clone()),
            None => SelectionOutcome::Ignored,
        }
    }

    /// Show a record picked outside the map (e.g. from the favorites list).
    /// A lock follows the new record; otherwise it becomes a preview.
    pub fn show(&mut self, id: &RecordId) -> SelectionOutcome {
        self.state = if self.state.is_locked() {
            SelectionState::Locked(id.clone())
        } else {
            SelectionState::Hovering(id.clone())
        };
        SelectionOutcome::Display(id.clone())
    }
}
