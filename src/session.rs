// Component H: session lifecycle tracker (spec §3 "Session status", §4.H).

use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEdge {
    None,
    Done,
    Reopened,
}

#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub is_done: bool,
    pub session_name: String,
    pub last_activity: Instant,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            is_done: false,
            session_name: String::new(),
            last_activity: Instant::now(),
        }
    }
}

impl SessionStatus {
    /// Fold one `update` frame's relevant fields into the tracker, returning
    /// the edge transition (if any) for the caller to turn into an event.
    pub fn apply_update(&mut self, ui_event: Option<&str>, break_type: Option<&str>, session_name: &str) -> SessionEdge {
        self.last_activity = Instant::now();
        if !session_name.is_empty() {
            self.session_name = session_name.to_owned();
        }

        let marks_done = ui_event == Some("GroupDone") || break_type == Some("GROUP_DONE");
        if marks_done {
            if self.is_done {
                return SessionEdge::None;
            }
            self.is_done = true;
            return SessionEdge::Done;
        }

        // Anything else, including a missing `uiEvent`, counts as activity
        // and reopens a previously-done session (spec §9 open question).
        self.apply_activity()
    }

    /// Fold a `timer` or `decision` frame: always counts as activity.
    pub fn apply_activity(&mut self) -> SessionEdge {
        self.last_activity = Instant::now();
        if self.is_done {
            self.is_done = false;
            SessionEdge::Reopened
        } else {
            SessionEdge::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_done_edge_fires_once() {
        let mut status = SessionStatus::default();
        assert_eq!(status.apply_update(Some("GroupDone"), None, "A"), SessionEdge::Done);
        assert!(status.is_done);
        assert_eq!(status.apply_update(Some("GroupDone"), None, "A"), SessionEdge::None);
    }

    #[test]
    fn break_type_group_done_also_marks_done() {
        let mut status = SessionStatus::default();
        assert_eq!(status.apply_update(None, Some("GROUP_DONE"), "A"), SessionEdge::Done);
    }

    #[test]
    fn timer_activity_reopens_a_done_session() {
        let mut status = SessionStatus::default();
        status.apply_update(Some("GroupDone"), None, "A");
        assert_eq!(status.apply_activity(), SessionEdge::Reopened);
        assert!(!status.is_done);
    }

    #[test]
    fn update_with_missing_ui_event_counts_as_reopen_activity() {
        let mut status = SessionStatus::default();
        status.apply_update(Some("GroupDone"), None, "A");
        assert_eq!(status.apply_update(None, None, "A"), SessionEdge::Reopened);
    }

    #[test]
    fn ordinary_update_without_done_state_yields_no_edge() {
        let mut status = SessionStatus::default();
        assert_eq!(status.apply_update(Some("LiftingOrderUpdated"), None, "A"), SessionEdge::None);
    }
}
