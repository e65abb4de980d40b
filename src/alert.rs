use crate::gateway::TagOp;
use std::time::{Duration, Instant};

pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
    Info,
}

/// Summary of what a committed tag change did to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Removed(Vec<String>),
    Added(Vec<String>),
    Unchanged,
}

impl Notice {
    /// Derive the notice for `op` applied to a file that carried `before`.
    ///
    /// Removals win over additions: a set that both drops and introduces
    /// tags reports only what was dropped.
    pub fn describe(before: &[String], op: &TagOp) -> Self {
        let (removed, added): (Vec<String>, Vec<String>) = match op {
            TagOp::Set(tags) => (
                before.iter().filter(|t| !tags.contains(t)).cloned().collect(),
                tags.iter().filter(|t| !before.contains(t)).cloned().collect(),
            ),
            TagOp::Add(tags) => (
                Vec::new(),
                tags.iter().filter(|t| !before.contains(t)).cloned().collect(),
            ),
            TagOp::Remove(tags) => (
                before.iter().filter(|t| tags.contains(t)).cloned().collect(),
                Vec::new(),
            ),
        };

        if !removed.is_empty() {
            Notice::Removed(removed)
        } else if !added.is_empty() {
            Notice::Added(added)
        } else {
            Notice::Unchanged
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notice::Removed(_) => Severity::Error,
            Notice::Added(_) => Severity::Success,
            Notice::Unchanged => Severity::Info,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Removed(tags) => format!("Tags removed: {}.", tags.join(", ")),
            Notice::Added(tags) => format!("Tags added: {}.", tags.join(", ")),
            Notice::Unchanged => "Tags unchanged.".to_string(),
        }
    }
}

/// Transient notice display: visible for a fixed window after `show`.
#[derive(Debug, Clone)]
pub struct Alert {
    notice: Option<Notice>,
    hide_at: Option<Instant>,
    duration: Duration,
}

impl Alert {
    pub fn new(duration: Duration) -> Self {
        Self {
            notice: None,
            hide_at: None,
            duration,
        }
    }

    /// Display `notice`, replacing any visible one and restarting the timer.
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.notice = Some(notice);
        self.hide_at = Some(now + self.duration);
    }

    /// Hide the notice once its window has passed. Returns true if it was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn visible(&self) -> Option<&Notice> {
        self.hide_at.and(self.notice.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_with_removal_and_addition_reports_removal() {
        let notice = Notice::describe(&tags(&["a", "b"]), &TagOp::Set(tags(&["a", "c"])));
        assert_eq!(notice, Notice::Removed(tags(&["b"])));
        assert_eq!(notice.severity(), Severity::Error);
        assert_eq!(notice.message(), "Tags removed: b.");
    }

    #[test]
    fn add_reports_only_new_tags() {
        let notice = Notice::describe(&tags(&["a"]), &TagOp::Add(tags(&["a", "b"])));
        assert_eq!(notice, Notice::Added(tags(&["b"])));
        assert_eq!(notice.severity(), Severity::Success);
        assert_eq!(notice.message(), "Tags added: b.");
    }

    #[test]
    fn remove_reports_intersection_in_original_order() {
        let notice = Notice::describe(
            &tags(&["x", "y", "z"]),
            &TagOp::Remove(tags(&["z", "missing", "x"])),
        );
        assert_eq!(notice, Notice::Removed(tags(&["x", "z"])));
    }

    #[test]
    fn identical_before_and_after_is_unchanged() {
        let before = tags(&["a", "b"]);
        for op in [
            TagOp::Set(before.clone()),
            TagOp::Add(before.clone()),
            TagOp::Remove(tags(&["c"])),
            TagOp::Add(Vec::new()),
        ] {
            let notice = Notice::describe(&before, &op);
            assert_eq!(notice, Notice::Unchanged, "{op:?}");
            assert_eq!(notice.severity(), Severity::Info);
        }
        assert_eq!(Notice::Unchanged.message(), "Tags unchanged.");
    }

    #[test]
    fn set_to_superset_reports_addition() {
        let notice = Notice::describe(&tags(&["a"]), &TagOp::Set(tags(&["a", "b", "c"])));
        assert_eq!(notice, Notice::Added(tags(&["b", "c"])));
    }

    #[test]
    fn clearing_reports_everything_removed() {
        let notice = Notice::describe(&tags(&["a", "b"]), &TagOp::Set(Vec::new()));
        assert_eq!(notice, Notice::Removed(tags(&["a", "b"])));
    }

    #[test]
    fn alert_hides_after_window() {
        let start = Instant::now();
        let mut alert = Alert::new(Duration::from_secs(3));
        alert.show(Notice::Unchanged, start);

        assert!(!alert.tick(start + Duration::from_millis(2999)));
        assert_eq!(alert.visible(), Some(&Notice::Unchanged));

        assert!(alert.tick(start + Duration::from_secs(3)));
        assert_eq!(alert.visible(), None);
        assert!(!alert.tick(start + Duration::from_secs(4)));
    }

    #[test]
    fn new_notice_restarts_the_timer() {
        let start = Instant::now();
        let mut alert = Alert::new(Duration::from_secs(3));
        alert.show(Notice::Unchanged, start);
        alert.show(Notice::Added(tags(&["b"])), start + Duration::from_secs(2));

        assert!(!alert.tick(start + Duration::from_secs(4)));
        assert_eq!(alert.visible(), Some(&Notice::Added(tags(&["b"]))));
        assert!(alert.tick(start + Duration::from_secs(5)));
        assert!(alert.visible().is_none());
    }
}
