#![forbid(unsafe_code)]

//! User-visible notices, queued for the toast collaborator.

use std::collections::VecDeque;

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    /// Something went wrong; rendered as destructive.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }

    pub(crate) fn connected() -> Self {
        Self::info(
            "Connected",
            "Successfully connected to the game server. Place your ant and start the game!",
        )
    }

    pub(crate) fn rules_updated(local: bool) -> Self {
        let description = if local {
            "Your ant's rules have been successfully updated."
        } else {
            "Another player has updated their rules. You can see the new rules in the ants list."
        };
        Self::info("Rules Updated", description)
    }

    pub(crate) fn outside_grid(touch: bool) -> Self {
        let what = if touch { "Touch" } else { "Click" };
        Self::error(
            "Invalid Position",
            format!("{what} position is outside the grid boundaries"),
        )
    }
}

/// FIFO of notices not yet shown.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(target: "antgrid.client", title = %notice.title, "notice queued");
        self.pending.push_back(notice);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn peek(&self) -> Option<&Notice> {
        self.pending.front()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }
}
