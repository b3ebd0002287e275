use std::{cell::RefCell, collections::VecDeque, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible message (toast). Presentation is the host's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Shared queue of pending notices. Every component of a session posts here;
/// the host drains it once per frame.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    queue: Rc<RefCell<VecDeque<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Warning => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::debug!(message = %notice.message, "notice")
            }
        }
        self.queue.borrow_mut().push_back(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Success, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Warning, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Error, message));
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
