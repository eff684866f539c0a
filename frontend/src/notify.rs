use log::{info, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Option<u32>, // milliseconds, None for manual dismiss
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            duration: Some(5000), // 5 seconds default
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }
}

/// Sink for transient user-visible notifications.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Toasts waiting to be rendered. Clones share one queue, so the API layer
/// pushes and the UI drains.
#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
    toasts: Rc<RefCell<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.toasts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<Toast> {
        self.toasts.borrow_mut().drain(..).collect()
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.borrow_mut().retain(|t| t.id != id);
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts.borrow().iter().map(|t| t.message.clone()).collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        self.toasts.borrow_mut().push_back(toast);
    }
}

/// Writes notifications to the log; for headless clients.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Error | ToastKind::Warning => warn!("{}", toast.message),
            ToastKind::Success | ToastKind::Info => info!("{}", toast.message),
        }
    }
}
