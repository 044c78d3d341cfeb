//! In-memory toast container.

use std::sync::Mutex;

use crate::application::notify::{Toast, ToastId, ToastSurface};

use super::render;

#[derive(Debug, Clone)]
struct ToastNode {
    toast: Toast,
    visible: bool,
}

/// Holds the mounted toast elements of a page.
///
/// Calls for ids that are not mounted are ignored.
#[derive(Default)]
pub struct ToastLayer {
    nodes: Mutex<Vec<ToastNode>>,
}

impl ToastLayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_nodes<R>(&self, f: impl FnOnce(&mut Vec<ToastNode>) -> R) -> R {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut nodes)
    }

    fn set_visible(&self, id: ToastId, visible: bool) {
        self.with_nodes(|nodes| {
            if let Some(node) = nodes.iter_mut().find(|n| n.toast.id == id) {
                node.visible = visible;
            }
        });
    }

    /// Id of the mounted toast, if any.
    pub fn current(&self) -> Option<ToastId> {
        self.with_nodes(|nodes| nodes.last().map(|n| n.toast.id))
    }

    /// Number of mounted toast elements (0 or 1 under the notifier).
    pub fn mounted_count(&self) -> usize {
        self.with_nodes(|nodes| nodes.len())
    }

    /// Message of the mounted toast, shown or not.
    pub fn current_message(&self) -> Option<String> {
        self.with_nodes(|nodes| nodes.last().map(|n| n.toast.message.clone()))
    }

    /// Message of the mounted toast if it is currently shown.
    pub fn visible_message(&self) -> Option<String> {
        self.with_nodes(|nodes| {
            nodes
                .iter()
                .rev()
                .find(|n| n.visible)
                .map(|n| n.toast.message.clone())
        })
    }

    /// Markup of every mounted toast.
    pub fn html(&self) -> String {
        self.with_nodes(|nodes| {
            nodes
                .iter()
                .map(|n| render::toast(&n.toast, n.visible))
                .collect()
        })
    }
}

impl ToastSurface for ToastLayer {
    fn replace(&self, toast: &Toast) -> Option<ToastId> {
        self.with_nodes(|nodes| {
            let replaced = nodes.last().map(|n| n.toast.id);
            nodes.clear();
            nodes.push(ToastNode {
                toast: toast.clone(),
                visible: false,
            });
            replaced
        })
    }

    fn show(&self, id: ToastId) {
        self.set_visible(id, true);
    }

    fn hide(&self, id: ToastId) {
        self.set_visible(id, false);
    }

    fn remove(&self, id: ToastId) {
        self.with_nodes(|nodes| nodes.retain(|n| n.toast.id != id));
    }
}
