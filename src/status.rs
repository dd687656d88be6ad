// src/status.rs - Device status label on the host node
use tracing::debug;

/// A UI-visible label, e.g. a node comment.
pub trait AnnotationTarget {
    fn set_label(&mut self, text: &str);
    fn set_visible(&mut self, visible: bool);
}

/// In-memory label, for hosts without a real comment field and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeComment {
    pub text: String,
    pub visible: bool,
    pub updates: usize,
}

impl AnnotationTarget for NodeComment {
    fn set_label(&mut self, text: &str) {
        self.text = text.to_string();
        self.updates += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

pub struct StatusAnnotator;

impl StatusAnnotator {
    pub fn status_text(enabled: bool) -> &'static str {
        if enabled {
            "Device : Enabled"
        } else {
            "Device : Disabled"
        }
    }

    pub fn announce<T: AnnotationTarget + ?Sized>(target: &mut T, enabled: bool) {
        Self::publish(target, Self::status_text(enabled));
    }

    /// Shows any message (typically a failure) on the target.
    pub fn publish<T: AnnotationTarget + ?Sized>(target: &mut T, text: &str) {
        debug!(text, "annotate");
        target.set_label(text);
        target.set_visible(true);
    }
}
