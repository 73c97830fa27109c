use crate::output::NodeFactory;
use crate::output::classes::{FIRST_CLASS, LAST_CLASS, class_name, depth_class};

use super::OverlayBuilder;

impl<F: NodeFactory> OverlayBuilder<'_, F> {
    /// Attaches the type-derived classes of the frame at `depth`.
    ///
    /// Top-level nodes and children of flow content put their classes on
    /// the open line element, so nested quotes and list items accumulate
    /// on one line instead of one wrapper per level.
    pub(super) fn apply_classes(&mut self, depth: usize, last: bool) {
        let frame = &self.stack[depth];
        let kind = &frame.node.kind;
        let target = if depth == 0 || self.stack[depth - 1].node.kind.is_flow_content() {
            self.stack[0].element
        } else {
            frame.element
        };

        self.factory.add_class(target, &class_name(kind));
        if let Some(class) = depth_class(kind) {
            self.factory.add_class(target, &class);
        }
        if kind.is_opaque() {
            if frame.fresh {
                self.factory.add_class(target, FIRST_CLASS);
            }
            if last {
                self.factory.add_class(target, LAST_CLASS);
            }
        }
    }
}
