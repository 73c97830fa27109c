use crate::output::classes::DELIMITER_CLASS;
use crate::output::{NodeFactory, Tag};

use super::OverlayBuilder;

impl<F: NodeFactory> OverlayBuilder<'_, F> {
    /// Emits the source between the scan offset and `end`, if any.
    pub(super) fn emit_until(&mut self, end: usize, delimiter: bool) {
        if end <= self.offset {
            return;
        }
        let source = self.source;
        let text = source.slice(self.offset, end);
        self.emit(&text, delimiter);
    }

    /// Appends `text` at the current build position, advancing the scan
    /// offset by its length. Every `\n` closes the current line.
    pub(super) fn emit(&mut self, text: &str, delimiter: bool) {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.break_line();
            }
            self.append_segment(segment, delimiter);
        }
    }

    fn break_line(&mut self) {
        if self.stack.is_empty() {
            // Between blocks a line break closes a block of its own.
            self.close_pending_line();
        } else {
            for depth in (0..self.stack.len()).rev() {
                self.flush_frame(depth);
            }
        }
        self.offset += 1;
        self.check_offset();
    }

    fn append_segment(&mut self, segment: &str, delimiter: bool) {
        if segment.is_empty() {
            return;
        }
        let target = match self.stack.last() {
            Some(frame) => frame.element,
            None => self.pending_line(),
        };
        if delimiter {
            let run = self.factory.create_element(Tag::Span);
            self.factory.add_class(run, DELIMITER_CLASS);
            self.factory.append_text(run, segment);
            self.factory.append_child(target, run);
        } else {
            self.factory.append_text(target, segment);
        }
        self.offset += segment.len();
        self.check_offset();
    }

    pub(super) fn check_offset(&self) {
        debug_assert!(
            self.offset <= self.source.len(),
            "scan offset {} past end of source ({} bytes)",
            self.offset,
            self.source.len()
        );
    }
}
