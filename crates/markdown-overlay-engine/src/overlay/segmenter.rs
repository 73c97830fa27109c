use crate::output::classes::{BLOCK_CLASS, INDEX_ATTRIBUTE, JOINED_CLASS};
use crate::output::{NodeFactory, Tag};

use super::OverlayBuilder;

impl<F: NodeFactory> OverlayBuilder<'_, F> {
    /// The top-level line collecting text between blocks.
    pub(super) fn pending_line(&mut self) -> F::Handle {
        *self
            .pending_line
            .get_or_insert_with(|| self.factory.create_element(Tag::Div))
    }

    pub(super) fn finalize_line(&mut self, line: F::Handle) {
        self.factory.append_child(self.block, line);
    }

    pub(super) fn finalize_block(&mut self) {
        self.factory.add_class(self.block, BLOCK_CLASS);
        self.factory.append_child(self.root, self.block);
        self.block = self.factory.create_element(Tag::Div);
        self.blocks += 1;
    }

    /// Closes the pending top-level line as a block of its own.
    pub(super) fn close_pending_line(&mut self) {
        let line = self
            .pending_line
            .take()
            .unwrap_or_else(|| self.factory.create_element(Tag::Div));
        self.factory.append_marker(line);
        self.finalize_line(line);
        self.finalize_block();
        self.ended_at_eof = false;
    }

    /// Closes the outermost frame: the end of a top-level block.
    ///
    /// Whatever is left on the block's last source line is kept on that
    /// line as delimiter text, then the terminating line break is consumed.
    /// When the next top-level node starts on the same line, the block stops
    /// at `next_start` and its line is marked as joined instead.
    pub(super) fn close_block(&mut self, index: usize, next_start: Option<usize>) {
        let line_end = self.source.line_end(self.offset);
        let stop = next_start.map_or(line_end, |start| start.min(line_end));
        self.emit_until(stop, true);

        self.apply_classes(0, true);
        let line = self.stack[0].element;
        if self.offset < line_end {
            self.factory.add_class(line, JOINED_CLASS);
        }
        self.factory.append_marker(line);
        self.finalize_line(line);
        self.factory
            .set_attribute(self.block, INDEX_ATTRIBUTE, &index.to_string());
        self.finalize_block();

        if self.source.slice(self.offset, self.offset + 1) == "\n" {
            self.offset += 1;
            self.check_offset();
            self.ended_at_eof = false;
        } else {
            self.ended_at_eof = self.offset >= self.source.len();
        }
    }

    /// Emits trailing text and closes the final block, so the output always
    /// ends in a well-formed block. Skipped when the last block already
    /// ended at the end of the source.
    pub(super) fn finish(mut self) -> F::Handle {
        if !self.ended_at_eof {
            self.emit_until(self.source.len(), true);
            self.close_pending_line();
        }
        log::debug!(
            "overlay built: {} blocks over {} bytes",
            self.blocks,
            self.source.len()
        );
        self.root
    }
}
