use crate::models::ParsedNode;
use crate::output::{NodeFactory, Tag};

use super::{Frame, OverlayBuilder};

/// A run of siblings still being walked, bounded by `parent_end`.
struct Siblings<'a> {
    nodes: &'a [ParsedNode],
    next: usize,
    parent_end: usize,
}

impl<'a, F: NodeFactory> OverlayBuilder<'a, F> {
    /// Walks `nodes`, a run of siblings bounded by `parent_end`, depth
    /// first. Unfinished sibling runs are kept on a work-list, not the
    /// call stack.
    pub(super) fn visit(&mut self, nodes: &'a [ParsedNode], parent_end: usize) {
        let mut pending = vec![Siblings {
            nodes,
            next: 0,
            parent_end,
        }];

        while let Some(run) = pending.last_mut() {
            let index = run.next;
            let nodes = run.nodes;
            let Some(node) = nodes.get(index) else {
                let parent_end = run.parent_end;
                pending.pop();
                self.emit_until(parent_end, true);
                // The run was the children of the innermost open node.
                if let Some(parent) = pending.last() {
                    let index = parent.next - 1;
                    self.leave(index, &parent.nodes[parent.next..]);
                }
                continue;
            };
            run.next += 1;

            if node.span.is_none() {
                log::trace!("skipping {} without a span", node.kind);
            }
            let Some((start, end)) = self.clamp(node) else {
                continue;
            };
            self.emit_until(start, true);
            self.enter(node);
            if node.walks_children() {
                pending.push(Siblings {
                    nodes: &node.children,
                    next: 0,
                    parent_end: end,
                });
            } else {
                self.emit_until(end, false);
                self.leave(index, &nodes[index + 1..]);
            }
        }
    }

    /// The part of `node` not yet emitted, or `None` if nothing is left.
    fn clamp(&self, node: &ParsedNode) -> Option<(usize, usize)> {
        let span = node.span?;
        if span.start < self.offset {
            log::trace!(
                "clamping {} start {} to scan offset {}",
                node.kind,
                span.start,
                self.offset
            );
        }
        let start = span.start.max(self.offset);
        let end = span.end.min(self.source.len());
        (start < end).then_some((start, end))
    }

    /// Clamped start of the first of `nodes` that still emits anything.
    fn next_start(&self, nodes: &[ParsedNode]) -> Option<usize> {
        nodes.iter().find_map(|node| {
            let span = node.span?;
            let start = span.start.max(self.offset);
            (start < span.end.min(self.source.len())).then_some(start)
        })
    }

    fn enter(&mut self, node: &'a ParsedNode) {
        let element = if self.stack.is_empty() {
            self.pending_line
                .take()
                .unwrap_or_else(|| self.factory.create_element(Tag::Div))
        } else {
            self.factory.create_element(Tag::Span)
        };
        self.stack.push(Frame {
            node,
            element,
            fresh: true,
        });
    }

    /// Closes the innermost frame. `following` are the node's later
    /// siblings.
    fn leave(&mut self, index: usize, following: &[ParsedNode]) {
        let depth = self.stack.len() - 1;
        if depth > 0 {
            self.finalize_frame(depth, true);
        } else {
            let next_start = self.next_start(following);
            self.close_block(index, next_start);
        }
        self.stack.pop();
    }

    /// Classifies the frame at `depth` and moves its element into the
    /// parent frame's element.
    fn finalize_frame(&mut self, depth: usize, last: bool) {
        self.apply_classes(depth, last);
        let element = self.stack[depth].element;
        let parent = self.stack[depth - 1].element;
        self.factory.append_child(parent, element);
    }

    /// Finalizes the frame's current line and gives it a fresh element for
    /// whatever the node still has to emit.
    pub(super) fn flush_frame(&mut self, depth: usize) {
        if depth == 0 {
            self.apply_classes(0, false);
            let line = self.stack[0].element;
            self.factory.append_marker(line);
            self.finalize_line(line);
            self.stack[0].element = self.factory.create_element(Tag::Div);
        } else {
            self.finalize_frame(depth, false);
            self.stack[depth].element = self.factory.create_element(Tag::Span);
        }
        self.stack[depth].fresh = false;
    }
}
