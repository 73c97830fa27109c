use super::classes::BOUNDARY_MARKER;

/// Element tag of an output node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Block and line containers.
    Div,
    /// Inline containers and delimiter runs.
    Span,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Span => "span",
        }
    }
}

/// The element-creation surface the overlay builder writes through.
///
/// Implementations can target an in-memory arena ([`OutputTree`]), a
/// virtual-DOM, or a live browser DOM. The builder only ever mutates an
/// element before appending it to its parent.
///
/// [`OutputTree`]: super::tree::OutputTree
pub trait NodeFactory {
    type Handle: Copy;

    fn create_element(&mut self, tag: Tag) -> Self::Handle;

    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    fn add_class(&mut self, element: Self::Handle, class: &str);

    fn set_attribute(&mut self, element: Self::Handle, name: &str, value: &str);

    fn append_text(&mut self, element: Self::Handle, text: &str);

    /// Appends the zero-width caret anchor that terminates every line.
    fn append_marker(&mut self, element: Self::Handle) {
        let mut buf = [0u8; 4];
        self.append_text(element, BOUNDARY_MARKER.encode_utf8(&mut buf));
    }
}
