//! HTML output for the arena DOM.
//!
//! The arena implements html5ever's [`Serialize`] so escaping, void elements
//! and raw-text contents follow html5ever's serializer, with scripting
//! enabled to match how pages are parsed.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{QualName, ns};

use super::arena::{Dom, NodeData, NodeId};

/// A node to serialize, borrowed from its arena.
#[derive(Clone, Copy)]
struct SerializableNode<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> SerializableNode<'a> {
    fn child(&self, id: NodeId) -> Self {
        Self { dom: self.dom, id }
    }

    fn serialize_children<S: Serializer>(&self, serializer: &mut S) -> io::Result<()> {
        // The parser drops one newline after these start tags, so a leading
        // newline in the text has to be doubled to survive a reparse.
        if self.drops_leading_newline()
            && let Some(first) = self.dom.children(self.id).next()
            && self.dom.text(first).is_some_and(|t| t.starts_with('\n'))
        {
            serializer.write_text("\n")?;
        }
        for child in self.dom.children(self.id) {
            self.child(child)
                .serialize(serializer, TraversalScope::IncludeNode)?;
        }
        Ok(())
    }

    fn drops_leading_newline(&self) -> bool {
        self.dom.element_namespace(self.id) == Some(&ns!(html))
            && self
                .dom
                .element_name(self.id)
                .is_some_and(|n| matches!(n.as_ref(), "pre" | "textarea" | "listing"))
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let Some(node) = self.dom.get(self.id) else {
            return Ok(());
        };
        if let TraversalScope::ChildrenOnly(_) = traversal_scope {
            return self.serialize_children(serializer);
        }

        match &node.data {
            NodeData::Document => self.serialize_children(serializer),
            NodeData::Doctype { name, .. } => serializer.write_doctype(name),
            NodeData::Comment(text) => serializer.write_comment(text),
            NodeData::Text(text) => serializer.write_text(text),
            NodeData::Element { name, attrs, .. } => {
                let attrs = attrs.iter().map(|a| (&a.name, a.value.as_str()));
                serializer.start_elem(name.clone(), attrs)?;
                self.serialize_children(serializer)?;
                serializer.end_elem(name.clone())
            }
        }
    }
}

impl Dom {
    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.write_html(self.document(), TraversalScope::ChildrenOnly(None))
    }

    /// Serialize a node including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        self.write_html(id, TraversalScope::IncludeNode)
    }

    /// Serialize the children of a node (DOM `innerHTML`).
    pub fn inner_html(&self, id: NodeId) -> String {
        let parent = self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(QualName::clone(name)),
            _ => None,
        });
        self.write_html(id, TraversalScope::ChildrenOnly(parent))
    }

    fn write_html(&self, id: NodeId, traversal_scope: TraversalScope) -> String {
        let opts = SerializeOpts {
            scripting_enabled: true,
            traversal_scope,
            ..Default::default()
        };
        let mut bytes = Vec::new();
        if let Err(e) = serialize(&mut bytes, &SerializableNode { dom: self, id }, opts) {
            tracing::error!(error = %e, "html serialization stopped early");
        }
        String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_document;

    fn round_trip(html: &str) -> String {
        parse_document(html).to_html()
    }

    #[test]
    fn test_document_round_trip() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head>\
                    <body><p class=\"x\">a &amp; b</p><br><!--note--></body></html>";
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_script_contents_are_not_escaped() {
        let dom = parse_document("<script>if (a < b && c) {}</script>");
        let script = dom.find_by_tag("script").unwrap();
        assert_eq!(dom.inner_html(script), "if (a < b && c) {}");
    }

    #[test]
    fn test_attribute_quotes_are_escaped() {
        let mut dom = parse_document("<a>x</a>");
        let a = dom.find_by_tag("a").unwrap();
        dom.set_attr(a, "title", "say \"hi\"");
        assert_eq!(dom.outer_html(a), "<a title=\"say &quot;hi&quot;\">x</a>");
    }

    #[test]
    fn test_noscript_fallbacks_stay_markup() {
        let html = "<html><head><noscript><link rel=\"stylesheet\" href=\"nojs.css\"></noscript>\
                    </head><body><noscript><p>Enable JS</p></noscript></body></html>";
        let out = round_trip(html);
        assert_eq!(out, html);
        assert!(!out.contains("&lt;"));
    }

    #[test]
    fn test_pre_leading_newline_is_stable() {
        let html = "<html><head></head><body><pre>\n\nfn main() {}</pre></body></html>";
        let once = round_trip(html);
        assert_eq!(once, html);
        assert_eq!(round_trip(&once), html);

        let textarea = "<html><head></head><body><textarea>\n\nline</textarea></body></html>";
        assert_eq!(round_trip(textarea), textarea);
    }

    #[test]
    fn test_svg_namespaced_attributes() {
        let html = "<html><head></head><body>\
                    <svg viewBox=\"0 0 10 10\"><use xlink:href=\"#icon\"></use></svg></body></html>";
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_inner_html_of_textarea_keeps_newline() {
        let dom = parse_document("<textarea>\n\nx</textarea>");
        let textarea = dom.find_by_tag("textarea").unwrap();
        assert_eq!(dom.inner_html(textarea), "\n\nx");
    }
}
