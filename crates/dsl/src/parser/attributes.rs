//! Attribute access and element shape assertions.
//!
//! Every failed assertion records a diagnostic on the offending element.

use arbiter_runtime::EventId;
use roxmltree::Node;

use super::{DocumentParser, elements};

impl DocumentParser {
    pub(super) fn assert_children_exactly(&mut self, node: Node<'_, '_>, count: usize) -> bool {
        if elements(node).count() != count {
            self.structure_error(
                node,
                format!(
                    "{} tag must have exactly {count} child tag(s)",
                    node.tag_name().name()
                ),
            );
            return false;
        }
        true
    }

    pub(super) fn assert_children_at_least(&mut self, node: Node<'_, '_>, count: usize) -> bool {
        if elements(node).count() < count {
            self.structure_error(
                node,
                format!(
                    "{} tag must have at least {count} child tag(s)",
                    node.tag_name().name()
                ),
            );
            return false;
        }
        true
    }

    pub(super) fn assert_has_attribute<'a>(
        &mut self,
        node: Node<'a, '_>,
        name: &str,
    ) -> Option<&'a str> {
        let value = node.attribute(name);
        if value.is_none() {
            self.structure_error(
                node,
                format!(
                    "\"{}\" tag must have \"{name}\" attribute.",
                    node.tag_name().name()
                ),
            );
        }
        value
    }

    pub(super) fn assert_attribute_non_empty<'a>(
        &mut self,
        node: Node<'a, '_>,
        name: &str,
    ) -> Option<&'a str> {
        let value = self.assert_has_attribute(node, name)?;
        if value.is_empty() {
            self.structure_error(
                node,
                format!(
                    "Attribute \"{name}\" of the tag \"{}\" must not be empty.",
                    node.tag_name().name()
                ),
            );
            return None;
        }
        Some(value)
    }

    pub(super) fn int_attribute(&mut self, node: Node<'_, '_>, name: &str) -> Option<i64> {
        let raw = node.attribute(name).unwrap_or_default();
        let value = raw.trim().parse().ok();
        if value.is_none() {
            self.structure_error(node, format!("Invalid integer value \"{raw}\""));
        }
        value
    }

    pub(super) fn double_attribute(&mut self, node: Node<'_, '_>, name: &str) -> Option<f64> {
        let raw = node.attribute(name).unwrap_or_default();
        let value = raw.trim().parse().ok();
        if value.is_none() {
            self.structure_error(node, format!("Invalid floating point value \"{raw}\""));
        }
        value
    }

    /// Case-insensitive `true`/`false`; an absent attribute yields `default`
    pub(super) fn bool_attribute(&mut self, node: Node<'_, '_>, name: &str, default: bool) -> bool {
        let Some(raw) = node.attribute(name) else {
            return default;
        };
        match raw.to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                self.structure_error(
                    node,
                    format!("Invalid boolean value \"{raw}\" (expected \"true\" or \"false\")"),
                );
                default
            }
        }
    }

    /// Author-supplied id, or a generated one when absent or empty
    pub(super) fn id(&self, node: Node<'_, '_>) -> EventId {
        match node.attribute("id") {
            Some(id) if !id.is_empty() => EventId::from(id),
            _ => EventId::generate(),
        }
    }
}
