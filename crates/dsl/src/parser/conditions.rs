//! Condition tags.

use arbiter_runtime::{ComparisonOp, Condition, EventId, Glue};
use roxmltree::Node;

use super::{DocumentParser, elements, tag, timer};

/// Placeholder for a condition that failed to parse
fn placeholder() -> Condition {
    Condition::Constant(true)
}

impl DocumentParser {
    /// A `conditions` or `condition` wrapper, or a bare condition tag
    pub(super) fn parse_conditions_alternative(
        &mut self,
        node: Node<'_, '_>,
        owner: &EventId,
    ) -> Condition {
        match tag(node).as_str() {
            "conditions" => self.parse_conditions_tag(node, owner),
            "condition" => self.parse_condition_tag(node, owner),
            _ => self.parse_condition_contents(node, owner),
        }
    }

    pub(super) fn parse_conditions_tag(&mut self, node: Node<'_, '_>, owner: &EventId) -> Condition {
        if !self.assert_children_at_least(node, 1) {
            return placeholder();
        }
        let Some(glue) = self.assert_attribute_non_empty(node, "glue") else {
            return placeholder();
        };
        let glue = match glue.to_lowercase().as_str() {
            "and" => Glue::And,
            "or" => Glue::Or,
            _ => {
                self.structure_error(node, "\"Glue\" attribute must have value \"and\" or \"or\".");
                return placeholder();
            }
        };

        let conditions = elements(node)
            .map(|child| self.parse_conditions_alternative(child, owner))
            .collect();
        Condition::Combined { conditions, glue }
    }

    pub(super) fn parse_condition_tag(&mut self, node: Node<'_, '_>, owner: &EventId) -> Condition {
        if !self.assert_children_exactly(node, 1) {
            return placeholder();
        }
        match elements(node).next() {
            Some(child) => self.parse_conditions_alternative(child, owner),
            None => placeholder(),
        }
    }

    fn parse_condition_contents(&mut self, node: Node<'_, '_>, owner: &EventId) -> Condition {
        let name = tag(node);
        match name.as_str() {
            "not" => self.parse_negation(node, owner),
            "equals" | "greater" | "less" | "notgreater" | "notless" => {
                self.parse_comparison(node, &name)
            }
            other if other.starts_with("notequal") => self.parse_comparison(node, &name),
            "inside" => self.parse_inside(node),
            "settedup" | "dropped" => self.parse_event_state(node, &name),
            "timer" => self.parse_timer(node, owner),
            _ => {
                self.structure_error(
                    node,
                    format!("Unknown tag \"{}\".", node.tag_name().name()),
                );
                placeholder()
            }
        }
    }

    fn parse_negation(&mut self, node: Node<'_, '_>, owner: &EventId) -> Condition {
        if !self.assert_children_exactly(node, 1) {
            return placeholder();
        }
        match elements(node).next() {
            Some(child) => self.parse_conditions_alternative(child, owner).negate(),
            None => placeholder(),
        }
    }

    fn parse_comparison(&mut self, node: Node<'_, '_>, name: &str) -> Condition {
        if !self.assert_children_exactly(node, 2) {
            return placeholder();
        }
        let mut children = elements(node);
        let (Some(left), Some(right)) = (children.next(), children.next()) else {
            return placeholder();
        };

        let op = match name {
            "equals" => ComparisonOp::Equals,
            "greater" => ComparisonOp::Greater,
            "less" => ComparisonOp::Less,
            "notgreater" => ComparisonOp::NotGreater,
            "notless" => ComparisonOp::NotLess,
            _ => ComparisonOp::NotEqual,
        };
        let left = self.parse_value(left);
        let right = self.parse_value(right);
        Condition::Comparison { op, left, right }
    }

    fn parse_inside(&mut self, node: Node<'_, '_>) -> Condition {
        let Some(object_id) = self.assert_attribute_non_empty(node, "objectId") else {
            return placeholder();
        };
        let Some(region_id) = self.assert_attribute_non_empty(node, "regionId") else {
            return placeholder();
        };
        Condition::Inside {
            object_id: object_id.to_string(),
            region_id: region_id.to_string(),
        }
    }

    fn parse_event_state(&mut self, node: Node<'_, '_>, name: &str) -> Condition {
        let Some(id) = self.assert_attribute_non_empty(node, "id") else {
            return placeholder();
        };
        if name == "settedup" {
            Condition::SettedUp(id.into())
        } else {
            Condition::Dropped(id.into())
        }
    }

    /// `timer` measures time since its owning event was armed
    fn parse_timer(&mut self, node: Node<'_, '_>, owner: &EventId) -> Condition {
        if self.assert_attribute_non_empty(node, "timeout").is_none() {
            return placeholder();
        }
        let Some(timeout) = self.int_attribute(node, "timeout") else {
            return placeholder();
        };
        let force_drop = self.bool_attribute(node, "forceDropOnTimeout", true);
        timer(timeout, force_drop, owner)
    }
}
