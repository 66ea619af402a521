//! Trigger tags.

use arbiter_runtime::{Scalar, Trigger};
use roxmltree::Node;

use super::{DocumentParser, elements, tag};

impl DocumentParser {
    /// A `triggers` or `trigger` wrapper, or a bare trigger tag
    pub(super) fn parse_triggers_alternative(&mut self, node: Node<'_, '_>) -> Trigger {
        match tag(node).as_str() {
            "triggers" => self.parse_triggers_tag(node),
            "trigger" => self.parse_trigger_tag(node),
            _ => self.parse_trigger_contents(node),
        }
    }

    fn parse_triggers_tag(&mut self, node: Node<'_, '_>) -> Trigger {
        if !self.assert_children_at_least(node, 1) {
            return Trigger::DoNothing;
        }
        Trigger::Combined(
            elements(node)
                .map(|child| self.parse_triggers_alternative(child))
                .collect(),
        )
    }

    fn parse_trigger_tag(&mut self, node: Node<'_, '_>) -> Trigger {
        if !self.assert_children_exactly(node, 1) {
            return Trigger::DoNothing;
        }
        match elements(node).next() {
            Some(child) => self.parse_triggers_alternative(child),
            None => Trigger::DoNothing,
        }
    }

    fn parse_trigger_contents(&mut self, node: Node<'_, '_>) -> Trigger {
        let name = tag(node);
        match name.as_str() {
            "fail" => match self.assert_attribute_non_empty(node, "message") {
                Some(message) => Trigger::Fail(message.to_string()),
                None => Trigger::DoNothing,
            },
            "success" => Trigger::Success,
            "setvariable" | "addtovariable" => self.parse_variable_write(node, &name),
            "setup" | "drop" => {
                let Some(id) = self.assert_attribute_non_empty(node, "id") else {
                    return Trigger::DoNothing;
                };
                if name == "setup" {
                    Trigger::SetUpEvent(id.into())
                } else {
                    Trigger::DropEvent(id.into())
                }
            }
            _ => {
                self.structure_error(
                    node,
                    format!("Unknown tag \"{}\".", node.tag_name().name()),
                );
                Trigger::DoNothing
            }
        }
    }

    /// `setVariable` / `addToVariable`; the value literal is read as an
    /// integer, a floating point number or a string, in that order
    fn parse_variable_write(&mut self, node: Node<'_, '_>, name: &str) -> Trigger {
        let Some(variable) = self.assert_attribute_non_empty(node, "name") else {
            return Trigger::DoNothing;
        };
        let Some(literal) = self.assert_has_attribute(node, "value") else {
            return Trigger::DoNothing;
        };

        let value = Scalar::from_literal(literal);
        let variable = variable.to_string();
        if name == "setvariable" {
            Trigger::SetVariable {
                name: variable,
                value,
            }
        } else {
            Trigger::AddToVariable {
                name: variable,
                value,
            }
        }
    }
}
