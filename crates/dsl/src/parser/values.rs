//! Value tags.

use arbiter_runtime::Value;
use roxmltree::Node;

use super::{DocumentParser, tag};

impl DocumentParser {
    pub(super) fn parse_value(&mut self, node: Node<'_, '_>) -> Value {
        match tag(node).as_str() {
            "int" => self.parse_int(node),
            "double" => self.parse_double(node),
            "string" => match self.assert_has_attribute(node, "value") {
                Some(value) => Value::String(value.to_string()),
                None => Value::Invalid,
            },
            "variablevalue" => match self.assert_attribute_non_empty(node, "name") {
                Some(name) => Value::Variable(name.to_string()),
                None => Value::Invalid,
            },
            "typeof" => match self.assert_attribute_non_empty(node, "objectId") {
                Some(object_id) => Value::TypeOf(object_id.to_string()),
                None => Value::Invalid,
            },
            "objectstate" => self.parse_object_state(node),
            _ => {
                self.structure_error(
                    node,
                    format!("Unknown value \"{}\".", node.tag_name().name()),
                );
                Value::Invalid
            }
        }
    }

    fn parse_int(&mut self, node: Node<'_, '_>) -> Value {
        if self.assert_attribute_non_empty(node, "value").is_none() {
            return Value::Invalid;
        }
        self.int_attribute(node, "value")
            .map_or(Value::Invalid, Value::Int)
    }

    fn parse_double(&mut self, node: Node<'_, '_>) -> Value {
        if self.assert_attribute_non_empty(node, "value").is_none() {
            return Value::Invalid;
        }
        self.double_attribute(node, "value")
            .map_or(Value::Invalid, Value::Double)
    }

    fn parse_object_state(&mut self, node: Node<'_, '_>) -> Value {
        let Some(object_id) = self.assert_attribute_non_empty(node, "objectId") else {
            return Value::Invalid;
        };
        let Some(property) = self.assert_attribute_non_empty(node, "property") else {
            return Value::Invalid;
        };
        Value::ObjectState {
            object_id: object_id.to_string(),
            property: property.to_string(),
        }
    }
}
