//! Constraint document parser
//!
//! Recursive descent over the element tree produced by `roxmltree`.
//! Structural problems are recorded as diagnostics and replaced with inert
//! placeholders so the rest of an entry is still checked; the first entry
//! that produced a diagnostic ends the parse.
//!
//! ## Layout
//!
//! - `attributes`: typed attribute access and shape assertions
//! - `conditions`: condition tags and their wrappers
//! - `triggers`: trigger tags and their wrappers
//! - `values`: value tags

mod attributes;
mod conditions;
mod triggers;
mod values;

use arbiter_runtime::{
    Condition, Error, Event, EventId, Events, Glue, Timeline, Timestamp, Trigger, Value,
};
use roxmltree::{Document, Node};
use tracing::{debug, instrument};

use crate::diagnostic::{Diagnostic, Position};

/// Failure message of the time limit event
pub const TIME_LIMIT_MESSAGE: &str = "Program worked for too long time";

/// Parse a constraint document into an event registry.
///
/// `timeline` supplies the arm timestamp of events that start armed. An
/// empty document describes an unconstrained scenario and yields an empty
/// registry. On failure every diagnostic collected so far is returned and
/// no events are.
#[instrument(skip_all, fields(len = source.len()))]
pub fn parse(source: &str, timeline: &dyn Timeline) -> Result<Events, Vec<Diagnostic>> {
    if source.is_empty() {
        debug!("empty constraint document");
        return Ok(Events::new());
    }

    let document = Document::parse(source)
        .map_err(|err| vec![Diagnostic::malformed(err.to_string(), err.pos().into())])?;

    let mut parser = DocumentParser::new(timeline.timestamp());
    match parser.parse_constraints(document.root_element()) {
        Some(events) if parser.diagnostics.is_empty() => {
            debug!(events = events.len(), "constraint document parsed");
            Ok(events)
        }
        _ => {
            debug!(
                diagnostics = parser.diagnostics.len(),
                "constraint document rejected"
            );
            Err(parser.diagnostics)
        }
    }
}

/// Lowercased tag name, used for every tag comparison
fn tag(node: Node<'_, '_>) -> String {
    node.tag_name().name().to_lowercase()
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn position(node: Node<'_, '_>) -> Position {
    node.document().text_pos_at(node.range().start).into()
}

fn timer(timeout: Timestamp, force_drop: bool, owner: &EventId) -> Condition {
    Condition::Timer {
        timeout,
        force_drop,
        timestamp: Value::Timestamp,
        owner: owner.clone(),
    }
}

pub(crate) struct DocumentParser {
    diagnostics: Vec<Diagnostic>,
    /// Arm timestamp for events armed while parsing
    now: Timestamp,
}

impl DocumentParser {
    fn new(now: Timestamp) -> Self {
        Self {
            diagnostics: Vec::new(),
            now,
        }
    }

    fn structure_error(&mut self, node: Node<'_, '_>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::structure(message, position(node)));
    }

    fn semantic_error(&mut self, node: Node<'_, '_>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::semantic(message, position(node)));
    }

    fn parse_constraints(&mut self, root: Node<'_, '_>) -> Option<Events> {
        if tag(root) != "constraints" {
            self.structure_error(root, "Root element must be \"constraints\" tag");
            return None;
        }

        let mut events = Events::new();
        let mut time_limits = 0usize;

        for entry in elements(root) {
            let reported = self.diagnostics.len();
            let event = self
                .parse_entry(entry)
                .filter(|_| self.diagnostics.len() == reported)?;

            if let Err(err) = events.insert(event) {
                let message = match err {
                    Error::DuplicateEventId(id) => format!("Duplicate id: \"{id}\""),
                    other => other.to_string(),
                };
                self.semantic_error(entry, message);
                return None;
            }

            if tag(entry) == "timelimit" {
                time_limits += 1;
            }
        }

        match time_limits {
            0 => {
                self.semantic_error(root, "There must be a \"timelimit\" constraint.");
                None
            }
            1 => Some(events),
            _ => {
                self.semantic_error(root, "There must be only one \"timelimit\" tag.");
                None
            }
        }
    }

    fn parse_entry(&mut self, entry: Node<'_, '_>) -> Option<Event> {
        match tag(entry).as_str() {
            "event" => self.parse_event(entry),
            "constraint" => self.parse_constraint(entry),
            "timelimit" => self.parse_time_limit(entry),
            _ => {
                self.structure_error(
                    entry,
                    format!("Unknown tag \"{}\".", entry.tag_name().name()),
                );
                None
            }
        }
    }

    fn parse_event(&mut self, node: Node<'_, '_>) -> Option<Event> {
        if !self.assert_children_exactly(node, 2) {
            return None;
        }

        let mut children = elements(node);
        let (Some(first), Some(second)) = (children.next(), children.next()) else {
            return None;
        };

        let first_is_condition = matches!(tag(first).as_str(), "condition" | "conditions");
        let (condition_node, trigger_node) = if first_is_condition {
            (first, second)
        } else {
            (second, first)
        };

        let condition_tag = tag(condition_node);
        if condition_tag != "condition" && condition_tag != "conditions" {
            self.structure_error(
                condition_node,
                format!(
                    "Event tag must have \"condition\" or \"conditions\" child tag. \"{}\" found instead.",
                    condition_node.tag_name().name()
                ),
            );
            return None;
        }

        if !matches!(tag(trigger_node).as_str(), "trigger" | "triggers") {
            self.structure_error(
                trigger_node,
                format!(
                    "Event tag must have \"trigger\" or \"triggers\" child tag. \"{}\" found instead.",
                    trigger_node.tag_name().name()
                ),
            );
            return None;
        }

        let set_up_initially = self.bool_attribute(node, "settedUpInitially", false);
        let drops_on_fire = self.bool_attribute(node, "dropsOnFire", true);
        let id = self.id(node);

        let trigger = self.parse_triggers_alternative(trigger_node);
        let condition = if condition_tag == "condition" {
            self.parse_condition_tag(condition_node, &id)
        } else {
            self.parse_conditions_tag(condition_node, &id)
        };

        let mut event = Event::new(id, condition, trigger, drops_on_fire);
        if set_up_initially {
            event.set_up(self.now);
        }
        Some(event)
    }

    /// `constraint`: an armed event failing the scenario when its condition
    /// does not hold. `checkOnce` limits the check to the first tick.
    fn parse_constraint(&mut self, node: Node<'_, '_>) -> Option<Event> {
        if !self.assert_children_exactly(node, 1) {
            return None;
        }
        let fail_message = self.assert_attribute_non_empty(node, "failMessage")?;
        let check_once = self.bool_attribute(node, "checkOnce", false);
        let id = self.id(node);

        let child = elements(node).next()?;
        let mut condition = self.parse_conditions_alternative(child, &id);
        if check_once {
            condition = Condition::Combined {
                conditions: vec![timer(0, true, &id), condition],
                glue: Glue::And,
            };
        }

        let mut event = Event::new(
            id,
            condition.negate(),
            Trigger::Fail(fail_message.to_string()),
            true,
        );
        event.set_up(self.now);
        Some(event)
    }

    /// `timelimit`: an armed event failing the scenario once `value` ms
    /// have passed.
    fn parse_time_limit(&mut self, node: Node<'_, '_>) -> Option<Event> {
        self.assert_has_attribute(node, "value")?;
        let value = self.int_attribute(node, "value")?;
        if value < 0 {
            self.semantic_error(
                node,
                format!("Time limit must not be negative, got {value}."),
            );
            return None;
        }

        let id = self.id(node);
        let condition = timer(value, true, &id);
        let mut event = Event::new(
            id,
            condition,
            Trigger::Fail(TIME_LIMIT_MESSAGE.to_string()),
            true,
        );
        event.set_up(self.now);
        Some(event)
    }
}
