//! Integration tests for end-to-end constraint evaluation.
//!
//! These tests verify the full pipeline:
//! Parse document → Arm events → Tick against a scripted world → Verify

use arbiter_dsl::{DiagnosticKind, TIME_LIMIT_MESSAGE};
use arbiter_runtime::{
    Condition, ConditionContext, EventState, Events, Glue, ManualClock, ObjectTable, Outcome,
    Scalar, SimObject, Trigger, Value, Variables,
};
use arbiter_tests::TestHarness;

fn parse(source: &str) -> Result<Events, Vec<arbiter_dsl::Diagnostic>> {
    arbiter_dsl::parse(source, &ManualClock::default())
}

/// Scenario with a generous time limit and the given entries.
fn scenario(entries: &str) -> String {
    format!(r#"<constraints><timelimit value="100000"/>{entries}</constraints>"#)
}

#[test]
fn test_time_limit_is_mandatory_and_unique() {
    let none = parse(r#"<constraints><constraint failMessage="m"><dropped id="x"/></constraint></constraints>"#);
    let diagnostics = none.unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Semantic);

    let two = parse(r#"<constraints><timelimit value="1"/><TIMELIMIT value="2"/></constraints>"#);
    assert!(two.is_err());

    assert!(parse(r#"<constraints><timelimit value="1"/></constraints>"#).is_ok());
}

#[test]
fn test_time_limit_fails_on_deadline() {
    let source = r#"<constraints><timelimit id="limit" value="5000"/></constraints>"#;

    let events = parse(source).unwrap();
    assert_eq!(events.len(), 1);
    let event = events.get(&"limit".into()).unwrap();
    assert_eq!(event.state(), EventState::Armed);
    assert_eq!(event.trigger(), &Trigger::Fail(TIME_LIMIT_MESSAGE.into()));
    assert_eq!(
        event.condition(),
        &Condition::Timer {
            timeout: 5000,
            force_drop: true,
            timestamp: Value::Timestamp,
            owner: "limit".into(),
        }
    );

    let mut harness = TestHarness::from_source(source);
    assert_eq!(harness.run_for(5000), None);
    assert_eq!(harness.now(), 5000);
    assert_eq!(
        harness.tick(),
        Some(Outcome::Failure("Program worked for too long time".into()))
    );
    assert_eq!(harness.event_state("limit"), Some(EventState::Dropped));
}

#[test]
fn test_constraint_fails_when_condition_breaks() {
    let source = scenario(
        r#"<constraint id="speed" failMessage="too fast">
            <notGreater><objectState objectId="robot" property="speed"/><int value="10"/></notGreater>
        </constraint>"#,
    );
    let mut harness = TestHarness::from_source(&source)
        .with_object("robot", SimObject::new("robot").with_property("speed", 5_i64));

    assert_eq!(harness.run_for(100), None);

    harness
        .objects_mut()
        .insert("robot", SimObject::new("robot").with_property("speed", 12.5));
    assert_eq!(harness.tick(), Some(Outcome::Failure("too fast".into())));
}

#[test]
fn test_check_once_constraint_fires_on_first_tick() {
    let source = scenario(
        r#"<constraint id="c" failMessage="bad" checkOnce="true">
            <equals><int value="1"/><int value="2"/></equals>
        </constraint>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    assert_eq!(harness.tick(), Some(Outcome::Failure("bad".into())));
    assert_eq!(harness.event_state("c"), Some(EventState::Dropped));
    assert_eq!(harness.tick(), None);
}

#[test]
fn test_check_once_constraint_is_never_rechecked() {
    let source = scenario(
        r#"<constraint id="c" failMessage="bad" checkOnce="true">
            <equals><variableValue name="mode"/><string value="auto"/></equals>
        </constraint>"#,
    );
    let mut harness = TestHarness::from_source(&source);
    harness.set_variable("mode", "auto");

    assert_eq!(harness.tick(), None);
    assert_eq!(harness.event_state("c"), Some(EventState::Dropped));

    harness.set_variable("mode", "manual");
    assert_eq!(harness.run_for(1000), None);
}

#[test]
fn test_empty_combinations() {
    let variables = Variables::new();
    let objects = ObjectTable::new();
    let clock = ManualClock::default();
    let events = Events::new();
    let mut ctx = ConditionContext::new(&variables, &objects, &clock, &events);

    let all = Condition::Combined {
        conditions: vec![],
        glue: Glue::And,
    };
    let any = Condition::Combined {
        conditions: vec![],
        glue: Glue::Or,
    };
    assert!(all.evaluate(&mut ctx));
    assert!(!any.evaluate(&mut ctx));
}

#[test]
fn test_forced_timer_drops_persistent_event() {
    let source = scenario(
        r#"<event id="t" settedUpInitially="true" dropsOnFire="false">
            <condition><timer timeout="100"/></condition>
            <trigger><addToVariable name="fired" value="1"/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    assert_eq!(harness.run_for(100), None);
    assert_eq!(harness.variable("fired"), None);
    assert_eq!(harness.event_state("t"), Some(EventState::Armed));

    harness.tick();
    assert_eq!(harness.variable("fired"), Some(&Scalar::Int(1)));
    assert_eq!(harness.event_state("t"), Some(EventState::Dropped));

    harness.run_for(500);
    assert_eq!(harness.variable("fired"), Some(&Scalar::Int(1)));
}

#[test]
fn test_unforced_timer_keeps_firing() {
    let source = scenario(
        r#"<event settedUpInitially="true" dropsOnFire="false">
            <condition><timer timeout="50" forceDropOnTimeout="false"/></condition>
            <trigger><addToVariable name="fired" value="1"/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    // Ticks at 0..=90 every 10 ms; the timer holds from 50 on
    harness.run_for(100);
    assert_eq!(harness.variable("fired"), Some(&Scalar::Int(5)));
}

#[test]
fn test_drops_on_fire_controls_repetition() {
    let source = scenario(
        r#"<event id="once" settedUpInitially="true">
            <condition><settedUp id="once"/></condition>
            <trigger><addToVariable name="once" value="1"/></trigger>
        </event>
        <event id="always" settedUpInitially="true" dropsOnFire="false">
            <condition><settedUp id="always"/></condition>
            <trigger><addToVariable name="always" value="1"/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    for _ in 0..4 {
        harness.tick();
    }
    assert_eq!(harness.variable("once"), Some(&Scalar::Int(1)));
    assert_eq!(harness.variable("always"), Some(&Scalar::Int(4)));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let source = scenario(
        r#"<constraint id="x" failMessage="a"><dropped id="y"/></constraint>
        <constraint id="x" failMessage="b"><dropped id="y"/></constraint>"#,
    );
    let diagnostics = parse(&source).unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "Duplicate id: \"x\"");
}

#[test]
fn test_set_variable_sniffs_double() {
    let source = scenario(
        r#"<event settedUpInitially="true">
            <condition><not><dropped id="never"/></not></condition>
            <trigger><setVariable name="n" value="3.5"/></trigger>
        </event>
        <event settedUpInitially="true">
            <condition><equals><variableValue name="n"/><double value="3.5"/></equals></condition>
            <trigger><success/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    assert_eq!(harness.tick(), Some(Outcome::Success));
    assert_eq!(harness.variable("n"), Some(&Scalar::Double(3.5)));
}

#[test]
fn test_event_chain_through_setup_and_drop() {
    let source = scenario(
        r#"<event id="start" settedUpInitially="true">
            <condition><inside objectId="robot" regionId="start"/></condition>
            <triggers><setUp id="finish"/><drop id="leave"/></triggers>
        </event>
        <event id="leave" settedUpInitially="true">
            <condition><not><inside objectId="robot" regionId="start"/></not></condition>
            <trigger><fail message="left too early"/></trigger>
        </event>
        <event id="finish">
            <condition><inside objectId="robot" regionId="finish"/></condition>
            <trigger><success/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source)
        .with_object("robot", SimObject::new("robot").with_region("start"));

    assert_eq!(harness.event_state("finish"), Some(EventState::Unarmed));
    assert_eq!(harness.tick(), None);
    assert_eq!(harness.event_state("start"), Some(EventState::Dropped));
    assert_eq!(harness.event_state("leave"), Some(EventState::Dropped));
    assert_eq!(harness.event_state("finish"), Some(EventState::Armed));

    harness
        .objects_mut()
        .insert("robot", SimObject::new("robot").with_region("middle"));
    assert_eq!(harness.run_for(200), None);

    harness
        .objects_mut()
        .insert("robot", SimObject::new("robot").with_region("finish"));
    assert_eq!(harness.tick(), Some(Outcome::Success));
}

#[test]
fn test_timer_measures_from_arming() {
    let source = scenario(
        r#"<event id="arm" settedUpInitially="true">
            <condition><equals><variableValue name="go"/><int value="1"/></equals></condition>
            <trigger><setUp id="wait"/></trigger>
        </event>
        <event id="wait">
            <condition><timer timeout="300"/></condition>
            <trigger><success/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);

    harness.advance(1000);
    harness.set_variable("go", 1_i64);
    assert_eq!(harness.tick(), None);
    assert_eq!(harness.event_state("wait"), Some(EventState::Armed));

    harness.advance(290);
    assert_eq!(harness.tick(), None);
    harness.advance(10);
    assert_eq!(harness.tick(), Some(Outcome::Success));
}

#[test]
fn test_type_and_property_queries() {
    let source = scenario(
        r#"<constraint failMessage="wrong object">
            <conditions glue="and">
                <equals><typeOf objectId="box"/><string value="cube"/></equals>
                <notLess><objectState objectId="box" property="mass"/><double value="0.5"/></notLess>
            </conditions>
        </constraint>"#,
    );
    let mut harness = TestHarness::from_source(&source).with_object(
        "box",
        SimObject::new("cube").with_property("mass", 0.5),
    );
    assert_eq!(harness.run_for(50), None);

    harness.objects_mut().remove("box");
    assert_eq!(harness.tick(), Some(Outcome::Failure("wrong object".into())));
}

#[test]
fn test_add_to_variable_accumulates() {
    let source = scenario(
        r#"<event settedUpInitially="true" dropsOnFire="false">
            <condition><less><variableValue name="total"/><int value="3"/></less></condition>
            <triggers>
                <addToVariable name="total" value="1"/>
                <addToVariable name="score" value="0.5"/>
            </triggers>
        </event>
        <event settedUpInitially="true">
            <condition><equals><variableValue name="total"/><int value="3"/></equals></condition>
            <trigger><success/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);
    harness.set_variable("total", 0_i64);

    assert_eq!(harness.tick(), None);
    assert_eq!(harness.tick(), None);
    assert_eq!(harness.tick(), Some(Outcome::Success));
    assert_eq!(harness.variable("total"), Some(&Scalar::Int(3)));
    assert_eq!(harness.variable("score"), Some(&Scalar::Double(1.5)));
    assert_eq!(harness.current_tick(), 3);
}

#[test]
fn test_missing_variable_is_only_not_equal() {
    let source = scenario(
        r#"<event settedUpInitially="true">
            <condition>
                <conditions glue="or">
                    <equals><variableValue name="ghost"/><int value="0"/></equals>
                    <greater><variableValue name="ghost"/><int value="0"/></greater>
                    <less><variableValue name="ghost"/><int value="0"/></less>
                </conditions>
            </condition>
            <trigger><fail message="invalid compared"/></trigger>
        </event>
        <event settedUpInitially="true">
            <condition><notEqual><variableValue name="ghost"/><int value="0"/></notEqual></condition>
            <trigger><success/></trigger>
        </event>"#,
    );
    let mut harness = TestHarness::from_source(&source);
    assert_eq!(harness.tick(), Some(Outcome::Success));
}

#[test]
fn test_empty_document_never_decides() {
    let mut harness = TestHarness::from_source("");
    assert_eq!(harness.run_for(10_000), None);
    assert!(harness.runtime().events().is_empty());
}

#[test]
fn test_run_for_stops_at_end_of_clock() {
    let mut harness = TestHarness::from_source("");
    harness.advance(i64::MAX - 25);
    assert_eq!(harness.run_for(i64::MAX), None);
    assert_eq!(harness.now(), i64::MAX);
    assert_eq!(harness.runtime().tick_count(), 3);
}

#[test]
fn test_evaluation_is_deterministic() {
    let source = scenario(
        r#"<event settedUpInitially="true" dropsOnFire="false">
            <condition><timer timeout="0" forceDropOnTimeout="false"/></condition>
            <trigger><addToVariable name="ticks" value="1"/></trigger>
        </event>
        <event settedUpInitially="true">
            <condition><notLess><variableValue name="ticks"/><int value="7"/></notLess></condition>
            <trigger><success/></trigger>
        </event>"#,
    );

    let run = || {
        let mut harness = TestHarness::from_source(&source).with_step(25);
        let outcome = harness.run_for(1000);
        (outcome, harness.now(), harness.current_tick())
    };
    assert_eq!(run(), run());
    assert_eq!(run(), (Some(Outcome::Success), 150, 7));
}
