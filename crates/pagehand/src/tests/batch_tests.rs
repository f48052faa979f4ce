//! Tests for gesture batches, the batch orchestrator, and operation
//! scripts.

use super::support::{page, scrollable_page, toolkit};
use crate::errors::AutomationError;
use crate::events::EventKind;
use crate::interactor::{InteractionOp, InteractionOutcome};
use crate::scroller::{BatchStep, ScrollOp, ScrollTarget, Scroller};
use crate::types::{
    BatchOperateOptions, BatchOptions, Point, Rect, ScrollAndClickOptions, TypeOptions,
};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn gesture_batch_runs_in_order_with_uniform_delay() {
    let page = page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    page.add_input("input", Rect::new(0.0, 100.0, 200.0, 30.0));
    let toolkit = toolkit(&page);

    let operations = vec![
        InteractionOp::click(50.0, 20.0),
        InteractionOp::Type {
            x: 50.0,
            y: 110.0,
            text: "ok".to_string(),
            options: TypeOptions {
                typing_delay_ms: 0,
                ..TypeOptions::default()
            },
        },
        InteractionOp::click(50.0, 20.0),
    ];

    let started = Instant::now();
    let results = toolkit
        .batch(&operations, &BatchOptions::default())
        .await
        .expect("batch should succeed");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].kind(), "click");
    assert_eq!(results[1].kind(), "type");
    assert_eq!(results[2].kind(), "click");

    // Two inter-operation delays of 1000ms; nothing after the last.
    assert_eq!(started.elapsed(), Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn gesture_batch_aborts_on_first_failure() {
    let page = page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    let toolkit = toolkit(&page);

    let operations = vec![
        InteractionOp::click(50.0, 20.0),
        // Nothing lives at this point.
        InteractionOp::click(700.0, 500.0),
        InteractionOp::click(50.0, 20.0),
    ];

    let err = toolkit
        .batch(&operations, &BatchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::ElementNotFound(_)));
    // The third operation never ran.
    assert_eq!(page.events_of(EventKind::Click).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn batch_operate_scrolls_then_acts_per_step() {
    let page = scrollable_page();
    page.add_element("button", Rect::new(100.0, 1100.0, 80.0, 40.0));
    let input = page.add_input("input", Rect::new(0.0, 1050.0, 200.0, 30.0));
    let toolkit = toolkit(&page);

    let steps = vec![
        BatchStep::default()
            .with_scroll(ScrollOp::To(ScrollTarget::Bottom))
            .with_action(InteractionOp::click(120.0, 120.0)),
        BatchStep::default().with_action(InteractionOp::Type {
            x: 10.0,
            y: 60.0,
            text: "hi".to_string(),
            options: TypeOptions::default(),
        }),
    ];

    let results = toolkit
        .batch_operate(&steps, &BatchOperateOptions::default())
        .await
        .expect("batch should succeed");

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], InteractionOutcome::Click(ref c) if c.tag_name == "button"));
    assert!(matches!(results[1], InteractionOutcome::Type(_)));
    assert_eq!(page.value_of(&input).as_deref(), Some("hi"));
    assert_eq!(page.offset(), Point::new(0.0, 1000.0));
}

#[tokio::test(start_paused = true)]
async fn batch_operate_rejects_on_first_failing_step() {
    let page = scrollable_page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    let toolkit = toolkit(&page);

    let steps = vec![
        BatchStep::default().with_scroll(ScrollOp::Direction {
            direction: "down".parse().expect("valid direction"),
            distance: Some(100.0),
        }),
        // Viewport point over empty content after the scroll.
        BatchStep::default().with_action(InteractionOp::click(700.0, 500.0)),
        BatchStep::default().with_action(InteractionOp::click(50.0, 20.0)),
    ];

    let err = toolkit
        .batch_operate(&steps, &BatchOperateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::ElementNotFound(_)));
    // Step 1's scroll ran, no click ever dispatched.
    assert_eq!(page.offset(), Point::new(0.0, 100.0));
    assert!(page.events_of(EventKind::Click).is_empty());
}

#[tokio::test(start_paused = true)]
async fn batch_operate_without_interactions_is_module_unavailable() {
    let page = page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    let scroller = Scroller::new(page.clone());

    let steps = vec![BatchStep::default().with_action(InteractionOp::click(50.0, 20.0))];
    let err = scroller
        .batch_operate(&steps, &BatchOperateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::ModuleUnavailable(_)));
    assert!(page.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn scroll_and_click_scrolls_waits_then_clicks() {
    let page = scrollable_page();
    page.add_element("button", Rect::new(100.0, 1100.0, 80.0, 40.0));
    let toolkit = toolkit(&page);

    let started = Instant::now();
    let outcome = toolkit
        .scroll_and_click(0.0, 1000.0, 120.0, 120.0, &ScrollAndClickOptions::default())
        .await
        .expect("scroll and click should succeed");

    assert_eq!(outcome.scroll_position, Point::new(0.0, 1000.0));
    assert_eq!(outcome.click_position, Point::new(120.0, 120.0));
    assert_eq!(outcome.click.tag_name, "button");
    // Scroll settle (500ms) plus the fixed pre-click gap (300ms).
    assert_eq!(started.elapsed(), Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn scroll_and_click_requires_the_interaction_layer_up_front() {
    let page = scrollable_page();
    let scroller = Scroller::new(page.clone());

    let err = scroller
        .scroll_and_click(0.0, 500.0, 10.0, 10.0, &ScrollAndClickOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::ModuleUnavailable(_)));
    // Checked before anything scrolled.
    assert_eq!(page.offset(), Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn stop_execution_interrupts_suspended_steps() {
    let page = page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    let toolkit = toolkit(&page);

    let stopper = toolkit.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stopper.stop_execution();
    });

    let operations = vec![
        InteractionOp::click(50.0, 20.0),
        InteractionOp::click(50.0, 20.0),
    ];
    let err = toolkit
        .batch(&operations, &BatchOptions::default())
        .await
        .unwrap_err();

    // The first click lands, then the inter-operation delay is cancelled.
    assert!(matches!(err, AutomationError::OperationCancelled(_)));
    assert_eq!(page.events_of(EventKind::Click).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_cancellation_allows_new_operations() {
    let page = page();
    page.add_element("button", Rect::new(0.0, 0.0, 100.0, 40.0));
    let toolkit = toolkit(&page);

    toolkit.stop_execution();
    let err = toolkit.delay(1000).await.unwrap_err();
    assert!(matches!(err, AutomationError::OperationCancelled(_)));

    toolkit.reset_cancellation();
    toolkit.delay(10).await.expect("delay should run again");
    toolkit
        .double_click(50.0, 20.0, &Default::default())
        .await
        .expect("gestures should run again");
}

#[test]
fn operation_scripts_parse_from_json() {
    let script = r#"[
        {"click": {"x": 10, "y": 20}},
        {"type": {"x": 1, "y": 2, "text": "hi", "options": {"typingDelay": 10, "clear": true}}},
        {"drag": {"startX": 0, "startY": 0, "endX": 50, "endY": 60, "options": {"duration": 100}}}
    ]"#;

    let ops = InteractionOp::ops_from_json(script).expect("script should parse");
    assert_eq!(ops.len(), 3);
    assert!(matches!(ops[0], InteractionOp::Click { x, y, .. } if x == 10.0 && y == 20.0));
    assert!(matches!(
        &ops[1],
        InteractionOp::Type { text, options, .. }
            if text == "hi" && options.typing_delay_ms == 10 && options.clear
    ));
    assert!(matches!(
        ops[2],
        InteractionOp::Drag { end_x, options, .. }
            if end_x == 50.0 && options.duration_ms == 100
    ));
}

#[test]
fn batch_scripts_parse_scroll_directives() {
    let script = r#"[
        {"scroll": {"direction": {"direction": "down", "distance": 300}},
         "action": {"click": {"x": 1, "y": 2}}},
        {"scroll": {"to": {"absolute": {"x": 0, "y": 50}}}}
    ]"#;

    let steps = BatchStep::steps_from_json(script).expect("script should parse");
    assert_eq!(steps.len(), 2);
    assert!(steps[0].scroll.is_some());
    assert!(steps[0].action.is_some());
    assert!(steps[1].action.is_none());
}

#[test]
fn batch_scripts_reject_unknown_directions_before_execution() {
    let script = r#"[{"scroll": {"direction": {"direction": "diagonal"}}}]"#;

    let err = BatchStep::steps_from_json(script).unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)));
}

#[test]
fn outcomes_serialize_with_script_field_names() {
    let outcome = InteractionOutcome::Click(crate::types::ClickOutcome {
        element: crate::page::ElementRef {
            id: 7,
            tag: "button".to_string(),
        },
        tag_name: "button".to_string(),
        coordinates: Point::new(3.0, 4.0),
    });

    let json = serde_json::to_value(&outcome).expect("should serialize");
    assert_eq!(json["click"]["tagName"], "button");
    assert_eq!(json["click"]["coordinates"]["x"], 3.0);
}
