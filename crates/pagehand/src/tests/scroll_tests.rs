//! Tests for scroll computation, clamping, and settle timing.

use super::support::{scrollable_page, toolkit};
use crate::errors::AutomationError;
use crate::scroller::{ScrollTarget, Scroller};
use crate::types::{Point, Rect, ScrollOptions, ScrollToElementOptions};
use std::time::Duration;
use tokio::time::Instant;

fn quick() -> ScrollOptions {
    ScrollOptions {
        settle_ms: 0,
        ..ScrollOptions::default()
    }
}

#[tokio::test(start_paused = true)]
async fn directional_scroll_moves_by_distance_and_accumulates() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let first = toolkit
        .scroll("down", Some(300.0), &quick())
        .await
        .expect("scroll should succeed");
    assert_eq!(first.from, Point::new(0.0, 0.0));
    assert_eq!(first.to, Point::new(0.0, 300.0));

    let second = toolkit
        .scroll("down", Some(300.0), &quick())
        .await
        .expect("scroll should succeed");
    assert_eq!(second.to, Point::new(0.0, 600.0));
    assert_eq!(page.offset(), Point::new(0.0, 600.0));
}

#[tokio::test(start_paused = true)]
async fn directional_scroll_without_distance_snaps_to_extreme() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let down = toolkit.scroll("down", None, &quick()).await.unwrap();
    assert_eq!(down.to, Point::new(0.0, 1000.0));

    let up = toolkit.scroll("up", None, &quick()).await.unwrap();
    assert_eq!(up.to, Point::new(0.0, 0.0));

    let right = toolkit.scroll("right", None, &quick()).await.unwrap();
    assert_eq!(right.to, Point::new(1000.0, 0.0));

    let left = toolkit.scroll("left", None, &quick()).await.unwrap();
    assert_eq!(left.to, Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn directional_scroll_clamps_to_content_bounds() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let outcome = toolkit.scroll("down", Some(99_999.0), &quick()).await.unwrap();
    assert_eq!(outcome.to, Point::new(0.0, 1000.0));

    let outcome = toolkit.scroll("up", Some(99_999.0), &quick()).await.unwrap();
    assert_eq!(outcome.to, Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn direction_parsing_is_case_insensitive() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let outcome = toolkit.scroll("DOWN", Some(100.0), &quick()).await.unwrap();
    assert_eq!(outcome.to, Point::new(0.0, 100.0));
}

#[tokio::test(start_paused = true)]
async fn invalid_direction_rejects_before_any_scroll() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let started = Instant::now();
    let err = toolkit
        .scroll("diagonal", Some(100.0), &ScrollOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::InvalidDirection(_)));
    assert_eq!(page.offset(), Point::new(0.0, 0.0));
    // Rejected synchronously: not even the settle delay ran.
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn scroll_waits_the_settle_delay() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let started = Instant::now();
    toolkit
        .scroll("down", Some(10.0), &ScrollOptions::default())
        .await
        .unwrap();
    assert_eq!(started.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn absolute_target_sets_and_clamps_offsets() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let outcome = toolkit
        .scroll_to_position(ScrollTarget::absolute(200.0, 400.0), &quick())
        .await
        .unwrap();
    assert_eq!(outcome.to, Point::new(200.0, 400.0));

    let outcome = toolkit
        .scroll_to_position(ScrollTarget::absolute(5000.0, 5000.0), &quick())
        .await
        .unwrap();
    assert_eq!(outcome.to, Point::new(1000.0, 1000.0));
}

#[tokio::test(start_paused = true)]
async fn absolute_target_keeps_the_unspecified_axis() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    toolkit
        .scroll_to_position(ScrollTarget::absolute(300.0, 700.0), &quick())
        .await
        .unwrap();
    let outcome = toolkit
        .scroll_to_position(
            ScrollTarget::Absolute {
                x: None,
                y: Some(100.0),
            },
            &quick(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.to, Point::new(300.0, 100.0));
}

#[tokio::test(start_paused = true)]
async fn top_homes_both_axes() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    toolkit
        .scroll_to_position(ScrollTarget::absolute(400.0, 400.0), &quick())
        .await
        .unwrap();
    let outcome = toolkit
        .scroll_to_position(ScrollTarget::Top, &quick())
        .await
        .unwrap();
    assert_eq!(outcome.to, Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn edge_targets_touch_one_axis_only() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    toolkit
        .scroll_to_position(ScrollTarget::absolute(400.0, 400.0), &quick())
        .await
        .unwrap();

    let bottom = toolkit
        .scroll_to_position(ScrollTarget::Bottom, &quick())
        .await
        .unwrap();
    assert_eq!(bottom.to, Point::new(400.0, 1000.0));

    let left = toolkit
        .scroll_to_position(ScrollTarget::LeftEdge, &quick())
        .await
        .unwrap();
    assert_eq!(left.to, Point::new(0.0, 1000.0));

    let right = toolkit
        .scroll_to_position(ScrollTarget::RightEdge, &quick())
        .await
        .unwrap();
    assert_eq!(right.to, Point::new(1000.0, 1000.0));
}

#[tokio::test(start_paused = true)]
async fn scroll_by_goes_through_the_page_primitive() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let outcome = toolkit.scroll_by(120.0, 250.0, &quick()).await.unwrap();
    assert_eq!(outcome.dx, 120.0);
    assert_eq!(outcome.dy, 250.0);
    assert_eq!(page.offset(), Point::new(120.0, 250.0));

    // Negative deltas out of range: the page clamps, not the toolkit.
    toolkit.scroll_by(-9000.0, -9000.0, &quick()).await.unwrap();
    assert_eq!(page.offset(), Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn element_scroll_targets_the_container_not_the_viewport() {
    let page = scrollable_page();
    let container =
        page.add_scroll_container("div", Rect::new(0.0, 0.0, 200.0, 200.0), 200.0, 900.0);
    let toolkit = toolkit(&page);

    let options = ScrollOptions {
        element: Some(container.clone()),
        settle_ms: 0,
        ..ScrollOptions::default()
    };
    let outcome = toolkit.scroll("down", Some(300.0), &options).await.unwrap();

    assert_eq!(outcome.to, Point::new(0.0, 300.0));
    assert_eq!(page.element_offset(&container), Some(Point::new(0.0, 300.0)));
    assert_eq!(page.offset(), Point::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn scroll_to_element_resolves_selectors_and_reports_bounds() {
    let page = scrollable_page();
    page.add_element_with_id("button", "submit", Rect::new(100.0, 1200.0, 80.0, 40.0));
    let toolkit = toolkit(&page);

    let options = ScrollToElementOptions {
        settle_ms: 0,
        ..ScrollToElementOptions::default()
    };
    let outcome = toolkit
        .scroll_to_element("#submit", &options)
        .await
        .expect("scroll to element should succeed");

    assert_eq!(outcome.element.tag, "button");
    assert_eq!(page.offset(), Point::new(0.0, 1000.0));
    // Viewport-relative rectangle after the scroll settled.
    assert_eq!(outcome.rect, Rect::new(100.0, 200.0, 80.0, 40.0));
}

#[tokio::test(start_paused = true)]
async fn scroll_to_element_fails_for_unmatched_selectors() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    let err = toolkit
        .scroll_to_element("#missing", &ScrollToElementOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::ElementNotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn position_reports_offset_and_extents() {
    let page = scrollable_page();
    let toolkit = toolkit(&page);

    toolkit
        .scroll_to_position(ScrollTarget::absolute(50.0, 75.0), &quick())
        .await
        .unwrap();

    let position = toolkit.position(None).await.unwrap();
    assert_eq!(position.offset(), Point::new(50.0, 75.0));
    assert_eq!(position.client_width, 800.0);
    assert_eq!(position.client_height, 600.0);
    assert_eq!(position.scroll_width, 1800.0);
    assert_eq!(position.scroll_height, 1600.0);
    assert_eq!(position.max_x(), 1000.0);
    assert_eq!(position.max_y(), 1000.0);
}

#[tokio::test(start_paused = true)]
async fn standalone_scroller_scrolls_without_an_interaction_layer() {
    let page = scrollable_page();
    let scroller = Scroller::new(page.clone());

    let outcome = scroller.scroll("down", Some(40.0), &quick()).await.unwrap();
    assert_eq!(outcome.to, Point::new(0.0, 40.0));
}
