//! Tour the scroll engine: symbolic directions, structured targets,
//! relative deltas, and a scripted batch, with the coordinate overlay on.

use anyhow::Result;
use pagehand::{
    BatchOperateOptions, BatchStep, Rect, ScrollOptions, ScrollTarget, Toolkit, VirtualPage,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let page = Arc::new(VirtualPage::new(800.0, 600.0));
    page.set_content_size(2000.0, 4000.0);
    page.add_element("button", Rect::new(40.0, 3440.0, 120.0, 40.0));

    let toolkit = Toolkit::new(page.clone());
    toolkit.overlay().start().await?;

    let fast = ScrollOptions {
        settle_ms: 50,
        ..ScrollOptions::default()
    };

    let down = toolkit.scroll("down", Some(300.0), &fast).await?;
    println!("down 300: {} -> {}", down.from, down.to);

    let bottom = toolkit
        .scroll_to_position(ScrollTarget::Bottom, &fast)
        .await?;
    println!("bottom: {} -> {}", bottom.from, bottom.to);

    let nudge = toolkit.scroll_by(0.0, -120.0, &fast).await?;
    println!("nudged by ({}, {}), now at {}", nudge.dx, nudge.dy, page.offset());

    // The same shape page scripts submit.
    let script = r#"[
        {"scroll": {"to": {"absolute": {"y": 3400}}},
         "action": {"click": {"x": 60, "y": 60}}}
    ]"#;
    let steps = BatchStep::steps_from_json(script)?;
    let results = toolkit
        .batch_operate(
            &steps,
            &BatchOperateOptions {
                scroll_delay_ms: 50,
                operation_delay_ms: 20,
            },
        )
        .await?;
    println!("batch produced {} outcome(s)", results.len());

    toolkit.overlay().stop().await?;
    Ok(())
}
