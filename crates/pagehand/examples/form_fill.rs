//! Fill and submit a form on the in-memory page, printing each outcome.
//!
//! Run with `RUST_LOG=pagehand=debug` to watch the gesture sequencing.

use anyhow::Result;
use pagehand::{ClickOptions, Rect, Toolkit, TypeOptions, VirtualPage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let page = Arc::new(VirtualPage::new(1024.0, 768.0));
    let field = page.add_input("input", Rect::new(100.0, 100.0, 300.0, 30.0));
    page.add_element("button", Rect::new(100.0, 150.0, 120.0, 40.0));

    let toolkit = Toolkit::new(page.clone());

    let typed = toolkit
        .type_text(
            150.0,
            115.0,
            "hello page",
            &TypeOptions {
                typing_delay_ms: 10,
                ..TypeOptions::default()
            },
        )
        .await?;
    println!(
        "typed {:?} into <{}>, value is now {:?}",
        typed.text,
        typed.tag_name,
        page.value_of(&field)
    );

    let clicked = toolkit.click(150.0, 170.0, &ClickOptions::default()).await?;
    println!("clicked <{}> at {}", clicked.tag_name, clicked.coordinates);

    println!("{} events dispatched in total", page.events().len());
    Ok(())
}
