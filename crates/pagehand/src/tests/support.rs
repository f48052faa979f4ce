//! Shared fixtures for the unit tests.

use crate::page::VirtualPage;
use crate::Toolkit;
use std::sync::Arc;

/// 800x600 viewport with content matching the viewport (nothing to scroll).
pub(crate) fn page() -> Arc<VirtualPage> {
    Arc::new(VirtualPage::new(800.0, 600.0))
}

/// 800x600 viewport over 1800x1600 content: max scroll extent is 1000 on
/// both axes.
pub(crate) fn scrollable_page() -> Arc<VirtualPage> {
    let page = Arc::new(VirtualPage::new(800.0, 600.0));
    page.set_content_size(1800.0, 1600.0);
    page
}

pub(crate) fn toolkit(page: &Arc<VirtualPage>) -> Toolkit {
    Toolkit::new(page.clone())
}
