//! Live cursor-coordinate readout
//!
//! Thin lifecycle wrapper around the engine's overlay rendering. The
//! "is displaying" flag is explicit instance state on this object; starting
//! twice or stopping twice is a logged no-op.

use crate::errors::AutomationError;
use crate::page::PageEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct CoordinateOverlay {
    engine: Arc<dyn PageEngine>,
    displaying: AtomicBool,
}

impl CoordinateOverlay {
    pub fn new(engine: Arc<dyn PageEngine>) -> Self {
        Self {
            engine,
            displaying: AtomicBool::new(false),
        }
    }

    /// Show the coordinate readout.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), AutomationError> {
        if self.displaying.swap(true, Ordering::SeqCst) {
            debug!("coordinate overlay already displaying");
            return Ok(());
        }
        if let Err(e) = self.engine.show_coordinate_overlay().await {
            self.displaying.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// Remove the coordinate readout.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), AutomationError> {
        if !self.displaying.swap(false, Ordering::SeqCst) {
            debug!("coordinate overlay not displaying");
            return Ok(());
        }
        if let Err(e) = self.engine.hide_coordinate_overlay().await {
            self.displaying.store(true, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    pub fn is_displaying(&self) -> bool {
        self.displaying.load(Ordering::SeqCst)
    }
}
