//! Fallback chain evaluation.

use crate::harness::{BrowserHarness, ElementSnapshot};
use crate::locator::LocatorSpec;
use crate::result::{ProbeError, ProbeResult};
use std::time::Duration;
use tracing::{debug, info};

/// The strategy that held and the element it found
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Position of the winning strategy in the chain
    pub strategy: usize,
    /// First element satisfying it
    pub element: ElementSnapshot,
}

impl Resolved {
    /// Whether the primary strategy held
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.strategy == 0
    }
}

/// Try each strategy in order, each with its own bounded wait.
///
/// Stops at the first strategy with a qualifying element; later strategies are
/// never queried.
///
/// # Errors
///
/// [`ProbeError::FallbackExhausted`] naming every strategy when none holds.
/// Backend errors propagate immediately.
pub async fn resolve<H: BrowserHarness + ?Sized>(
    harness: &H,
    spec: &LocatorSpec,
    timeout: Duration,
) -> ProbeResult<Resolved> {
    for (position, strategy) in spec.strategies.iter().enumerate() {
        debug!(check = %spec.name, strategy = %strategy, "trying locator strategy");
        if let Some(element) = harness
            .wait_for(&strategy.selector, strategy.requirement, timeout)
            .await?
        {
            let resolved = Resolved {
                strategy: position,
                element,
            };
            if !resolved.is_primary() {
                info!(check = %spec.name, strategy = %strategy, "resolved via fallback");
            }
            return Ok(resolved);
        }
    }
    Err(ProbeError::FallbackExhausted {
        check: spec.name.clone(),
        attempted: spec.describe(),
    })
}
