//! Optimization pass
//!
//! Holds at most one optimizer per content type plus an optional compressor.
//! A failing optimizer never fails the build: the original bytes are kept
//! and a warning is reported.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{trace, warn};

use crate::domain::ports::{Compressor, ContentType, Optimizer};
use crate::error::{SheafError, SheafResult};

/// Non-fatal optimizer failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationWarning {
    pub asset: String,
    pub optimizer: String,
    pub message: String,
}

impl fmt::Display for OptimizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "optimizer '{}' failed on {}: {} (kept original)",
            self.optimizer, self.asset, self.message
        )
    }
}

/// One asset awaiting optimization.
#[derive(Debug, Clone)]
pub struct OptimizeItem {
    /// Name used in warnings
    pub name: String,
    pub content_type: Option<ContentType>,
    pub bytes: Vec<u8>,
}

#[derive(Default, Clone)]
pub struct OptimizerSet {
    optimizers: BTreeMap<ContentType, Arc<dyn Optimizer>>,
    compressor: Option<Arc<dyn Compressor>>,
}

impl OptimizerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the optimizer for its content type; a second one for the same
    /// type is rejected.
    pub fn register(&mut self, optimizer: Arc<dyn Optimizer>) -> SheafResult<()> {
        let content_type = optimizer.content_type();
        if let Some(existing) = self.optimizers.get(&content_type) {
            return Err(SheafError::DuplicateRegistration {
                kind: "optimizer",
                name: format!("{} ({:?} already handled by {})", optimizer.name(), content_type, existing.name()),
            });
        }
        self.optimizers.insert(content_type, optimizer);
        Ok(())
    }

    pub fn set_compressor(&mut self, compressor: Arc<dyn Compressor>) {
        self.compressor = Some(compressor);
    }

    pub fn compressor(&self) -> Option<&dyn Compressor> {
        self.compressor.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.optimizers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.optimizers.values().map(|o| o.name()).collect()
    }

    /// Optimize one asset.
    pub fn optimize(&self, item: OptimizeItem) -> (Vec<u8>, Option<OptimizationWarning>) {
        let Some(optimizer) = item.content_type.and_then(|t| self.optimizers.get(&t)) else {
            return (item.bytes, None);
        };
        match optimizer.optimize(&item.bytes) {
            Ok(bytes) => {
                trace!(
                    asset = %item.name,
                    before = item.bytes.len(),
                    after = bytes.len(),
                    "optimized"
                );
                (bytes, None)
            }
            Err(message) => {
                let warning = OptimizationWarning {
                    asset: item.name,
                    optimizer: optimizer.name().to_string(),
                    message,
                };
                warn!("{}", warning);
                (item.bytes, Some(warning))
            }
        }
    }

    /// Optimize independent assets in parallel; output order matches input.
    pub fn optimize_all(&self, items: Vec<OptimizeItem>) -> Vec<(Vec<u8>, Option<OptimizationWarning>)> {
        items.into_par_iter().map(|item| self.optimize(item)).collect()
    }
}

impl fmt::Debug for OptimizerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizerSet")
            .field("optimizers", &self.names())
            .field("compress", &self.compressor.is_some())
            .finish()
    }
}
