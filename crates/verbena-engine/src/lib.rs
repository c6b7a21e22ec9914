//! Verbena Engine
//!
//! A reference implementation of the [`verbena_pipeline::Engine`] contract.
//! The [`LocalEngine`] is built once at startup from static graph
//! definitions plus an action registry, then shared across resolver
//! invocations. Each submitted unit of work runs its named graph's actions
//! strictly in configured order; units in a batch run concurrently and are
//! returned in submission order.
//!
//! Misconfiguration (unknown action kind, unparseable action config,
//! duplicate graph name) is fatal at construction. At execution time the
//! only batch-level failures are an unknown graph discriminant and
//! cancellation; a graph whose action fails takes the failure transition,
//! which is recorded on the unit itself.

mod graph;
mod local;

pub use graph::{ActionDef, GraphDef};
pub use local::LocalEngine;
