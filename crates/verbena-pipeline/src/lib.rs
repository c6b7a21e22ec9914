//! Verbena Pipeline
//!
//! This crate contains the unit-of-work data model shared between field
//! resolvers and the task-execution engine, the [`Action`] trait that
//! pipeline steps implement, the explicit [`ActionRegistry`] that maps
//! action kinds to factories, and the [`Engine`] contract the resolver
//! layer submits work to.
//!
//! The payload-key contract lives here as well:
//!
//! - resolution arguments are written under the reserved [`GQL_NAMESPACE`]
//!   key of the input's configuration block,
//! - each action writes its natural output under
//!   `payload[<actionName>]["_result"]` (see [`RESULT_KEY`]),
//! - the [`ExposeData`] action relocates a `_result` sub-value to a
//!   well-known destination such as [`FETCHED_DATA_KEY`], which is the only
//!   payload location the resolver layer reads.

mod action;
pub mod actions;
mod context;
mod engine;
mod registry;
mod unit;

pub use action::{Action, ActionError};
pub use actions::{EXPOSE_DATA_KIND, ExposeData, HTTP_FETCH_KIND, HttpFetch};
pub use context::RequestContext;
pub use engine::{Engine, EngineError};
pub use registry::{ActionFactory, ActionRegistry};
pub use unit::{
  FETCHED_DATA_KEY, FailureKind, GQL_NAMESPACE, PipelineInput, RESULT_KEY, UnitFailure,
  UnitOfWork, lookup_path,
};
