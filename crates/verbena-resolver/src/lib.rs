//! Verbena Resolver
//!
//! Task-backed field resolvers: the bridge between a declarative
//! query-resolution layer (GraphQL-style operations with named arguments)
//! and the task-pipeline engine.
//!
//! A [`TaskResolver`] is configured once per operation with a task-graph
//! name and a static configuration block. Per request it builds a
//! [`verbena_pipeline::PipelineInput`], writes the request's arguments under
//! the reserved `gql` namespace, submits a single unit of work to the shared
//! engine, awaits completion without blocking, reads the fixed `fetchedData`
//! payload slice and hands it to an extraction strategy:
//!
//! - [`Single`] populates exactly one typed record,
//! - [`Collection`] projects an array sub-value and populates one record per
//!   element, in source order, atomically.
//!
//! Typed records implement [`Record::populate`]. Operation wiring happens
//! through the [`ResolverRegistry`], the seam an external query executor
//! calls into.

mod error;
mod extract;
mod record;
mod registry;
mod request;
mod resolver;

pub use error::ResolveError;
pub use extract::{Collection, Extract, Projection, Single};
pub use record::{Record, optional_str, required_str, string_list};
pub use registry::{OperationResolver, ResolverRegistry};
pub use request::ResolutionRequest;
pub use resolver::TaskResolver;
