use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use verbena_pipeline::RequestContext;

use crate::error::ResolveError;
use crate::record::Record;

/// Strategy turning the fetched payload slice into a typed result.
///
/// The resolver core is generic over this trait; [`Single`] and
/// [`Collection`] are the two shipped strategies (composition instead of a
/// resolver subclass per return shape).
pub trait Extract: Send + Sync {
  type Output: Send;

  fn extract(&self, fetched: &Value, context: &RequestContext)
  -> Result<Self::Output, ResolveError>;
}

/// Selects the array-shaped sub-value a [`Collection`] iterates, decoupling
/// the resolver from the exact nesting of third-party response shapes.
/// Fixed at resolver construction.
pub type Projection = Arc<dyn for<'a> Fn(&'a Value) -> Option<&'a Value> + Send + Sync>;

/// Extraction of exactly one typed record from the fetched sub-value.
pub struct Single<T> {
  _marker: PhantomData<fn() -> T>,
}

impl<T> Single<T> {
  pub fn new() -> Self {
    Self {
      _marker: PhantomData,
    }
  }
}

impl<T> Default for Single<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Record> Extract for Single<T> {
  type Output = T;

  fn extract(&self, fetched: &Value, context: &RequestContext) -> Result<T, ResolveError> {
    T::populate(fetched, context)
  }
}

/// Extraction of an ordered sequence of typed records from an array-shaped
/// sub-value.
///
/// Output order matches the source array exactly; a single malformed
/// element fails the whole extraction (no partial collections).
pub struct Collection<T> {
  projection: Projection,
  _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
  pub fn new(projection: Projection) -> Self {
    Self {
      projection,
      _marker: PhantomData,
    }
  }

  /// Build a collection strategy from a plain projection closure.
  pub fn project_with<F>(projection: F) -> Self
  where
    F: for<'a> Fn(&'a Value) -> Option<&'a Value> + Send + Sync + 'static,
  {
    Self::new(Arc::new(projection))
  }
}

impl<T: Record> Extract for Collection<T> {
  type Output = Vec<T>;

  fn extract(&self, fetched: &Value, context: &RequestContext) -> Result<Vec<T>, ResolveError> {
    let projected = (self.projection)(fetched)
      .ok_or_else(|| ResolveError::malformed("projection selected no sub-value"))?;
    let items = projected
      .as_array()
      .ok_or_else(|| ResolveError::malformed("projection did not select an array"))?;

    items
      .iter()
      .map(|item| T::populate(item, context))
      .collect()
  }
}
