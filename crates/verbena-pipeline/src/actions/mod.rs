//! Built-in pipeline actions.

mod expose_data;
mod http_fetch;

pub use expose_data::{EXPOSE_DATA_KIND, ExposeData};
pub use http_fetch::{HTTP_FETCH_KIND, HttpFetch};
