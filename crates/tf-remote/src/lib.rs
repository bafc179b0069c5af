//! Remote Data Adapter
//!
//! Wraps the external data service behind the [`RemoteStore`] trait and a
//! set of typed repositories. No business logic lives here, only request
//! shaping, row decoding, and error surfacing. The one policy this crate
//! owns is the single retry-with-alternate-strategy in
//! [`ProjectStore::fetch_visible`]: a collection read that fails with a
//! policy recursion is retried once through the privileged listing
//! function instead of being duplicated at every call site.

#![warn(unreachable_pub)]

mod companies;
mod error;
mod projects;
mod search_jobs;
mod store;

pub use companies::{CompanyStore, COMPANIES_TABLE};
pub use error::RemoteError;
pub use projects::{ProjectStore, PROJECTS_TABLE};
pub use search_jobs::{JobPatch, SearchJobStore, SEARCH_JOBS_TABLE};
pub use store::{Filter, OrderBy, RemoteStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
