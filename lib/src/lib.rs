//! Client for Fedora-style linked-data repositories over HTTP.
//!
//! A [`FedoraRepository`] fetches and creates [`FedoraObject`]s and
//! [`FedoraDatastream`]s; [`FedoraRepository::start_transaction`] returns a
//! [`Transaction`] offering the same operations scoped to a server transaction.
//! Everything goes through an [`HttpTransport`], which defaults to reqwest.

extern crate derive_builder;

pub mod config;
pub mod consts;
pub mod content;
pub mod datastream;
pub mod errors;
pub mod http;
pub mod object;
pub mod options;
pub mod repository;
pub mod resource;
pub mod status;
pub mod store;
pub mod transaction;
pub mod transport;
pub mod util;

pub use config::{Config, ConfigBuilder, ProtocolPaths};
pub use content::FedoraContent;
pub use datastream::FedoraDatastream;
pub use errors::{Error, Result};
pub use http::HttpHelper;
pub use object::FedoraObject;
pub use options::{AccessMode, OnConflict};
pub use reqwest::StatusCode;
pub use repository::{FedoraRepository, FindOrCreate, Repository};
pub use resource::{FedoraResource, Resource, ResourceKind};
pub use store::{filter_triples, PredicateFilter, TripleStore};
pub use transaction::{Transaction, TransactionContext};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};

/// Installs the `env_logger` backend. `FCREPO_LOG` takes precedence over
/// `RUST_LOG`. Calling this more than once is harmless.
pub fn init_logging() {
    if let Ok(log_level) = std::env::var("FCREPO_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
    let _ = env_logger::try_init();
}
