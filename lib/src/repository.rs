//! The repository facade: existence checks, typed fetches and creation of objects
//! and datastreams.
//!
//! All operations are provided methods of [`Repository`]. A plain
//! [`FedoraRepository`] and a [`Transaction`] differ only in the context they hand
//! back, which decides whether paths are scoped under a transaction token.

use crate::config::Config;
use crate::content::FedoraContent;
use crate::datastream::FedoraDatastream;
use crate::errors::{Error, Result};
use crate::http::HttpHelper;
use crate::object::FedoraObject;
use crate::options::{AccessMode, OnConflict};
use crate::status;
use crate::transaction::{Transaction, TransactionContext};
use crate::transport::HttpTransport;
use log::{debug, info, warn};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use std::sync::Arc;

/// Outcome of a find-or-create call.
#[derive(Debug, Clone)]
pub enum FindOrCreate<T> {
    /// The resource was already there.
    Existing(T),
    Created(T),
    /// Another client created it between our lookup and our create.
    CreatedConcurrently(T),
}

impl<T> FindOrCreate<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, FindOrCreate::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            FindOrCreate::Existing(t)
            | FindOrCreate::Created(t)
            | FindOrCreate::CreatedConcurrently(t) => t,
        }
    }
}

pub trait Repository {
    fn helper(&self) -> &Arc<HttpHelper>;
    fn context(&self) -> &TransactionContext;

    /// `path` rewritten into this handle's transaction, if it has one.
    fn scoped(&self, path: &str) -> String {
        let helper = self.helper();
        self.context().scope(path, &helper.paths().transaction_marker)
    }

    fn repository_url(&self) -> &str {
        self.helper().repository_url()
    }

    /// Whether this client may modify the repository.
    fn is_writable(&self) -> bool {
        !self.helper().is_read_only()
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let helper = self.helper();
        let head = helper.head_request(&self.scoped(path))?;
        let uri = head.url().to_string();
        let response = helper.execute(head)?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            StatusCode::FORBIDDEN => Err(Error::Forbidden { uri }),
            status => Err(Error::Protocol {
                uri,
                status,
                reason: response.reason().to_string(),
            }),
        }
    }

    fn get_datastream(&self, path: &str) -> Result<FedoraDatastream> {
        FedoraDatastream::load(Arc::clone(self.helper()), self.scoped(path))
    }

    fn get_object(&self, path: &str) -> Result<FedoraObject> {
        FedoraObject::load(Arc::clone(self.helper()), self.scoped(path))
    }

    fn create_datastream(&self, path: &str, content: FedoraContent) -> Result<FedoraDatastream> {
        let helper = self.helper();
        let put = helper.content_put_request(&self.scoped(path), &[], content)?;
        let uri = put.url().to_string();
        let response = helper.execute(put)?;
        status::check(&response, &uri, &[StatusCode::CREATED], OnConflict::AlreadyExists)?;
        info!("Created datastream at {}", uri);
        self.get_datastream(path)
    }

    /// Points the datastream at external content by URL, creating it if needed.
    fn create_or_update_redirect_datastream(&self, path: &str, url: &str) -> Result<FedoraDatastream> {
        let helper = self.helper();
        let mut put = helper.content_put_request(&self.scoped(path), &[], FedoraContent::new())?;
        put.set_header(
            CONTENT_TYPE.as_str(),
            &format!("message/external-body; access-type=URL; URL=\"{}\"", url),
        )?;
        let uri = put.url().to_string();
        let response = helper.execute(put)?;
        status::check(
            &response,
            &uri,
            &[StatusCode::CREATED, StatusCode::NO_CONTENT],
            OnConflict::Conflict,
        )?;
        info!("Created redirect datastream at {} to {}", uri, url);
        self.get_datastream(path)
    }

    fn create_object(&self, path: &str) -> Result<FedoraObject> {
        let helper = self.helper();
        let put = helper.put_request(&self.scoped(path), &[])?;
        let uri = put.url().to_string();
        let response = helper.execute(put)?;
        status::check(&response, &uri, &[StatusCode::CREATED], OnConflict::AlreadyExists)?;
        info!("Created object at {}", uri);
        self.get_object(path)
    }

    /// Creates an object with a server-assigned path, inside `container` or at the
    /// repository root.
    fn create_resource(&self, container: Option<&str>) -> Result<FedoraObject> {
        let helper = self.helper();
        let post = helper.post_request(&self.scoped(container.unwrap_or("")), &[])?;
        let uri = post.url().to_string();
        let response = helper.execute(post)?;
        status::check(&response, &uri, &[StatusCode::CREATED], OnConflict::AlreadyExists)?;

        let location = response
            .header(LOCATION.as_str())
            .ok_or_else(|| Error::MissingHeader {
                uri: uri.clone(),
                header: "Location",
            })?;
        let path = helper
            .path_of(location)
            .ok_or_else(|| Error::UnexpectedLocation(location.to_string()))?;
        info!("Created resource at {}", location);
        self.get_object(path)
    }

    fn find_or_create_datastream(&self, path: &str) -> Result<FindOrCreate<FedoraDatastream>> {
        match self.get_datastream(path) {
            Ok(ds) => return Ok(FindOrCreate::Existing(ds)),
            Err(e) if e.is_not_found() => debug!("Datastream {} not found, creating it", path),
            Err(e) => return Err(e),
        }
        match self.create_datastream(path, FedoraContent::new()) {
            Ok(ds) => Ok(FindOrCreate::Created(ds)),
            Err(Error::AlreadyExists { uri }) => {
                warn!("Datastream {} was created concurrently", uri);
                self.get_datastream(path).map(FindOrCreate::CreatedConcurrently)
            }
            Err(e) => Err(e),
        }
    }

    fn find_or_create_object(&self, path: &str) -> Result<FindOrCreate<FedoraObject>> {
        match self.get_object(path) {
            Ok(object) => return Ok(FindOrCreate::Existing(object)),
            Err(e) if e.is_not_found() => debug!("Object {} not found, creating it", path),
            Err(e) => return Err(e),
        }
        match self.create_object(path) {
            Ok(object) => Ok(FindOrCreate::Created(object)),
            Err(Error::AlreadyExists { uri }) => {
                warn!("Object {} was created concurrently", uri);
                self.get_object(path).map(FindOrCreate::CreatedConcurrently)
            }
            Err(e) => Err(e),
        }
    }
}

/// A client for one repository. Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct FedoraRepository {
    helper: Arc<HttpHelper>,
    context: TransactionContext,
}

impl FedoraRepository {
    /// Connects through the default reqwest transport.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::from_helper(HttpHelper::new(config)?))
    }

    pub fn with_transport(config: &Config, transport: impl HttpTransport + 'static) -> Self {
        Self::from_helper(HttpHelper::with_transport(config, transport))
    }

    /// Like [`FedoraRepository::new`], with every mutating request refused locally.
    pub fn read_only(config: &Config) -> Result<Self> {
        let mut config = config.clone();
        config.access = AccessMode::ReadOnly;
        Self::new(&config)
    }

    fn from_helper(helper: HttpHelper) -> Self {
        Self {
            helper: Arc::new(helper),
            context: TransactionContext::none(),
        }
    }

    pub fn start_transaction(&self) -> Result<Transaction> {
        Transaction::begin(Arc::clone(&self.helper))
    }
}

impl Repository for FedoraRepository {
    fn helper(&self) -> &Arc<HttpHelper> {
        &self.helper
    }

    fn context(&self) -> &TransactionContext {
        &self.context
    }
}
