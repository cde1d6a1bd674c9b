//! The shared behaviour of repository resources.
//!
//! Objects and datastreams both wrap a [`ResourceNode`]: the path, RDF subject, the
//! last graph fetched from the server and its ETag. The [`Resource`] trait supplies
//! the property getters and the write operations on top of that node; implementors
//! only say where their description lives and what to do with a freshly loaded graph.

use crate::consts::{
    BINARY, BINARY_MIXINS, CREATED_DATE, DESCRIBES, HAS_MIXIN_TYPE, LAST_MODIFIED_DATE,
    NON_RDF_SOURCE, SLUG, TYPE, WRITABLE,
};
use crate::datastream::FedoraDatastream;
use crate::errors::Result;
use crate::http::HttpHelper;
use crate::object::FedoraObject;
use crate::options::OnConflict;
use crate::status;
use crate::store::TripleStore;
use crate::util::{path_name, term_value};
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::StatusCode;
use oxigraph::model::{NamedNode, NamedNodeRef, NamedOrBlankNodeRef, TermRef, TripleRef};
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

/// State common to every resource handle.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    helper: Arc<HttpHelper>,
    path: String,
    subject: NamedNode,
    store: TripleStore,
    etag: Option<String>,
}

impl ResourceNode {
    /// A node for `path` whose properties are described by the subject at
    /// `description_path`. The graph stays empty until the first load.
    pub fn new(helper: Arc<HttpHelper>, path: String, description_path: &str) -> Result<Self> {
        let subject = helper.subject_for(description_path)?;
        Ok(Self {
            helper,
            path,
            subject,
            store: TripleStore::new(),
            etag: None,
        })
    }

    pub fn helper(&self) -> &Arc<HttpHelper> {
        &self.helper
    }

    pub(crate) fn set_store(&mut self, store: TripleStore) {
        self.store = store;
    }
}

/// Which kind of resource a subject describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Object,
    Datastream,
}

impl ResourceKind {
    /// Datastreams carry a binary mixin or type; everything else is an object.
    pub fn classify(store: &TripleStore, subject: NamedOrBlankNodeRef<'_>) -> Self {
        let binary_mixin = store
            .objects(subject, HAS_MIXIN_TYPE)
            .any(|t| BINARY_MIXINS.contains(&term_value(t).as_str()));
        let binary_type = store.objects(subject, TYPE).any(|t| match t {
            TermRef::NamedNode(n) => n == BINARY || n == NON_RDF_SOURCE,
            _ => false,
        });
        if binary_mixin || binary_type {
            ResourceKind::Datastream
        } else {
            ResourceKind::Object
        }
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            debug!("Invalid date format {value:?}: {e}");
            None
        }
    }
}

pub trait Resource {
    fn node(&self) -> &ResourceNode;
    fn node_mut(&mut self) -> &mut ResourceNode;
    fn kind(&self) -> ResourceKind;

    /// Repository path whose RDF describes this resource.
    fn properties_path(&self) -> String {
        self.path().to_string()
    }

    /// Whether loads ask the server to embed child descriptions.
    fn embeds_children(&self) -> bool {
        false
    }

    /// Installs a freshly loaded graph.
    fn set_graph(&mut self, store: TripleStore) {
        self.node_mut().set_store(store);
    }

    fn set_etag(&mut self, etag: Option<String>) {
        self.node_mut().etag = etag;
    }

    fn path(&self) -> &str {
        &self.node().path
    }

    fn name(&self) -> &str {
        path_name(self.path())
    }

    fn subject_uri(&self) -> NamedNodeRef<'_> {
        self.node().subject.as_ref()
    }

    fn graph(&self) -> &TripleStore {
        &self.node().store
    }

    /// Every triple of the last loaded graph.
    fn properties(&self) -> Box<dyn Iterator<Item = TripleRef<'_>> + '_> {
        self.graph().find(None, None, None)
    }

    fn size(&self) -> usize {
        self.graph().len()
    }

    fn etag(&self) -> Option<&str> {
        self.node().etag.as_deref()
    }

    /// First object of `(subject, predicate, *)` on this resource's own subject.
    fn property<'a>(&'a self, predicate: NamedNodeRef<'a>) -> Option<TermRef<'a>> {
        self.graph().object(self.subject_uri().into(), predicate)
    }

    fn created_date(&self) -> Option<DateTime<Utc>> {
        self.property(CREATED_DATE)
            .and_then(|t| parse_date(&term_value(t)))
    }

    fn last_modified_date(&self) -> Option<DateTime<Utc>> {
        self.property(LAST_MODIFIED_DATE)
            .and_then(|t| parse_date(&term_value(t)))
    }

    fn mixins(&self) -> HashSet<String> {
        self.graph()
            .objects(self.subject_uri().into(), HAS_MIXIN_TYPE)
            .map(term_value)
            .collect()
    }

    /// The server's writable flag; absent or unparseable means not writable.
    fn is_writable(&self) -> bool {
        self.property(WRITABLE)
            .and_then(|t| term_value(t).parse::<bool>().ok())
            .unwrap_or(false)
    }

    fn has_content(&self) -> bool {
        self.property(DESCRIBES).is_some()
    }

    /// Re-fetches the description, replacing graph and ETag.
    fn reload(&mut self) -> Result<()> {
        let helper = Arc::clone(self.node().helper());
        helper.load_properties(self)
    }

    /// Applies a SPARQL Update to the description, then reloads it.
    fn update_properties(&mut self, sparql_update: &str) -> Result<()> {
        let helper = Arc::clone(self.node().helper());
        let patch = helper.patch_request(&self.properties_path(), sparql_update)?;
        let uri = patch.url().to_string();
        let response = helper.execute(patch)?;
        status::check(&response, &uri, &[StatusCode::NO_CONTENT], OnConflict::Conflict)?;
        info!("Updated properties at {}", uri);
        self.reload()
    }

    /// Replaces every triple of the description with the RDF in `body`.
    fn replace_properties<B>(&mut self, body: B, content_type: &str) -> Result<()>
    where
        B: Read + Send + 'static,
        Self: Sized,
    {
        let helper = Arc::clone(self.node().helper());
        let put = helper.triples_put_request(&self.properties_path(), body, content_type)?;
        let uri = put.url().to_string();
        let response = helper.execute(put)?;
        status::check(&response, &uri, &[StatusCode::NO_CONTENT], OnConflict::Conflict)?;
        info!("Replaced properties at {}", uri);
        self.reload()
    }

    fn delete(&self) -> Result<()> {
        let helper = self.node().helper();
        let delete = helper.delete_request(self.path())?;
        let uri = delete.url().to_string();
        let response = helper.execute(delete)?;
        status::check(&response, &uri, &[StatusCode::NO_CONTENT], OnConflict::Conflict)?;
        info!("Deleted resource at {}", uri);
        Ok(())
    }

    /// Copies the resource to `destination`, a repository path.
    fn copy(&self, destination: &str) -> Result<()> {
        let helper = self.node().helper();
        let copy = helper.copy_request(self.path(), destination)?;
        let uri = copy.url().to_string();
        let response = helper.execute(copy)?;
        status::check(
            &response,
            &uri,
            &[StatusCode::CREATED, StatusCode::NO_CONTENT],
            OnConflict::AlreadyExists,
        )?;
        info!("Copied resource {} to {}", uri, destination);
        Ok(())
    }

    fn move_to(&self, destination: &str) -> Result<()> {
        let helper = self.node().helper();
        let mv = helper.move_request(self.path(), destination)?;
        let uri = mv.url().to_string();
        let response = helper.execute(mv)?;
        status::check(
            &response,
            &uri,
            &[StatusCode::CREATED, StatusCode::NO_CONTENT],
            OnConflict::AlreadyExists,
        )?;
        info!("Moved resource {} to {}", uri, destination);
        Ok(())
    }

    /// Snapshots the current state of the resource under `label`.
    fn create_version(&self, label: &str) -> Result<()> {
        let helper = self.node().helper();
        let path = format!("{}{}", self.path(), helper.paths().versions_suffix);
        let mut post = helper.post_request(&path, &[])?;
        post.set_header(SLUG, label)?;
        let uri = post.url().to_string();
        let response = helper.execute(post)?;
        status::check(
            &response,
            &uri,
            &[StatusCode::CREATED, StatusCode::NO_CONTENT],
            OnConflict::AlreadyExists,
        )?;
        info!("Created version {} of {}", label, self.path());
        Ok(())
    }
}

/// A child of an object, typed by what its description says it is.
#[derive(Debug, Clone)]
pub enum FedoraResource {
    Object(FedoraObject),
    Datastream(FedoraDatastream),
}

impl FedoraResource {
    pub fn as_object(&self) -> Option<&FedoraObject> {
        match self {
            FedoraResource::Object(o) => Some(o),
            FedoraResource::Datastream(_) => None,
        }
    }

    pub fn as_datastream(&self) -> Option<&FedoraDatastream> {
        match self {
            FedoraResource::Datastream(d) => Some(d),
            FedoraResource::Object(_) => None,
        }
    }

    pub fn into_object(self) -> Option<FedoraObject> {
        match self {
            FedoraResource::Object(o) => Some(o),
            FedoraResource::Datastream(_) => None,
        }
    }

    pub fn into_datastream(self) -> Option<FedoraDatastream> {
        match self {
            FedoraResource::Datastream(d) => Some(d),
            FedoraResource::Object(_) => None,
        }
    }
}

impl Resource for FedoraResource {
    fn node(&self) -> &ResourceNode {
        match self {
            FedoraResource::Object(o) => o.node(),
            FedoraResource::Datastream(d) => d.node(),
        }
    }

    fn node_mut(&mut self) -> &mut ResourceNode {
        match self {
            FedoraResource::Object(o) => o.node_mut(),
            FedoraResource::Datastream(d) => d.node_mut(),
        }
    }

    fn kind(&self) -> ResourceKind {
        match self {
            FedoraResource::Object(_) => ResourceKind::Object,
            FedoraResource::Datastream(_) => ResourceKind::Datastream,
        }
    }

    fn properties_path(&self) -> String {
        match self {
            FedoraResource::Object(o) => o.properties_path(),
            FedoraResource::Datastream(d) => d.properties_path(),
        }
    }

    fn embeds_children(&self) -> bool {
        match self {
            FedoraResource::Object(o) => o.embeds_children(),
            FedoraResource::Datastream(d) => d.embeds_children(),
        }
    }

    fn set_graph(&mut self, store: TripleStore) {
        match self {
            FedoraResource::Object(o) => o.set_graph(store),
            FedoraResource::Datastream(d) => d.set_graph(store),
        }
    }
}
