//! Binary resources. A datastream has two addresses: the binary itself at its path,
//! and a description at path + metadata suffix. The description carries the
//! repository properties and points at the content through `iana:describes`.

use crate::consts::{
    DESCRIBES, DIGEST, FIXITY_SUCCESS, HAS_EVENT_OUTCOME, HAS_MIME_TYPE, HAS_ORIGINAL_NAME,
    HAS_SIZE,
};
use crate::content::FedoraContent;
use crate::errors::{Error, Result};
use crate::http::HttpHelper;
use crate::object::FedoraObject;
use crate::options::OnConflict;
use crate::resource::{Resource, ResourceKind, ResourceNode};
use crate::status;
use crate::store::TripleStore;
use crate::util::{parent_path, term_value};
use log::{info, warn};
use oxigraph::model::{NamedNode, NamedNodeRef, TermRef};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::io::Read;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct FedoraDatastream {
    node: ResourceNode,
    content_subject: Option<NamedNode>,
}

impl FedoraDatastream {
    pub(crate) fn new(helper: Arc<HttpHelper>, path: String) -> Result<Self> {
        let description = format!("{}{}", path, helper.paths().metadata_suffix);
        let node = ResourceNode::new(helper, path, &description)?;
        Ok(Self {
            node,
            content_subject: None,
        })
    }

    pub(crate) fn load(helper: Arc<HttpHelper>, path: String) -> Result<Self> {
        let mut datastream = Self::new(Arc::clone(&helper), path)?;
        helper.load_properties(&mut datastream)?;
        Ok(datastream)
    }

    pub fn description_path(&self) -> String {
        format!("{}{}", self.path(), self.node.helper().paths().metadata_suffix)
    }

    pub fn content_path(&self) -> String {
        format!("{}{}", self.path(), self.node.helper().paths().content_suffix)
    }

    /// Subject of the binary, as named by the description. `None` when the
    /// datastream has no content.
    pub fn content_subject(&self) -> Option<NamedNodeRef<'_>> {
        self.content_subject.as_ref().map(NamedNode::as_ref)
    }

    fn content_property<'a>(&'a self, predicate: NamedNodeRef<'a>) -> Option<TermRef<'a>> {
        let subject = self.content_subject.as_ref()?;
        self.graph().object(subject.as_ref().into(), predicate)
    }

    /// The digest URI the server computed for the content, e.g. `urn:sha1:…`.
    pub fn content_digest(&self) -> Result<Option<Url>> {
        let Some(term) = self.content_property(DIGEST) else {
            return Ok(None);
        };
        let value = term_value(term);
        Url::parse(&value).map(Some).map_err(|_| Error::InvalidProperty {
            property: DIGEST.as_str().to_string(),
            value,
        })
    }

    pub fn content_size(&self) -> Result<Option<u64>> {
        let Some(term) = self.content_property(HAS_SIZE) else {
            return Ok(None);
        };
        let value = term_value(term);
        value.parse::<u64>().map(Some).map_err(|_| Error::InvalidProperty {
            property: HAS_SIZE.as_str().to_string(),
            value,
        })
    }

    pub fn filename(&self) -> Option<String> {
        self.content_property(HAS_ORIGINAL_NAME).map(term_value)
    }

    pub fn content_type(&self) -> Option<String> {
        self.content_property(HAS_MIME_TYPE).map(term_value)
    }

    /// The object one path level up.
    pub fn get_object(&self) -> Result<FedoraObject> {
        let parent = parent_path(self.path()).to_string();
        FedoraObject::load(Arc::clone(self.node.helper()), parent)
    }

    /// Streams the binary content. The caller owns the reader and must drain or
    /// drop it to release the connection.
    pub fn get_content(&self) -> Result<Box<dyn Read + Send>> {
        let helper = self.node.helper();
        let get = helper.get_request(&self.content_path(), &[])?;
        let uri = get.url().to_string();
        let response = helper.execute(get)?;
        status::check(&response, &uri, &[StatusCode::OK], OnConflict::Conflict)?;
        Ok(response.into_body())
    }

    /// Replaces the binary content and reloads the description. A 409 means the
    /// supplied checksum did not match when there was one.
    pub fn update_content(&mut self, content: FedoraContent) -> Result<()> {
        let helper = Arc::clone(self.node.helper());
        let on_conflict = if content.checksum().is_some() {
            OnConflict::FixityMismatch
        } else {
            OnConflict::Conflict
        };
        let put = helper.content_put_request(self.path(), &[], content)?;
        let uri = put.url().to_string();
        let response = helper.execute(put)?;
        status::check(
            &response,
            &uri,
            &[StatusCode::CREATED, StatusCode::NO_CONTENT],
            on_conflict,
        )?;
        info!("Updated content of {}", self.path());
        self.reload()
    }

    /// Asks the server to re-verify the stored content against its digest.
    pub fn check_fixity(&self) -> Result<()> {
        let helper = self.node.helper();
        let path = format!("{}{}", self.path(), helper.paths().fixity_suffix);
        let mut get = helper.get_request(&path, &[])?;
        get.set_header(ACCEPT.as_str(), &helper.paths().rdf_accept)?;
        let uri = get.url().to_string();
        let response = helper.execute(get)?;
        status::check(&response, &uri, &[StatusCode::OK], OnConflict::Conflict)?;
        let report = helper.read_graph(response, &uri)?;

        let outcomes: Vec<String> = report
            .find(None, Some(HAS_EVENT_OUTCOME), None)
            .map(|t| term_value(t.object))
            .collect();
        if outcomes.is_empty() {
            return Err(Error::InvalidProperty {
                property: HAS_EVENT_OUTCOME.as_str().to_string(),
                value: String::new(),
            });
        }
        if let Some(failed) = outcomes.iter().find(|o| o.as_str() != FIXITY_SUCCESS) {
            warn!("Fixity check of {} reported {}", self.path(), failed);
            return Err(Error::FixityMismatch { uri });
        }
        Ok(())
    }
}

impl Resource for FedoraDatastream {
    fn node(&self) -> &ResourceNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ResourceNode {
        &mut self.node
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Datastream
    }

    fn properties_path(&self) -> String {
        self.description_path()
    }

    fn set_graph(&mut self, store: TripleStore) {
        self.content_subject = match store.object(self.subject_uri().into(), DESCRIBES) {
            Some(TermRef::NamedNode(n)) => Some(n.into_owned()),
            _ => None,
        };
        self.node_mut().set_store(store);
    }
}
