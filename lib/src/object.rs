use crate::consts::{CONTAINS, HAS_MIXIN_TYPE};
use crate::datastream::FedoraDatastream;
use crate::errors::{Error, Result};
use crate::http::HttpHelper;
use crate::resource::{FedoraResource, Resource, ResourceKind, ResourceNode};
use crate::store::TripleStore;
use crate::util::term_value;
use log::debug;
use oxigraph::model::{NamedNodeRef, TermRef};
use std::sync::Arc;

/// A container resource. Its description embeds the descriptions of its children,
/// which is what lets [`FedoraObject::get_children`] type them without extra requests.
#[derive(Debug, Clone)]
pub struct FedoraObject {
    node: ResourceNode,
}

fn has_mixin(store: &TripleStore, child: NamedNodeRef<'_>, mixin: &str) -> bool {
    store
        .objects(child.into(), HAS_MIXIN_TYPE)
        .any(|t| term_value(t) == mixin)
}

impl FedoraObject {
    pub(crate) fn new(helper: Arc<HttpHelper>, path: String) -> Result<Self> {
        let node = ResourceNode::new(helper, path.clone(), &path)?;
        Ok(Self { node })
    }

    /// Builds the handle and loads its description.
    pub(crate) fn load(helper: Arc<HttpHelper>, path: String) -> Result<Self> {
        let mut object = Self::new(Arc::clone(&helper), path)?;
        helper.load_properties(&mut object)?;
        Ok(object)
    }

    /// The contained resources, optionally limited to children carrying `mixin`
    /// (e.g. `fedora:object`). Each child is fetched as the kind its embedded
    /// description declares.
    pub fn get_children(&self, mixin: Option<&str>) -> Result<Vec<FedoraResource>> {
        let helper = self.node.helper();
        let store = self.graph();
        let mut children = Vec::new();
        for child in store.objects(self.subject_uri().into(), CONTAINS) {
            let TermRef::NamedNode(child) = child else {
                continue;
            };
            if let Some(mixin) = mixin {
                if !has_mixin(store, child, mixin) {
                    continue;
                }
            }
            let path = helper
                .path_of(child.as_str())
                .ok_or_else(|| Error::UnexpectedLocation(child.as_str().to_string()))?
                .to_string();
            let resource = match ResourceKind::classify(store, child.into()) {
                ResourceKind::Datastream => {
                    FedoraResource::Datastream(FedoraDatastream::load(Arc::clone(helper), path)?)
                }
                ResourceKind::Object => {
                    FedoraResource::Object(FedoraObject::load(Arc::clone(helper), path)?)
                }
            };
            children.push(resource);
        }
        debug!("Found {} children of {}", children.len(), self.path());
        Ok(children)
    }
}

impl Resource for FedoraObject {
    fn node(&self) -> &ResourceNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ResourceNode {
        &mut self.node
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Object
    }

    fn embeds_children(&self) -> bool {
        true
    }
}
