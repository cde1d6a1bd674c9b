//! The protocol mapper: the one place that knows how repository paths become URLs,
//! how payloads become request bodies, and how verbs map onto HTTP methods.
//!
//! Every request the client sends is built and executed here. When the helper is
//! configured read-only, mutating verbs are refused in [`HttpHelper::execute`] before
//! the transport ever sees them.

use crate::config::{Config, ProtocolPaths};
use crate::consts::{DESTINATION, EMBED_RESOURCES_PREFER, PREFER, SPARQL_UPDATE};
use crate::content::FedoraContent;
use crate::errors::{Error, Result};
use crate::options::{AccessMode, OnConflict};
use crate::resource::Resource;
use crate::status;
use crate::store::{filter_triples, PredicateFilter, TripleStore};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
use crate::util::{is_blank, strip_base, unquote_etag};
use log::{debug, warn};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedNode, Triple};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, ETAG};
use reqwest::{Method, StatusCode, Url};
use std::fmt;
use std::io::Read;

/// Characters escaped in query names and values. `:` and `/` pass through so that
/// URI-valued parameters such as checksums stay readable.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

/// Builds `?a=1&b=2`, or nothing when there are no parameters.
pub fn query_string(params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = params
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(name, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect();
    format!("?{}", pairs.join("&"))
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        method.as_str().to_ascii_lowercase().as_str(),
        "copy" | "delete" | "move" | "patch" | "post" | "put"
    )
}

fn extension_method(name: &'static str) -> Result<Method> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| Error::InvalidRequest(format!("method {name}: {e}")))
}

pub struct HttpHelper {
    repository_url: String,
    transport: Box<dyn HttpTransport>,
    access: AccessMode,
    paths: ProtocolPaths,
}

impl fmt::Debug for HttpHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpHelper")
            .field("repository_url", &self.repository_url)
            .field("access", &self.access)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl HttpHelper {
    /// A helper over the default reqwest transport.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &Config, transport: impl HttpTransport + 'static) -> Self {
        Self {
            repository_url: config.base_url().to_string(),
            transport: Box::new(transport),
            access: config.access,
            paths: config.paths.clone(),
        }
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn paths(&self) -> &ProtocolPaths {
        &self.paths
    }

    pub fn is_read_only(&self) -> bool {
        self.access.is_read_only()
    }

    /// Absolute URL of a repository path, without query string.
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.repository_url, path)
        } else {
            format!("{}/{}", self.repository_url, path)
        }
    }

    /// RDF subject the repository uses for `path`.
    pub fn subject_for(&self, path: &str) -> Result<NamedNode> {
        Ok(NamedNode::new(self.url_for(path))?)
    }

    /// Repository path of an absolute URI, if it lies under the repository URL.
    pub fn path_of<'a>(&self, uri: &'a str) -> Option<&'a str> {
        strip_base(uri, &self.repository_url)
    }

    fn request(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<HttpRequest> {
        let url = Url::parse(&format!("{}{}", self.url_for(path), query_string(params)))?;
        Ok(HttpRequest::new(method, url))
    }

    pub fn head_request(&self, path: &str) -> Result<HttpRequest> {
        self.request(Method::HEAD, path, &[])
    }

    pub fn get_request(&self, path: &str, params: &[(&str, &str)]) -> Result<HttpRequest> {
        self.request(Method::GET, path, params)
    }

    pub fn delete_request(&self, path: &str) -> Result<HttpRequest> {
        self.request(Method::DELETE, path, &[])
    }

    pub fn post_request(&self, path: &str, params: &[(&str, &str)]) -> Result<HttpRequest> {
        self.request(Method::POST, path, params)
    }

    pub fn put_request(&self, path: &str, params: &[(&str, &str)]) -> Result<HttpRequest> {
        self.request(Method::PUT, path, params)
    }

    /// SPARQL Update PATCH. A blank update is rejected here, before any I/O.
    pub fn patch_request(&self, path: &str, sparql_update: &str) -> Result<HttpRequest> {
        if is_blank(sparql_update) {
            return Err(Error::InvalidRequest(
                "SPARQL Update command must not be blank".to_string(),
            ));
        }
        let mut patch = self.request(Method::PATCH, path, &[])?;
        patch.set_header(CONTENT_TYPE.as_str(), SPARQL_UPDATE)?;
        patch.set_body(RequestBody::Bytes(sparql_update.as_bytes().to_vec()));
        Ok(patch)
    }

    /// PUT of binary content to the content sub-path of `path`. The checksum, when
    /// present, is sent as the first `checksum` query parameter.
    pub fn content_put_request(
        &self,
        path: &str,
        params: &[(&str, &str)],
        mut content: FedoraContent,
    ) -> Result<HttpRequest> {
        let content_path = format!("{}{}", path, self.paths.content_suffix);
        let checksum = content.checksum().map(|c| c.to_string());
        let mut all_params: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        if let Some(checksum) = checksum.as_deref() {
            all_params.push(("checksum", checksum));
        }
        all_params.extend_from_slice(params);

        let mut put = self.request(Method::PUT, &content_path, &all_params)?;
        if let Some(filename) = content.filename() {
            put.set_header(
                CONTENT_DISPOSITION.as_str(),
                &format!("attachment; filename=\"{}\"", filename),
            )?;
        }
        if let Some(content_type) = content.content_type() {
            put.set_header(CONTENT_TYPE.as_str(), content_type)?;
        }
        if let Some(body) = content.take_content() {
            put.set_body(RequestBody::Stream(body));
        }
        Ok(put)
    }

    /// PUT replacing a resource's triples with the RDF in `body`.
    pub fn triples_put_request(
        &self,
        path: &str,
        body: impl Read + Send + 'static,
        content_type: &str,
    ) -> Result<HttpRequest> {
        if is_blank(content_type) {
            return Err(Error::InvalidRequest(
                "contentType must not be blank".to_string(),
            ));
        }
        let mut put = self.request(Method::PUT, path, &[])?;
        put.set_header(CONTENT_TYPE.as_str(), content_type)?;
        put.set_body(RequestBody::Stream(Box::new(body)));
        Ok(put)
    }

    pub fn copy_request(&self, source: &str, destination: &str) -> Result<HttpRequest> {
        let mut copy = self.request(extension_method("COPY")?, source, &[])?;
        copy.set_header(DESTINATION, &self.url_for(destination))?;
        Ok(copy)
    }

    pub fn move_request(&self, source: &str, destination: &str) -> Result<HttpRequest> {
        let mut mv = self.request(extension_method("MOVE")?, source, &[])?;
        mv.set_header(DESTINATION, &self.url_for(destination))?;
        Ok(mv)
    }

    /// Sends a request through the transport, unless the helper is read-only and
    /// the verb would modify the repository.
    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        if self.is_read_only() && is_mutating(request.method()) {
            warn!(
                "Write operation attempted using read-only repository: {} {}",
                request.method(),
                request.url()
            );
            return Err(Error::ReadOnly {
                method: request.method().to_string(),
            });
        }
        debug!("{} {}", request.method(), request.url());
        self.transport.execute(request)
    }

    /// Parses an RDF response body into a fresh store, choosing the syntax from the
    /// response `Content-Type` and resolving relative IRIs against `uri`.
    pub fn read_graph(&self, response: HttpResponse, uri: &str) -> Result<TripleStore> {
        let content_type = response
            .header(CONTENT_TYPE.as_str())
            .unwrap_or(self.paths.rdf_accept.as_str())
            .to_string();
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        let format = RdfFormat::from_media_type(media_type)
            .ok_or_else(|| Error::UnsupportedFormat(content_type.clone()))?;
        let parser = RdfParser::from_format(format).with_base_iri(uri)?;
        let triples = parser
            .for_reader(response.into_body())
            .map(|quad| quad.map(|q| Triple::new(q.subject, q.predicate, q.object)));
        filter_triples(triples, &PredicateFilter::Any)
    }

    /// Fetches the RDF description of `resource` and replaces its graph and ETag
    /// with what the server returned.
    pub fn load_properties<R: Resource + ?Sized>(&self, resource: &mut R) -> Result<()> {
        let mut get = self.get_request(&resource.properties_path(), &[])?;
        get.set_header(ACCEPT.as_str(), &self.paths.rdf_accept)?;
        if resource.embeds_children() {
            get.set_header(PREFER, EMBED_RESOURCES_PREFER)?;
        }
        let uri = get.url().to_string();
        let response = self.execute(get)?;
        status::check(&response, &uri, &[StatusCode::OK], OnConflict::Conflict)?;

        let etag = response
            .header(ETAG.as_str())
            .map(|value| unquote_etag(value).to_string());
        let store = self.read_graph(response, &uri)?;
        debug!("Updated properties for resource {} ({} triples)", uri, store.len());
        resource.set_etag(etag);
        resource.set_graph(store);
        Ok(())
    }
}
