#![allow(dead_code)]

use fcrepo_client::{
    Config, FedoraRepository, HttpRequest, HttpResponse, HttpTransport, Result, StatusCode,
};
use std::sync::{Arc, Mutex};

pub const REPO_URL: &str = "http://localhost:8080/rest";
pub const TURTLE: &str = "text/turtle";
pub const DATE: &str = "2014-08-14T15:11:30.118Z";

/// What the mock saw of one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }

    /// The URL with the repository prefix removed.
    pub fn path(&self) -> &str {
        self.url.strip_prefix(REPO_URL).unwrap_or(&self.url)
    }
}

type Handler = dyn Fn(&RecordedRequest) -> HttpResponse + Send + Sync;

/// Answers every request with a handler and keeps a log of what was sent.
#[derive(Clone)]
pub struct MockTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handler: Arc<Handler>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&RecordedRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            handler: Arc::new(handler),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let (method, url, headers, body) = request.into_parts();
        let recorded = RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect(),
            body: match body {
                Some(body) => body.into_bytes()?,
                None => Vec::new(),
            },
        };
        self.requests.lock().unwrap().push(recorded.clone());
        Ok((self.handler)(&recorded))
    }
}

pub fn repository(transport: &MockTransport) -> FedoraRepository {
    fcrepo_client::init_logging();
    FedoraRepository::with_transport(&Config::new(REPO_URL), transport.clone())
}

pub fn read_only_repository(transport: &MockTransport) -> FedoraRepository {
    fcrepo_client::init_logging();
    let mut config = Config::new(REPO_URL);
    config.access = fcrepo_client::AccessMode::ReadOnly;
    FedoraRepository::with_transport(&config, transport.clone())
}

pub fn turtle(body: impl Into<String>) -> HttpResponse {
    HttpResponse::new(StatusCode::OK)
        .with_header("Content-Type", TURTLE)
        .with_body(body.into())
}

pub fn uri(path: &str) -> String {
    format!("{REPO_URL}{path}")
}

/// Description of a plain object at `path`.
pub fn object_turtle(path: &str) -> String {
    format!(
        "@prefix fedora: <http://fedora.info/definitions/v4/repository#> .\n\
         <{subject}> fedora:created \"{DATE}\" ;\n\
           fedora:lastModified \"{DATE}\" ;\n\
           fedora:mixinTypes \"fedora:object\" ;\n\
           fedora:writable \"true\" .\n",
        subject = uri(path)
    )
}

/// Description of a datastream at `path`, as served from its metadata sub-path.
pub fn datastream_turtle(path: &str) -> String {
    format!(
        "@prefix fedora: <http://fedora.info/definitions/v4/repository#> .\n\
         @prefix premis: <http://www.loc.gov/premis/rdf/v1#> .\n\
         @prefix ebucore: <http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#> .\n\
         @prefix iana: <http://www.iana.org/assignments/relation/> .\n\
         <{description}> fedora:created \"{DATE}\" ;\n\
           fedora:lastModified \"{DATE}\" ;\n\
           fedora:mixinTypes \"fedora:datastream\" ;\n\
           fedora:writable \"true\" ;\n\
           iana:describes <{content}> .\n\
         <{content}> fedora:digest <urn:sha1:c6bbf022f8f19d09106622aa912218417723f543> ;\n\
           premis:hasSize \"13\" ;\n\
           premis:hasOriginalName \"dummy.txt\" ;\n\
           ebucore:hasMimeType \"text/plain\" .\n",
        description = uri(&format!("{path}/fcr:metadata")),
        content = uri(path)
    )
}
