//! Defines constant NamedNodeRefs for the RDF terms the repository publishes about its
//! resources, primarily from the Fedora repository, LDP, PREMIS and EBUCore vocabularies,
//! along with the fixed header values used by the protocol.

use oxigraph::model::NamedNodeRef;

pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

// fedora repository
pub const CREATED_DATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#created");
pub const LAST_MODIFIED_DATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#lastModified");
pub const HAS_MIXIN_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#mixinTypes");
pub const WRITABLE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#writable");
pub const DIGEST: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#digest");
pub const BINARY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#Binary");

// ldp
pub const CONTAINS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");
pub const NON_RDF_SOURCE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#NonRDFSource");

// iana link relations
pub const DESCRIBES: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.iana.org/assignments/relation/describes");

// premis
pub const HAS_SIZE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.loc.gov/premis/rdf/v1#hasSize");
pub const HAS_ORIGINAL_NAME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.loc.gov/premis/rdf/v1#hasOriginalName");
pub const HAS_EVENT_OUTCOME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.loc.gov/premis/rdf/v1#hasEventOutcome");

// ebucore
pub const HAS_MIME_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#hasMimeType");

/// Mixin literals the repository attaches to binary children.
pub const BINARY_MIXINS: [&str; 2] = ["fedora:datastream", "fedora:binary"];

/// Fixity outcome reported for an intact binary.
pub const FIXITY_SUCCESS: &str = "SUCCESS";

pub const SPARQL_UPDATE: &str = "application/sparql-update";

pub const EMBED_RESOURCES_PREFER: &str = "return=representation; \
     include=\"http://fedora.info/definitions/v4/repository#EmbedResources\"";

// header names the reqwest header module does not define
pub const SLUG: &str = "slug";
pub const DESTINATION: &str = "destination";
pub const PREFER: &str = "prefer";
