use std::fmt;
use std::io::{Cursor, Read};
use url::Url;

/// Bytes and descriptive headers for a binary upload. Every part is optional; an
/// empty value creates a datastream without content.
#[derive(Default)]
pub struct FedoraContent {
    content: Option<Box<dyn Read + Send>>,
    content_type: Option<String>,
    filename: Option<String>,
    checksum: Option<Url>,
}

impl fmt::Debug for FedoraContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FedoraContent")
            .field("has_content", &self.content.is_some())
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("checksum", &self.checksum)
            .finish()
    }
}

impl FedoraContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Read + Send + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    pub fn with_bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_content(Cursor::new(bytes.into()))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Checksum URI (e.g. `urn:sha1:…`) the server verifies the upload against.
    pub fn with_checksum(mut self, checksum: Url) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn checksum(&self) -> Option<&Url> {
        self.checksum.as_ref()
    }

    pub fn take_content(&mut self) -> Option<Box<dyn Read + Send>> {
        self.content.take()
    }
}
