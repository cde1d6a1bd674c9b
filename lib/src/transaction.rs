//! Transaction scoping.
//!
//! A transaction is an explicit value: [`crate::FedoraRepository::start_transaction`]
//! opens one on the server and returns a [`Transaction`], which implements
//! [`Repository`] with every path rewritten under its token. Handles that are not
//! transactions carry an empty [`TransactionContext`] and leave paths alone, so
//! concurrent work on other threads is never scoped by accident.

use crate::errors::{Error, Result};
use crate::http::HttpHelper;
use crate::options::OnConflict;
use crate::repository::Repository;
use crate::status;
use log::{info, warn};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::sync::Arc;

/// The transaction token a handle works under, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionContext {
    token: Option<String>,
}

impl TransactionContext {
    pub fn none() -> Self {
        Self::default()
    }

    /// Context for `token`, stored without surrounding slashes (e.g. `tx:abc`).
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.trim_matches('/').to_string()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn take(&mut self) -> Option<String> {
        self.token.take()
    }

    /// Rewrites `path` under the token. Paths that already contain `marker` are
    /// assumed to be scoped and pass through unchanged.
    pub fn scope(&self, path: &str, marker: &str) -> String {
        match &self.token {
            Some(token) if !path.contains(marker) => {
                if path.starts_with('/') {
                    format!("/{}{}", token, path)
                } else {
                    format!("{}/{}", token, path)
                }
            }
            _ => path.to_string(),
        }
    }
}

/// An open server-side transaction. Finish it with [`Transaction::commit`] or
/// [`Transaction::rollback`]; dropping an unfinished transaction leaves it to expire
/// on the server.
#[derive(Debug)]
pub struct Transaction {
    helper: Arc<HttpHelper>,
    context: TransactionContext,
}

impl Transaction {
    /// POSTs to the transaction endpoint and keeps the token from `Location`.
    pub(crate) fn begin(helper: Arc<HttpHelper>) -> Result<Self> {
        let endpoint = helper.paths().transaction_endpoint.clone();
        let post = helper.post_request(&endpoint, &[])?;
        let uri = post.url().to_string();
        let response = helper.execute(post)?;
        status::check(&response, &uri, &[StatusCode::CREATED], OnConflict::Conflict)?;

        let location = response
            .header(LOCATION.as_str())
            .ok_or_else(|| Error::MissingHeader {
                uri: uri.clone(),
                header: "Location",
            })?;
        let token = helper
            .path_of(location)
            .filter(|path| !path.trim_matches('/').is_empty())
            .ok_or_else(|| Error::UnexpectedLocation(location.to_string()))?;
        let context = TransactionContext::with_token(token);
        info!("Started transaction {}", context.token().unwrap_or_default());
        Ok(Self { helper, context })
    }

    pub fn token(&self) -> Option<&str> {
        self.context.token()
    }

    pub fn commit(mut self) -> Result<()> {
        let suffix = self.helper.paths().commit_suffix.clone();
        self.finish(&suffix, "Committed")
    }

    pub fn rollback(mut self) -> Result<()> {
        let suffix = self.helper.paths().rollback_suffix.clone();
        self.finish(&suffix, "Rolled back")
    }

    // the token is cleared before the request goes out, whatever the outcome
    fn finish(&mut self, suffix: &str, action: &str) -> Result<()> {
        let token = self
            .context
            .take()
            .ok_or_else(|| Error::InvalidRequest("transaction already finished".to_string()))?;
        let path = format!(
            "/{}{}{}",
            token,
            self.helper.paths().transaction_endpoint,
            suffix
        );
        let post = self.helper.post_request(&path, &[])?;
        let uri = post.url().to_string();
        let response = self.helper.execute(post)?;
        status::check(&response, &uri, &[StatusCode::NO_CONTENT], OnConflict::Conflict)?;
        info!("{} transaction {}", action, token);
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if let Some(token) = self.context.token() {
            warn!("Transaction {} dropped without commit or rollback", token);
        }
    }
}

impl Repository for Transaction {
    fn helper(&self) -> &Arc<HttpHelper> {
        &self.helper
    }

    fn context(&self) -> &TransactionContext {
        &self.context
    }
}
