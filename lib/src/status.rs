//! Status-code classification shared by every request the client issues.

use crate::errors::{Error, Result};
use crate::options::OnConflict;
use crate::transport::HttpResponse;
use log::error;
use reqwest::StatusCode;

/// Maps a status line onto the error taxonomy. `accepted` lists the codes that count
/// as success for the calling operation; `on_conflict` gives 409 its meaning there.
pub fn classify(
    status: StatusCode,
    reason: &str,
    uri: &str,
    accepted: &[StatusCode],
    on_conflict: OnConflict,
) -> Result<()> {
    if accepted.contains(&status) {
        return Ok(());
    }
    let uri = uri.to_string();
    let err = match status {
        StatusCode::BAD_REQUEST => Error::BadRequest { uri },
        StatusCode::FORBIDDEN => Error::Forbidden { uri },
        StatusCode::NOT_FOUND => Error::NotFound { uri },
        StatusCode::CONFLICT => match on_conflict {
            OnConflict::AlreadyExists => Error::AlreadyExists { uri },
            OnConflict::FixityMismatch => Error::FixityMismatch { uri },
            OnConflict::Conflict => Error::Conflict {
                uri,
                reason: reason.to_string(),
            },
        },
        _ => Error::Protocol {
            uri,
            status,
            reason: reason.to_string(),
        },
    };
    // 404 is routine for find-or-create, keep it out of the error log
    if status != StatusCode::NOT_FOUND {
        error!("{}", err);
    }
    Err(err)
}

/// [`classify`] applied to a response.
pub fn check(
    response: &HttpResponse,
    uri: &str,
    accepted: &[StatusCode],
    on_conflict: OnConflict,
) -> Result<()> {
    classify(
        response.status(),
        response.reason(),
        uri,
        accepted,
        on_conflict,
    )
}
