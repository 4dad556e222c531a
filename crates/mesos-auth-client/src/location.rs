use url::Url;

use crate::errors::ClientError;

/// Resolve a leader-redirect `Location` against the URL that produced it.
///
/// Mesos masters redirect with scheme-relative locations (`//leader:5050/api/v1`);
/// those inherit the scheme of `current`. Absolute locations are used verbatim and
/// anything else is joined onto `current`.
pub fn resolve_location(current: &str, location: &str) -> Result<String, ClientError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(ClientError::MissingLocation);
    }

    let current_url = Url::parse(current).map_err(|e| invalid(current, e))?;

    if location.starts_with("//") {
        let next = format!("{}:{}", current_url.scheme(), location);
        Url::parse(&next).map_err(|e| invalid(location, e))?;
        return Ok(next);
    }

    match Url::parse(location) {
        Ok(_) => Ok(location.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => current_url
            .join(location)
            .map(String::from)
            .map_err(|e| invalid(location, e)),
        Err(e) => Err(invalid(location, e)),
    }
}

fn invalid(url: &str, reason: url::ParseError) -> ClientError {
    ClientError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
