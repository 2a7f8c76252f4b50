//! Request URL construction.
//!
//! Every upstream call has the same path shape:
//! `{base}/{token}/{format}/{gridId}/{start}/{end}`.

use url::Url;

use crate::config::DataFormat;
use crate::error_handling::FetchError;
use crate::paginate::PageWindow;

/// Builds the request URL for one window of one dataset.
///
/// Path segments are percent-encoded, so a token or grid id containing `/`
/// cannot escape its segment. A trailing slash on `base_url` is ignored.
///
/// # Errors
///
/// `FetchError::InvalidUrl` if `base_url` does not parse or cannot carry a
/// path (e.g. `mailto:`).
pub fn build_request_url(
    base_url: &str,
    token: &str,
    format: DataFormat,
    grid_id: &str,
    window: PageWindow,
) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)?;
    let start = window.start().to_string();
    let end = window.end().to_string();
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend([token, format.as_ref(), grid_id, start.as_str(), end.as_str()]);
    Ok(url)
}
