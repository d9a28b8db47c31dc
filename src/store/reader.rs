//! Source decoding

use crate::error::{Error, Result};
use crate::types::DecodePolicy;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

/// Decode raw source bytes into text.
///
/// A leading byte order mark is removed and overrides `encoding`, so a
/// UTF-16 file is read in the byte order its mark declares. Under
/// [`DecodePolicy::Strict`] a malformed sequence fails the load; under
/// [`DecodePolicy::Replace`] it becomes U+FFFD.
pub fn decode_source<'a>(
    path: &Path,
    bytes: &'a [u8],
    encoding: &'static Encoding,
    policy: DecodePolicy,
) -> Result<Cow<'a, str>> {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if actual != encoding {
        debug!(
            "{} starts with a byte order mark; decoding as {} instead of {}",
            path.display(),
            actual.name(),
            encoding.name()
        );
    }
    if !had_errors {
        return Ok(text);
    }

    match policy {
        DecodePolicy::Strict => Err(Error::Decode {
            path: path.display().to_string(),
            encoding: actual.name().to_string(),
        }),
        DecodePolicy::Replace => {
            warn!(
                "{} has byte sequences that are not valid {}; they were replaced with U+FFFD",
                path.display(),
                actual.name()
            );
            Ok(text)
        }
    }
}
