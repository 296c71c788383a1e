//! Target string parsing.
//!
//! Grammar: `[scheme://]authority[/path]`, plus the opaque `scheme:rest`
//! form used by unix-domain targets (`unix:socket`). A target with no
//! scheme prefix gets the registry's default scheme and the entire string
//! becomes the path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DEFAULT_SCHEME;
use crate::status::Status;

static SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*)://(.*)$").expect("scheme prefix regex")
});

static OPAQUE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*):(.*)$").expect("opaque prefix regex"));

/// Parsed form of a channel target string. Immutable after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Scheme selecting which resolver kind handles the target.
    pub scheme: String,
    /// Scheme-specific authority portion; empty for most targets.
    pub authority: String,
    /// Scheme-specific remainder. For `dns` this is the `host[:port]` to
    /// resolve (possibly with a leading `/` from the `dns:///...` form);
    /// for `unix` it is the socket path, keeping its leading slash for the
    /// absolute `unix:///...` form.
    pub path: String,
}

impl Target {
    /// Parses a target string.
    ///
    /// `known_schemes` disambiguates the opaque `scheme:rest` form: a
    /// prefix before a single `:` is only treated as a scheme if it is
    /// registered, so `unix:socket` selects the unix resolver while
    /// `localhost:50051` stays a dns target.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_ARGUMENT` status for an empty target or a
    /// scheme prefix with nothing after it.
    pub fn parse(target: &str, known_schemes: &[String]) -> Result<Target, Status> {
        if target.is_empty() {
            return Err(Status::invalid_argument("empty target string"));
        }

        if let Some(caps) = SCHEME_PREFIX.captures(target) {
            let scheme = caps[1].to_ascii_lowercase();
            let rest = &caps[2];
            if rest.is_empty() {
                return Err(Status::invalid_argument(format!(
                    "target '{target}' has no authority or path"
                )));
            }
            // A third slash right after `scheme://` means an empty authority
            // and a path that keeps its leading slash (`unix:///tmp/socket`).
            if rest.starts_with('/') {
                return Ok(Target {
                    scheme,
                    authority: String::new(),
                    path: rest.to_string(),
                });
            }
            return match rest.split_once('/') {
                Some((authority, path)) if !path.is_empty() => Ok(Target {
                    scheme,
                    authority: authority.to_string(),
                    path: path.to_string(),
                }),
                _ => Err(Status::invalid_argument(format!(
                    "target '{target}' has no path after its authority"
                ))),
            };
        }

        if let Some(caps) = OPAQUE_PREFIX.captures(target) {
            let scheme = caps[1].to_ascii_lowercase();
            if known_schemes.iter().any(|s| *s == scheme) {
                let rest = &caps[2];
                if rest.is_empty() {
                    return Err(Status::invalid_argument(format!(
                        "target '{target}' has an empty path"
                    )));
                }
                return Ok(Target {
                    scheme,
                    authority: String::new(),
                    path: rest.to_string(),
                });
            }
        }

        Ok(Target {
            scheme: DEFAULT_SCHEME.to_string(),
            authority: String::new(),
            path: target.to_string(),
        })
    }
}
