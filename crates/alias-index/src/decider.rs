//! Decides what following a link should do.

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::index::AliasIndex;

/// Outcome of following a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Decision {
    /// Let the host open its own exact match.
    NavigateDirect,
    /// Several notes answer to the linktext; let the user pick.
    #[serde(rename_all = "camelCase")]
    ShowDisambiguation {
        linktext: String,
        source_path: String,
        /// Best candidate first
        candidates: Vec<String>,
    },
    /// Nothing resolves the link; offer to create a note or link an existing one.
    #[serde(rename_all = "camelCase")]
    OfferCreateOrLink {
        linktext: String,
        source_path: String,
    },
}

impl Decision {
    pub fn is_direct(&self) -> bool {
        matches!(self, Decision::NavigateDirect)
    }
}

/// Decide what following `linktext` from `source_path` should do.
///
/// `host_exact_match` is the host's own resolution of the link (None when the
/// link is unresolved). Ranking uses the link path, so `Note#Heading|shown`
/// is matched as `Note`. A link with no path (`#Heading`) stays in the
/// source note and always navigates directly.
///
/// Fails with [`ResolveError::SourceNoteUnavailable`] when the source note is
/// not indexed; callers should then navigate directly.
pub fn decide(
    index: &AliasIndex,
    linktext: &str,
    source_path: &str,
    host_exact_match: Option<&str>,
) -> Result<Decision> {
    if !index.contains(source_path) {
        return Err(ResolveError::SourceNoteUnavailable {
            path: source_path.to_string(),
        });
    }

    let Some(exact) = host_exact_match else {
        tracing::debug!("No exact match for {:?} from {}", linktext, source_path);
        return Ok(Decision::OfferCreateOrLink {
            linktext: linktext.to_string(),
            source_path: source_path.to_string(),
        });
    };

    let linkpath = wiki_links::linkpath(linktext);
    if linkpath.is_empty() {
        // `[[#Heading]]` points into the source note itself.
        tracing::trace!("Same-note link {:?} in {}", linktext, source_path);
        return Ok(Decision::NavigateDirect);
    }

    let candidates = index.search_linklike(linkpath, source_path);
    if candidates.len() > 1 {
        tracing::debug!(
            "{} candidates for {:?} from {}",
            candidates.len(),
            linktext,
            source_path
        );
        return Ok(Decision::ShowDisambiguation {
            linktext: linktext.to_string(),
            source_path: source_path.to_string(),
            candidates: candidates.into_iter().map(str::to_string).collect(),
        });
    }

    tracing::trace!("Navigating directly to {}", exact);
    Ok(Decision::NavigateDirect)
}
