//! Postcode search and house-number selection.

use tracing::debug;

use crate::error::Error;
use crate::services::council_api::{AddressCandidate, CouncilApi};

/// Canonical postcode form used for searching and cache keys:
/// uppercase, whitespace stripped, one space re-inserted before the
/// final three characters ("cm231ab" → "CM23 1AB"). Inputs of three
/// characters or fewer are returned compact.
#[must_use]
pub fn normalize_postcode(raw: &str) -> String {
    let compact = raw.split_whitespace().collect::<String>().to_uppercase();
    let chars: Vec<char> = compact.chars().collect();

    if chars.len() > 3 {
        let (outward, inward) = chars.split_at(chars.len() - 3);
        format!(
            "{} {}",
            outward.iter().collect::<String>(),
            inward.iter().collect::<String>()
        )
    } else {
        compact
    }
}

/// Looks up every address candidate for a postcode.
///
/// # Errors
///
/// [`Error::NotFound`] when the upstream knows no addresses for the
/// postcode; [`Error::Upstream`] passed through from the API call.
pub async fn resolve<C: CouncilApi>(
    api: &C,
    postcode: &str,
) -> Result<Vec<AddressCandidate>, Error> {
    let candidates = api.search_addresses(postcode).await?;
    if candidates.is_empty() {
        return Err(Error::no_addresses());
    }

    debug!(postcode, count = candidates.len(), "address candidates");
    Ok(candidates)
}

/// Picks the candidate whose address contains the house-number
/// fragment, case-insensitively.
///
/// Selection is first-match in upstream order, with no ranking: an
/// ambiguous fragment ("1" matching both "1 High St" and "11 High St")
/// silently resolves to whichever the upstream listed first.
///
/// # Errors
///
/// [`Error::NotFound`] when no candidate contains the fragment.
pub fn select_by_fragment<'a>(
    candidates: &'a [AddressCandidate],
    fragment: &str,
) -> Result<&'a AddressCandidate, Error> {
    let needle = fragment.to_lowercase();

    candidates
        .iter()
        .find(|candidate| candidate.address.to_lowercase().contains(&needle))
        .ok_or_else(Error::no_matching_house)
}
