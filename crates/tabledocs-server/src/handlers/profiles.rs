//! User profile API endpoint.
//!
//! Returns freshly generated synthetic profiles on every request. Nothing
//! is cached; two identical requests return different data.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query};
use tabledocs_profiles::UserProfile;

use crate::error::ServerError;

/// Handle GET /api/user-profile/{n}.
///
/// `n` is the number of profiles to generate; the optional `nFriends`
/// query parameter adds that many friends to each profile.
pub(crate) async fn get_profiles(
    Path(n): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<UserProfile>>, ServerError> {
    let n = parse_count(&n)?;
    let n_friends = match params.get("nFriends") {
        Some(raw) => parse_count(raw)?,
        None => 0,
    };

    Ok(Json(tabledocs_profiles::generate_with_friends(n, n_friends)))
}

/// Parse a count parameter, rejecting anything that is not a number.
fn parse_count(raw: &str) -> Result<usize, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_valid() {
        assert_eq!(parse_count("3").unwrap(), 3);
        assert_eq!(parse_count("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_count_invalid() {
        let err = parse_count("abc").unwrap_err();
        assert_eq!(err.to_string(), "Expected a number, but received 'abc'");

        assert!(parse_count("-1").is_err());
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("").is_err());
    }
}
