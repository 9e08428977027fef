//! Presenter/viewer identity scheme and shareable links.

use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use url::Url;

/// Prefix of the presenter identity.
pub const PRESENTER_PREFIX: &str = "presenter-";

/// Prefix of every viewer identity.
pub const VIEWER_PREFIX: &str = "viewer-";

const VIEWER_SUFFIX_LEN: usize = 6;

/// Errors building identities or links.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Room id is empty or contains characters unsafe in a URL segment.
    #[error("Invalid room id: {0:?}")]
    InvalidRoomId(String),

    /// Origin is not an absolute base URL.
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}

/// Check that a room id is usable in identities and links.
pub fn validate_room_id(room_id: &str) -> Result<(), IdentityError> {
    let valid = !room_id.is_empty()
        && room_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(IdentityError::InvalidRoomId(room_id.to_string()))
    }
}

/// `presenter-<roomId>`.
pub fn presenter_identity(room_id: &str) -> String {
    format!("{PRESENTER_PREFIX}{room_id}")
}

/// `viewer-<roomId>-<suffix>`.
pub fn viewer_identity(room_id: &str, suffix: &str) -> String {
    format!("{VIEWER_PREFIX}{room_id}-{suffix}")
}

/// A fresh viewer identity with a random lowercase alphanumeric suffix.
pub fn generate_viewer_identity(room_id: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VIEWER_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    viewer_identity(room_id, &suffix)
}

/// `<origin>/viewer/<roomId>`.
pub fn shareable_link(origin: &str, room_id: &str) -> Result<Url, IdentityError> {
    validate_room_id(room_id)?;

    let mut url =
        Url::parse(origin).map_err(|_| IdentityError::InvalidOrigin(origin.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| IdentityError::InvalidOrigin(origin.to_string()))?
        .pop_if_empty()
        .push("viewer")
        .push(room_id);

    Ok(url)
}

/// Extract the room id from a shareable link. The rest of the link is opaque.
pub fn room_id_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    while let Some(segment) = segments.next() {
        if segment == "viewer" {
            let room_id = segments.next()?;
            return validate_room_id(room_id).ok().map(|()| room_id.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert_eq!(presenter_identity("room1"), "presenter-room1");
        assert_eq!(viewer_identity("room1", "abc123"), "viewer-room1-abc123");
    }

    #[test]
    fn test_generated_viewer_identity_is_unique() {
        let a = generate_viewer_identity("room1");
        let b = generate_viewer_identity("room1");

        assert!(a.starts_with("viewer-room1-"));
        assert_eq!(a.len(), "viewer-room1-".len() + VIEWER_SUFFIX_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_shareable_link() {
        let link = shareable_link("https://cast.example.com", "room1").unwrap();
        assert_eq!(link.as_str(), "https://cast.example.com/viewer/room1");

        let link = shareable_link("https://cast.example.com/", "room1").unwrap();
        assert_eq!(link.as_str(), "https://cast.example.com/viewer/room1");
    }

    #[test]
    fn test_shareable_link_rejects_bad_input() {
        assert_eq!(
            shareable_link("not a url", "room1"),
            Err(IdentityError::InvalidOrigin("not a url".to_string()))
        );
        assert!(matches!(
            shareable_link("https://cast.example.com", "a/b"),
            Err(IdentityError::InvalidRoomId(_))
        ));
        assert!(validate_room_id("").is_err());
    }

    #[test]
    fn test_room_id_from_link() {
        assert_eq!(
            room_id_from_link("https://cast.example.com/viewer/room1"),
            Some("room1".to_string())
        );
        assert_eq!(
            room_id_from_link("https://cast.example.com/app/viewer/room-2?x=1"),
            Some("room-2".to_string())
        );
        assert_eq!(room_id_from_link("https://cast.example.com/viewer/"), None);
        assert_eq!(room_id_from_link("garbage"), None);
    }
}
