use thiserror::Error;

/// Message shown for every failed lookup, whatever the cause.
pub const PLACE_NOT_FOUND_MESSAGE: &str = "City not found. Please try again.";

/// Failure of a place lookup.
///
/// Unknown places, transport failures and provider errors all collapse into
/// one kind. The `reason` is kept for logs and never shown to the user.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{}", PLACE_NOT_FOUND_MESSAGE)]
    PlaceLookupFailed { place: String, reason: String },
}

impl LookupError {
    pub fn place_lookup_failed(place: impl Into<String>, reason: impl Into<String>) -> Self {
        LookupError::PlaceLookupFailed { place: place.into(), reason: reason.into() }
    }

    pub fn place(&self) -> &str {
        match self {
            LookupError::PlaceLookupFailed { place, .. } => place,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            LookupError::PlaceLookupFailed { reason, .. } => reason,
        }
    }
}
