use thiserror::Error;

/// Failures surfaced by the weather lookup and the search history.
///
/// Nothing in the core retries; the caller decides whether to degrade
/// (history) or report (weather).
#[derive(Debug, Error)]
pub enum Error {
    /// Geocoding returned no match for the requested city.
    #[error("No location found for city: {0}")]
    NoLocationFound(String),

    /// The weather provider answered with an error status, an unreadable
    /// payload, or could not be reached at all.
    #[error("Weather provider error: {0}")]
    Upstream(String),

    /// The provider payload carried no samples to build a forecast from.
    #[error("Weather provider returned no forecast samples")]
    EmptyInput,

    /// Writing the history snapshot failed.
    #[error("Failed to persist search history: {0}")]
    Persist(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Short message suitable for showing to the person who ran the search.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoLocationFound(_) => "City not found.",
            Self::Upstream(_) | Self::EmptyInput => {
                "Weather service unavailable, try again later."
            }
            Self::Persist(_) => "History not saved.",
        }
    }

    /// `EmptyInput` is a malformed upstream payload, so it is grouped with
    /// `Upstream`.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::EmptyInput)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
