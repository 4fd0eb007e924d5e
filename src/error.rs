//! Error taxonomy for the lookup pipeline.
//!
//! Every failure a query can hit maps to one of these kinds, and every
//! kind maps to a single user-facing message. The CLI catches the error
//! at the top level, logs the detail, and prints only [`Error::user_message`].

/// A failure somewhere in the resolve → normalize → aggregate pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No addresses for the postcode, or no candidate matched the
    /// house-number fragment. The message is already user-facing.
    #[error("{0}")]
    NotFound(String),

    /// An upstream record carried a collection date we could not parse.
    /// Aborts the whole normalization: a schedule with silently dropped
    /// bins would be worse than no schedule.
    #[error("unparseable collection date: {0:?}")]
    DateParse(String),

    /// Non-success HTTP status or malformed JSON from the council API.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The payload normalized to zero collection events.
    #[error("property has no collection data")]
    EmptySchedule,
}

impl Error {
    /// The single text shown to the user for this failure.
    ///
    /// `NotFound` carries its own wording; everything else collapses to
    /// the two generic messages the service has always shown.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound(message) => message.clone(),
            Error::EmptySchedule => "No collection data available for this address.".to_string(),
            Error::DateParse(_) | Error::Upstream(_) => {
                "Error fetching data. Please try again later.".to_string()
            }
        }
    }

    /// `NotFound` with the wording for a postcode that returned no addresses.
    #[must_use]
    pub fn no_addresses() -> Self {
        Error::NotFound("No addresses found for that postcode.".to_string())
    }

    /// `NotFound` with the wording for a house number absent from the
    /// candidate list.
    #[must_use]
    pub fn no_matching_house() -> Self {
        Error::NotFound("House number not found for that postcode.".to_string())
    }
}
