use thiserror::Error;

/// Lookup failures a caller may want to match on.
///
/// These travel inside `anyhow::Error`; use `downcast_ref::<LookupError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("City name must not be empty.")]
    EmptyCity,

    #[error("No location found for '{city}'.\nHint: check the spelling or add a country code, e.g. `{city},CA`.")]
    NoMatch { city: String },

    #[error(
        "No API key configured.\n\
         Hint: set the API_KEY environment variable or run `geoweather configure`."
    )]
    MissingApiKey,
}
