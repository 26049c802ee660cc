//! User-facing alerts and inline messages.

use std::fmt;

use strum_macros::AsRefStr;

/// Everything a flow can tell the user.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Notification {
    /// Location permission was refused; the map is disabled.
    LocationPermissionDenied,
    /// The point fetch failed.
    FetchFailed,
    /// The fetch succeeded but no point survived normalization.
    NoValidPoints,
    /// The renderer could not draw the heatmap.
    RenderFailed,
    /// A numeric form field was left empty.
    MissingFields,
    /// A numeric form field does not parse as a number.
    InvalidNumbers,
    /// Every address field was left empty.
    EmptyAddress,
    /// Address lookup is not configured (no API key).
    GeocoderUnavailable,
    /// The geocoder found no match for the address.
    AddressNotFound,
    /// The geocoder request failed.
    GeocodingFailed,
    /// The point was inserted.
    PointSaved,
    /// The insert request failed.
    SaveFailed,
    /// Adding points needs a logged-in session.
    LoginRequired,
    /// Login succeeded.
    LoginSucceeded,
    /// The service rejected the credentials.
    LoginFailed {
        /// Message returned by the service.
        message: String,
    },
    /// The login service could not be reached or answered garbage.
    LoginConnectionFailed,
    /// The session was cleared.
    LoggedOut,
}

impl Notification {
    /// Whether this notification reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(
            self,
            Self::PointSaved | Self::LoginSucceeded | Self::LoggedOut | Self::NoValidPoints
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocationPermissionDenied => f.write_str("Location permission was denied"),
            Self::FetchFailed => f.write_str("Error calling the API"),
            Self::NoValidPoints => f.write_str("No valid heat points found."),
            Self::RenderFailed => f.write_str("Could not draw the heatmap."),
            Self::MissingFields => f.write_str("Please fill in all fields."),
            Self::InvalidNumbers => {
                f.write_str("Please enter valid numbers for latitude, longitude and value.")
            }
            Self::EmptyAddress => f.write_str("Please fill in at least one address field."),
            Self::GeocoderUnavailable => {
                f.write_str("Address lookup is not configured (set GEOCODER_API_KEY).")
            }
            Self::AddressNotFound => f.write_str("Address not found."),
            Self::GeocodingFailed => f.write_str("Could not look up the address. Try again."),
            Self::PointSaved => f.write_str("Point saved successfully!"),
            Self::SaveFailed => f.write_str("Error saving the point. Try again."),
            Self::LoginRequired => f.write_str("Please log in before adding points."),
            Self::LoginSucceeded => f.write_str("Logged in successfully!"),
            Self::LoginFailed { message } => f.write_str(message),
            Self::LoginConnectionFailed => f.write_str("Error connecting to the API."),
            Self::LoggedOut => f.write_str("Logged out."),
        }
    }
}

/// Shows notifications to the user.
pub trait Notifier: Send + Sync {
    /// Displays one notification.
    fn notify(&self, notification: &Notification);
}
