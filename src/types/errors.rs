use std::fmt;

// === StoreError ===

/// Errors raised by the durable per-user store.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize a workspace snapshot.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === RouteError ===

/// Reasons a location cannot be resolved to a logical page.
#[derive(Debug, PartialEq, Eq)]
pub enum RouteError {
    /// The path has too few segments to name a page.
    MissingSegments(String),
    /// The first segment is neither the app nor the builder area.
    UnknownArea(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MissingSegments(path) => {
                write!(f, "Route has too few segments: {}", path)
            }
            RouteError::UnknownArea(area) => write!(f, "Unknown route area: {}", area),
        }
    }
}

impl std::error::Error for RouteError {}

// === FetchError ===

/// Errors while resolving a record title from the backend.
#[derive(Debug)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    NetworkError(String),
    /// The backend answered with a non-success status code.
    HttpStatus(u16),
    /// The response body was not a JSON object.
    InvalidResponse(String),
    /// The record has no usable title field.
    MissingTitle(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NetworkError(msg) => write!(f, "Record fetch network error: {}", msg),
            FetchError::HttpStatus(code) => write!(f, "Record fetch failed with status {}", code),
            FetchError::InvalidResponse(msg) => {
                write!(f, "Invalid record response: {}", msg)
            }
            FetchError::MissingTitle(field) => {
                write!(f, "Record has no title field: {}", field)
            }
        }
    }
}

impl std::error::Error for FetchError {}

// === SessionError ===

/// Errors related to the authenticated workspace session.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// No user is logged in.
    NotLoggedIn,
    /// The user id is empty or otherwise unusable as a storage key.
    InvalidUser(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotLoggedIn => write!(f, "No active session"),
            SessionError::InvalidUser(id) => write!(f, "Invalid user id: {:?}", id),
        }
    }
}

impl std::error::Error for SessionError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
