use crate::database::StoreError;
use thiserror::Error;

/// Domain errors raised by draw operations
#[derive(Error, Debug)]
pub enum DrawError {
    /// A required field is missing or out of range
    #[error("Invalid draw: field '{field}'")]
    InvalidDraw { field: String },

    /// Registration attempted on a draw that does not accept it
    #[error("Registration error: {0}")]
    Registration(String),

    /// A participant with the same id is already in the draw
    #[error("Participant {id} is already registered")]
    AlreadyRegistered { id: String },

    /// Malformed compact participant string
    #[error("Format error: {0}")]
    Format(String),

    /// The draw cannot produce a result in its current state
    #[error("Draw is not feasible")]
    NotFeasible,
}

impl DrawError {
    pub fn invalid(field: impl Into<String>) -> Self {
        DrawError::InvalidDraw {
            field: field.into(),
        }
    }
}

/// Result type alias for draw operations
pub type DrawResult<T> = Result<T, DrawError>;

/// Errors surfaced by the persistence driver
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("User {0} already exists")]
    UserExists(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("Persistence error: {0}")]
    Driver(#[from] DriverError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Driver(DriverError::Store(err))
    }
}

impl AppError {
    /// Check if error is a store connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            AppError::Driver(DriverError::Store(StoreError::PoolCreation(_)))
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Draw(DrawError::InvalidDraw { .. })
            | AppError::Draw(DrawError::Format(_))
            | AppError::Draw(DrawError::NotFeasible) => 400,
            AppError::Draw(DrawError::Registration(_)) => 403,
            AppError::Draw(DrawError::AlreadyRegistered { .. }) => 409,
            AppError::Driver(DriverError::UserExists(_)) => 409,
            AppError::Driver(_) | AppError::Config(_) => 500,
        }
    }
}

/// Convenience function to convert Option<T> to Result<T, AppError>
pub fn option_to_result<T>(opt: Option<T>, error_msg: &str) -> AppResult<T> {
    opt.ok_or_else(|| AppError::NotFound(error_msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::from(DrawError::invalid("prices")).status_code(), 400);
        assert_eq!(
            AppError::from(DrawError::AlreadyRegistered { id: "42".into() }).status_code(),
            409
        );
        assert_eq!(
            AppError::from(DriverError::UserExists("u1".into())).status_code(),
            409
        );
        assert_eq!(AppError::NotFound("draw".into()).status_code(), 404);
    }

    #[test]
    fn test_option_to_result() {
        let missing: Option<u32> = None;
        let err = option_to_result(missing, "Draw not found").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(option_to_result(Some(3), "unused").unwrap(), 3);
    }

    #[test]
    fn test_invalid_draw_message_names_field() {
        let err = DrawError::invalid("prices");
        assert!(err.to_string().contains("prices"));
    }
}
