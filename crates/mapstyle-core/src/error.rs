pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown style profile: {name}")]
    UnknownProfile { name: String },

    #[error("Invalid style profile: {message}")]
    InvalidProfile { message: String },

    #[error("Invalid colour: {value}")]
    InvalidColour { value: String },

    #[error("Profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
