use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgusError {
    /// The submitted bytes could not be decoded into a raster image.
    /// Fatal for the request; no partial fingerprint is ever returned.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A fingerprint string does not represent exactly 64 bits.
    #[error("Inconsistent fingerprint: {0}")]
    InconsistentFingerprint(String),
}

pub type Result<T> = std::result::Result<T, ArgusError>;
