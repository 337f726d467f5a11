use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not find {file} at {} or {}", primary.display(), alternate.display())]
    SurfaceNotFound {
        file: &'static str,
        primary: PathBuf,
        alternate: PathBuf,
    },

    #[error("no displays found")]
    NoDisplays,

    #[error("invalid settings payload: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}
