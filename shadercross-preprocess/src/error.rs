use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading shader sources and resolving includes.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// The file could not be read.
    #[error("the file `{0}` could not be read")]
    IOError(PathBuf, std::io::Error),
    /// The file did not contain valid UTF-8.
    #[error("the file `{0}` is not valid utf8")]
    Utf8Error(PathBuf),
    /// A preprocessor definition could not be parsed.
    #[error("invalid preprocessor definition `{0}`")]
    InvalidDefine(String),
    /// An included file could not be found.
    #[error("could not resolve include `{0}`")]
    IncludeNotFound(String),
}
