use shadercross_common::ShaderStage;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for reading and writing binary containers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ContainerError {
    /// The container could not be written.
    #[error("writing to {} failed", .0.display())]
    WriteError(PathBuf, #[source] std::io::Error),

    /// The container could not be read.
    #[error("reading {} failed", .0.display())]
    ReadError(PathBuf, #[source] std::io::Error),

    /// The payload is too large to be addressed by the stage table.
    #[error("container payload exceeds the addressable size")]
    TooLarge,

    /// The file does not start with the container signature.
    #[error("invalid container signature {0:#010x}")]
    InvalidSignature(u32),

    /// The container was written with an unknown format version.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(i32),

    /// The header names an unknown target language.
    #[error("unknown container language tag {0}")]
    UnknownLanguage(i32),

    /// A stage entry names an unknown stage.
    #[error("unknown container stage id {0}")]
    UnknownStage(i32),

    /// The header or stage table extends past the end of the file.
    #[error("container is truncated")]
    Truncated,

    /// A payload range lies outside the file, or overlaps the header or table.
    #[error("{kind} range of the {stage} stage is out of bounds")]
    InvalidRange {
        stage: ShaderStage,
        kind: &'static str,
    },
}

/// Error type for routing compiled output.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum OutputError {
    /// An output file could not be written.
    #[error("writing to {} failed", .0.display())]
    WriteError(PathBuf, #[source] std::io::Error),

    /// The binary container could not be committed.
    #[error("could not commit the binary container")]
    ContainerError(#[from] ContainerError),
}
