use crate::error::ContainerError;
use shadercross_common::{ShaderLanguage, ShaderStage};
use std::path::{Path, PathBuf};

/// The container signature, `SGS1`.
pub const CONTAINER_SIGNATURE: u32 = 0x5347_5331;
/// The container format version.
pub const CONTAINER_VERSION: i32 = 100;
/// The file extension reserved for containers.
pub const CONTAINER_EXTENSION: &str = "sgs";

/// Size of the container header in bytes.
pub const HEADER_SIZE: usize = 20;
/// Size of a stage table entry in bytes.
pub const STAGE_ENTRY_SIZE: usize = 20;

#[derive(Debug, Clone)]
struct StageBlobs {
    stage: ShaderStage,
    code: Vec<u8>,
    reflection: Vec<u8>,
}

fn nul_terminated(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    bytes
}

fn strip_nul(bytes: &[u8]) -> &[u8] {
    bytes.strip_suffix(&[0]).unwrap_or(bytes)
}

/// Accumulates stage blobs in memory and writes them as a single container.
///
/// Nothing is written to disk until [`ContainerWriter::commit`], which consumes
/// the writer.
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    path: PathBuf,
    language: ShaderLanguage,
    profile_version: u32,
    stages: Vec<StageBlobs>,
}

impl ContainerWriter {
    /// Start a container destined for the given path.
    pub fn open(path: impl Into<PathBuf>, language: ShaderLanguage, profile_version: u32) -> Self {
        ContainerWriter {
            path: path.into(),
            language,
            profile_version,
            stages: Vec::new(),
        }
    }

    /// The path the container will be written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&mut self, stage: ShaderStage) -> &mut StageBlobs {
        let index = match self.stages.iter().position(|s| s.stage == stage) {
            Some(index) => index,
            None => {
                self.stages.push(StageBlobs {
                    stage,
                    code: Vec::new(),
                    reflection: Vec::new(),
                });
                self.stages.len() - 1
            }
        };
        &mut self.stages[index]
    }

    /// Append the code of a stage.
    pub fn add_stage(&mut self, stage: ShaderStage, code: &str) {
        self.record(stage).code.extend(nul_terminated(code));
    }

    /// Append the reflection document of a stage.
    pub fn add_stage_reflection(&mut self, stage: ShaderStage, reflection: &str) {
        self.record(stage).reflection.extend(nul_terminated(reflection));
    }

    /// Serialize the container.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ContainerError> {
        fn int(value: usize) -> Result<i32, ContainerError> {
            i32::try_from(value).map_err(|_| ContainerError::TooLarge)
        }

        let table_size = STAGE_ENTRY_SIZE * self.stages.len();
        let payload_size: usize = self
            .stages
            .iter()
            .map(|s| s.code.len() + s.reflection.len())
            .sum();

        let mut bytes = Vec::with_capacity(HEADER_SIZE + table_size + payload_size);
        bytes.extend_from_slice(&CONTAINER_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&CONTAINER_VERSION.to_le_bytes());
        bytes.extend_from_slice(&self.language.container_id().to_le_bytes());
        bytes.extend_from_slice(&int(self.profile_version as usize)?.to_le_bytes());
        bytes.extend_from_slice(&int(self.stages.len())?.to_le_bytes());

        let mut offset = HEADER_SIZE + table_size;
        for stage in &self.stages {
            let code_offset = offset;
            let reflection_offset = code_offset + stage.code.len();
            offset = reflection_offset + stage.reflection.len();

            for field in [
                stage.stage.container_id(),
                int(stage.code.len())?,
                int(code_offset)?,
                int(stage.reflection.len())?,
                int(reflection_offset)?,
            ] {
                bytes.extend_from_slice(&field.to_le_bytes());
            }
        }
        int(offset)?;

        for stage in &self.stages {
            bytes.extend_from_slice(&stage.code);
            bytes.extend_from_slice(&stage.reflection);
        }

        Ok(bytes)
    }

    /// Write the container to its destination, creating or truncating the file.
    ///
    /// If writing fails, a partially written file may be left behind.
    pub fn commit(self) -> Result<(), ContainerError> {
        let bytes = self.to_bytes()?;
        std::fs::write(&self.path, &bytes)
            .map_err(|e| ContainerError::WriteError(self.path.clone(), e))?;
        tracing::debug!(
            path = %self.path.display(),
            stages = self.stages.len(),
            size = bytes.len(),
            "committed container"
        );
        Ok(())
    }
}

/// A stage table entry of a container.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StageEntry {
    pub stage: ShaderStage,
    pub code_size: u32,
    pub code_offset: u32,
    pub reflection_size: u32,
    pub reflection_offset: u32,
}

/// A decoded container.
#[derive(Debug, Clone)]
pub struct Container {
    pub language: ShaderLanguage,
    pub profile_version: u32,
    pub entries: Vec<StageEntry>,
    data: Vec<u8>,
}

fn read_i32(bytes: &[u8], offset: usize) -> Result<i32, ContainerError> {
    let word = bytes
        .get(offset..offset + 4)
        .ok_or(ContainerError::Truncated)?;
    Ok(i32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

impl Container {
    /// Read and decode the container at the given path.
    pub fn read(path: impl AsRef<Path>) -> Result<Container, ContainerError> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).map_err(|e| ContainerError::ReadError(path.to_path_buf(), e))?;
        Container::parse(bytes)
    }

    /// Decode a container, validating the header, the stage table and every payload range.
    pub fn parse(bytes: Vec<u8>) -> Result<Container, ContainerError> {
        let signature = read_i32(&bytes, 0)? as u32;
        if signature != CONTAINER_SIGNATURE {
            return Err(ContainerError::InvalidSignature(signature));
        }

        let version = read_i32(&bytes, 4)?;
        if version != CONTAINER_VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }

        let language_id = read_i32(&bytes, 8)?;
        let language = ShaderLanguage::from_container_id(language_id)
            .ok_or(ContainerError::UnknownLanguage(language_id))?;
        let profile_version = read_i32(&bytes, 12)?;
        let num_stages =
            usize::try_from(read_i32(&bytes, 16)?).map_err(|_| ContainerError::Truncated)?;

        let table_end = HEADER_SIZE + STAGE_ENTRY_SIZE * num_stages;
        if bytes.len() < table_end {
            return Err(ContainerError::Truncated);
        }

        let mut entries = Vec::with_capacity(num_stages);
        for index in 0..num_stages {
            let base = HEADER_SIZE + STAGE_ENTRY_SIZE * index;
            let stage_id = read_i32(&bytes, base)?;
            let stage = ShaderStage::from_container_id(stage_id)
                .ok_or(ContainerError::UnknownStage(stage_id))?;

            let range = |at: usize, kind: &'static str| -> Result<(u32, u32), ContainerError> {
                let invalid = ContainerError::InvalidRange { stage, kind };
                let size = u32::try_from(read_i32(&bytes, base + at)?).map_err(|_| {
                    ContainerError::InvalidRange { stage, kind }
                })?;
                let offset = u32::try_from(read_i32(&bytes, base + at + 4)?).map_err(|_| {
                    ContainerError::InvalidRange { stage, kind }
                })?;
                let end = offset as usize + size as usize;
                if (offset as usize) < table_end || end > bytes.len() {
                    return Err(invalid);
                }
                Ok((size, offset))
            };

            let (code_size, code_offset) = range(4, "code")?;
            let (reflection_size, reflection_offset) = range(12, "reflection")?;
            entries.push(StageEntry {
                stage,
                code_size,
                code_offset,
                reflection_size,
                reflection_offset,
            });
        }

        Ok(Container {
            language,
            profile_version: profile_version as u32,
            entries,
            data: bytes,
        })
    }

    fn entry(&self, stage: ShaderStage) -> Option<&StageEntry> {
        self.entries.iter().find(|e| e.stage == stage)
    }

    fn slice(&self, offset: u32, size: u32) -> &[u8] {
        &self.data[offset as usize..offset as usize + size as usize]
    }

    /// The code of a stage, without its terminator.
    pub fn code(&self, stage: ShaderStage) -> Option<&[u8]> {
        self.entry(stage)
            .map(|e| strip_nul(self.slice(e.code_offset, e.code_size)))
    }

    /// The reflection document of a stage, without its terminator.
    pub fn reflection(&self, stage: ShaderStage) -> Option<&[u8]> {
        self.entry(stage)
            .map(|e| strip_nul(self.slice(e.reflection_offset, e.reflection_size)))
    }
}
