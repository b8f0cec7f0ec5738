//! Errors specific to reading, writing or patching a PE image.

use std::{io::Error as IOError, str::Utf8Error};

use crate::constants::*;

/// Error that can occur when reading and parsing bytes.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ReadError(pub String);

/// Errors that can occur when reading a PE image.
#[derive(Debug, thiserror::Error)]
pub enum ImageReadError {
    #[error("invalid bytes: {0}")]
    InvalidBytes(ReadError),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("invalid section: {0}")]
    InvalidSection(String),
    #[error("invalid resource table: {0}")]
    InvalidResourceTable(String),
    #[error("io error: {0}")]
    IOError(IOError),
}
impl From<ReadError> for ImageReadError {
    fn from(error: ReadError) -> Self { ImageReadError::InvalidBytes(error) }
}
impl From<IOError> for ImageReadError {
    fn from(error: IOError) -> Self { ImageReadError::IOError(error) }
}

/// Errors that can occur when writing a PE image.
#[derive(Debug, thiserror::Error)]
pub enum ImageWriteError {
    #[error("not enough space in file header")]
    NotEnoughSpaceInHeader,
    #[error("section points outside image: {0} > {1}")]
    InvalidSectionRange(u64, u64),
    #[error("invalid alignment: file {0:#x}, section {1:#x}")]
    InvalidAlignment(u32, u32),
    #[error("image too large: {0:#x}")]
    ImageTooLarge(u64),
    #[error("rebuilt image is invalid: {0}")]
    InvalidRebuild(ImageReadError),
    #[error("io error: {0}")]
    IOError(IOError),
}
impl From<IOError> for ImageWriteError {
    fn from(error: IOError) -> Self { ImageWriteError::IOError(error) }
}

/// Errors that can occur when modifying resource data.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("invalid bytes: {0}")]
    InvalidBytes(ReadError),
    #[error("invalid utf8: {0}")]
    Utf8Error(Utf8Error),
    #[error("io error: {0}")]
    IOError(IOError),
}
impl From<Utf8Error> for ResourceError {
    fn from(error: Utf8Error) -> Self { ResourceError::Utf8Error(error) }
}
impl From<ReadError> for ResourceError {
    fn from(error: ReadError) -> Self { ResourceError::InvalidBytes(error) }
}
impl From<IOError> for ResourceError {
    fn from(error: IOError) -> Self { ResourceError::IOError(error) }
}

/// Errors reported by a resource update backend.
///
/// Every variant maps onto a non-zero Win32 style error code through [`PlatformError::code`].
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("io error: {0}")]
    IOError(#[from] IOError),
    #[error("invalid image: {0}")]
    Image(#[from] ImageReadError),
    #[error("image could not be rebuilt: {0}")]
    Write(#[from] ImageWriteError),
    #[error("resource could not be updated: {0}")]
    Resource(#[from] ResourceError),
    #[error("platform error {0}")]
    Code(u32),
}
impl PlatformError {
    /// Returns the numeric error code reported to the user.
    pub fn code(&self) -> u32 {
        let code = match self {
            PlatformError::IOError(error) => io_error_code(error),
            PlatformError::Image(ImageReadError::IOError(error)) => io_error_code(error),
            PlatformError::Image(_) => ERROR_BAD_EXE_FORMAT,
            PlatformError::Write(ImageWriteError::IOError(error)) => io_error_code(error),
            PlatformError::Write(ImageWriteError::InvalidRebuild(_)) => ERROR_BAD_EXE_FORMAT,
            PlatformError::Write(_) => ERROR_INVALID_DATA,
            PlatformError::Resource(ResourceError::IOError(error)) => io_error_code(error),
            PlatformError::Resource(_) => ERROR_INVALID_DATA,
            PlatformError::Code(code) => *code,
        };
        if code == 0 { ERROR_GEN_FAILURE } else { code }
    }
}

fn io_error_code(error: &IOError) -> u32 {
    use std::io::ErrorKind;
    if let Some(code) = error.raw_os_error().and_then(|code| u32::try_from(code).ok()) {
        return code;
    }
    match error.kind() {
        ErrorKind::NotFound => ERROR_FILE_NOT_FOUND,
        ErrorKind::PermissionDenied => ERROR_ACCESS_DENIED,
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => ERROR_INVALID_DATA,
        ErrorKind::WriteZero => ERROR_WRITE_FAULT,
        _ => ERROR_GEN_FAILURE,
    }
}

/// Errors that end a patch run. Each of them terminates the tool with exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("Exe file required as an argument")]
    Usage,
    #[error("could not begin resource update: {0}")]
    TransactionOpen(#[source] PlatformError),
    #[error("could not write resource entry: {0}")]
    ResourceWrite(#[source] PlatformError),
    #[error("could not commit resource update: {0}")]
    Commit(#[source] PlatformError),
}
impl PatchError {
    /// Returns the platform error code, or `None` for usage errors.
    pub fn code(&self) -> Option<u32> {
        match self {
            PatchError::Usage => None,
            PatchError::TransactionOpen(error)
            | PatchError::ResourceWrite(error)
            | PatchError::Commit(error) => Some(error.code()),
        }
    }

    /// Returns the single line printed to stderr: the usage text or the raw error code.
    pub fn diagnostic(&self) -> String {
        match self.code() {
            Some(code) => code.to_string(),
            None => self.to_string(),
        }
    }

    /// Returns the process exit status for the error.
    pub fn exit_code(&self) -> u8 { 1 }
}
