use crate::error::OutputError;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

const BYTES_PER_LINE: usize = 16;

/// Data to be written by [`emit`].
#[derive(Debug, Copy, Clone)]
pub enum ByteArrayData<'a> {
    /// Text, embedded with its NUL terminator.
    Text(&'a str),
    /// Binary data, embedded as is.
    Binary(&'a [u8]),
}

impl ByteArrayData<'_> {
    fn raw(&self) -> &[u8] {
        match self {
            ByteArrayData::Text(text) => text.as_bytes(),
            ByteArrayData::Binary(bytes) => bytes,
        }
    }

    /// The number of bytes in the embedded array.
    pub fn embedded_len(&self) -> usize {
        match self {
            ByteArrayData::Text(text) => text.len() + 1,
            ByteArrayData::Binary(bytes) => bytes.len(),
        }
    }
}

/// The comment written at the top of generated C sources.
pub fn header_comment() -> String {
    format!(
        "// This file is automatically created by shadercross v{}\n// \n#pragma once\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn write_array(
    out: &mut impl Write,
    data: ByteArrayData,
    variable: &str,
) -> std::io::Result<()> {
    let len = data.embedded_len();
    write!(out, "static const unsigned char {variable}[{len}] = {{\n\t")?;

    let bytes = data.raw().iter().copied();
    let bytes: Box<dyn Iterator<Item = u8>> = match data {
        ByteArrayData::Text(_) => Box::new(bytes.chain(std::iter::once(0))),
        ByteArrayData::Binary(_) => Box::new(bytes),
    };

    for (index, byte) in bytes.enumerate() {
        if index + 1 < len {
            write!(out, "0x{byte:02x}, ")?;
        } else {
            write!(out, "0x{byte:02x} }};\n")?;
        }
        if (index + 1) % BYTES_PER_LINE == 0 {
            out.write_all(b"\n\t")?;
        }
    }
    out.write_all(b"\n")
}

/// Write data to a file, either raw or as a named C byte array.
///
/// With a non-empty `variable`, the data is written as
/// `static const unsigned char <variable>[<len>] = { ... };`. Every literal is followed
/// by `, ` except the last, which closes the array. A line break and tab follow every
/// sixteenth literal, and a blank line ends the array.
/// Text gains a NUL terminator that is counted in `len`. A non-append write starts with
/// `header`. With an empty `variable` the data is written raw, without a terminator.
pub fn emit(
    path: impl AsRef<Path>,
    data: ByteArrayData,
    variable: &str,
    append: bool,
    header: &str,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let write_error = |e| OutputError::WriteError(path.to_path_buf(), e);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(write_error)?;
    let mut out = BufWriter::new(file);

    if variable.is_empty() {
        out.write_all(data.raw()).map_err(write_error)?;
    } else {
        if !append {
            out.write_all(header.as_bytes()).map_err(write_error)?;
        }
        write_array(&mut out, data, variable).map_err(write_error)?;
    }

    out.flush().map_err(write_error)
}
