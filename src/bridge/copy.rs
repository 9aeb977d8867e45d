//! Buffered streaming copy
//!
//! Moves bytes between two open files through a fixed-size buffer, never
//! holding the whole file in memory.

use std::io::{self, Read, Write};

/// Default buffer size for streamed copies
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Copies `reader` into `writer` in `buffer_size` chunks and flushes.
///
/// Returns the number of bytes copied.
pub(crate) fn stream_copy<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total_bytes = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total_bytes += n as u64;
    }

    writer.flush()?;
    Ok(total_bytes)
}
