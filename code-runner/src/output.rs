//! Bounded capture of child process output

use tokio::io::{AsyncRead, AsyncReadExt};

pub const STDOUT_TRUNCATION_MARKER: &str = "\n... (output truncated)";
pub const STDERR_TRUNCATION_MARKER: &str = "\n... (error truncated)";

/// Bytes kept from a stream, and whether the stream produced more
#[derive(Debug, Default)]
pub struct Captured {
    pub bytes: Vec<u8>,
    pub overflowed: bool,
}

/// Byte budget that always holds `max_chars` UTF-8 characters plus one
pub fn byte_cap_for(max_chars: usize) -> usize {
    max_chars.saturating_add(1).saturating_mul(4)
}

/// Read a stream to EOF into `captured`, keeping at most `byte_cap` bytes.
///
/// Everything past the cap is drained and discarded so the writer never
/// blocks on a full pipe. Bytes read before the future is dropped stay in
/// `captured`.
pub async fn read_into<R>(
    mut reader: R,
    byte_cap: usize,
    captured: &mut Captured,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        let room = byte_cap.saturating_sub(captured.bytes.len());
        if n > room {
            captured.overflowed = true;
        }
        captured.bytes.extend_from_slice(&buf[..n.min(room)]);
    }
}

/// Decode captured bytes and cut them to `max_chars`, appending `marker` when cut
pub fn bound_text(captured: &Captured, max_chars: usize, marker: &str) -> String {
    let text = String::from_utf8_lossy(&captured.bytes);
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], marker),
        None if captured.overflowed => format!("{}{}", text, marker),
        None => text.into_owned(),
    }
}
