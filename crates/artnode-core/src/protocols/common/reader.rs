/// Decode a fixed-width, NUL-padded ASCII field.
///
/// Everything from the first NUL onward is ignored; non-UTF-8 bytes are
/// replaced rather than rejected.
pub(crate) fn nul_padded_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// Encode `value` into a fixed-width field, always leaving a trailing NUL.
///
/// Returns the number of bytes copied from `value`.
pub(crate) fn write_nul_padded(dst: &mut [u8], value: &str) -> usize {
    dst.fill(0);
    let Some(capacity) = dst.len().checked_sub(1) else {
        return 0;
    };
    let bytes = value.as_bytes();
    let len = bytes.len().min(capacity);
    dst[..len].copy_from_slice(&bytes[..len]);
    len
}
