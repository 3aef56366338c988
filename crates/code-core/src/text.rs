/// Split file contents into lines the way a line reader would: CRLF and lone CR count as line
/// breaks, and a trailing newline does not produce an extra empty line.
pub(crate) fn split_file_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    body.split('\n').map(str::to_string).collect()
}
