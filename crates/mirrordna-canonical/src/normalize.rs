/// Normalizes text so that the same logical content hashes identically across
/// editors and operating systems.
///
/// CRLF and lone CR line endings become LF, and trailing whitespace is stripped
/// from every line. Leading whitespace and the number of lines are preserved.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
