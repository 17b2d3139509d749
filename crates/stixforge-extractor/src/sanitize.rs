//! Response sanitization: strip markdown fencing, locate the JSON payload

/// Best-effort reduction of a raw LLM completion to the substring believed
/// to contain a JSON document.
///
/// Three steps: remove code-fence markers on any line, trim whitespace, and
/// if the text still does not start with `{` or `[`, discard everything
/// before the earliest occurrence of either. If neither character appears
/// the text is returned as-is so the recovery parser fails explicitly
/// instead of silently producing nonsense.
///
/// This stage never fails; it always returns a string.
pub fn sanitize_response(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let trimmed = unfenced.trim();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed.to_string();
    }

    match trimmed.find(['{', '[']) {
        Some(idx) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Remove markdown code-fence markers line by line.
///
/// A leading triple backtick (optionally tagged `json`, case-sensitive) and
/// a trailing triple backtick are stripped from every line; the rest of the
/// line is preserved.
fn strip_code_fences(raw: &str) -> String {
    let mut lines = Vec::new();
    for line in raw.lines() {
        let mut line = line;
        if let Some(rest) = line.strip_prefix("```json") {
            line = rest;
        } else if let Some(rest) = line.strip_prefix("```") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix("```") {
            line = rest;
        }
        lines.push(line);
    }
    lines.join("\n")
}
