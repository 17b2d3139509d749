//! Multi-stage JSON recovery for unreliable LLM completions

use serde_json::error::Category;
use serde_json::Value;
use tracing::{debug, warn};

/// Attempt to parse sanitized completion text into a JSON value, repairing
/// or salvaging what it can. `None` means recovery failed.
///
/// Stages, stopping at the first success:
///
/// 1. Strict parse of the full text.
/// 2. If the parser reports unexpected end of input and the text starts
///    with `[` or `{`: append the exact deficit of closing tokens of the
///    matching kind and retry once.
/// 3. Salvage maximal balanced `{...}` fragments and collect those that
///    parse independently.
///
/// The ordering is deliberate triage: the cheap full-document fix runs
/// before lossy fragment salvage, because salvage discards relationship
/// context between fragments.
///
/// This stage never errors outward; all failures collapse into `None` and
/// the policy decision belongs to the caller.
pub fn recover_json(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => return Some(value),
        Err(err) => {
            debug!("strict parse failed: {}", err);
            if err.classify() == Category::Eof {
                if let Some(repaired) = repair_truncation(text) {
                    debug!("recovered truncated document by appending closing tokens");
                    return Some(repaired);
                }
            }
        }
    }

    let fragments = salvage_fragments(text);
    if fragments.is_empty() {
        warn!("JSON recovery failed, no usable data");
        None
    } else {
        debug!("salvaged {} independent object fragments", fragments.len());
        Some(Value::Array(fragments))
    }
}

/// Repair a document truncated mid-stream by appending the missing closing
/// tokens of the kind matching its opening character, then reparse once.
fn repair_truncation(text: &str) -> Option<Value> {
    let (open, close) = match text.trim_start().chars().next()? {
        '[' => ('[', ']'),
        '{' => ('{', '}'),
        _ => return None,
    };

    let deficit = closing_deficit(text, open, close);
    if deficit == 0 {
        return None;
    }

    let repaired = format!("{}{}", text, close.to_string().repeat(deficit));
    serde_json::from_str(&repaired).ok()
}

/// Count unmatched opening tokens of one bracket kind, ignoring characters
/// inside string literals.
fn closing_deficit(text: &str, open: char, close: char) -> usize {
    let mut opens = 0usize;
    let mut closes = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => opens += 1,
            c if c == close && !in_string => closes += 1,
            _ => {}
        }
    }

    opens.saturating_sub(closes)
}

/// Scan for maximal balanced `{...}` spans with a brace-depth state machine
/// and collect every span that parses on its own.
///
/// Depth tracking covers arbitrary nesting, and string/escape state keeps
/// braces inside string literals from being counted; a regex cannot do
/// either correctly.
fn salvage_fragments(text: &str) -> Vec<Value> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if !in_string => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(begin) = start.take() {
                            match serde_json::from_str::<Value>(&text[begin..=idx]) {
                                Ok(value) => fragments.push(value),
                                Err(err) => {
                                    debug!("dropping unparseable fragment: {}", err);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fragments
}
