//! A parser for the subset of the properties format used by git metadata files.

use std::collections::HashMap;

/// Parse properties into key/value pairs.
///
/// Entries are `key=value`, `key: value` or `key value`. Blank lines and lines starting with `#` or `!` are
/// skipped, a trailing backslash continues a value on the next line, and later entries override earlier ones.
/// Whitespace after the separator is dropped but trailing whitespace is part of the value.
pub fn parse_properties(input: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let mut entry = line.to_string();
        while has_continuation(&entry) {
            entry.pop();
            match lines.next() {
                Some(next) => entry.push_str(next.trim_start()),
                None => break,
            }
        }
        let (key, value) = split_entry(&entry);
        properties.insert(unescape(key), unescape(value));
    }
    properties
}

fn has_continuation(line: &str) -> bool {
    let backslashes = line.chars().rev().take_while(|c| *c == '\\').count();
    backslashes % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => {
                let key = &line[..index];
                let rest = line[index..].trim_start_matches([' ', '\t']);
                let value = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (key, value.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => output.push('\t'),
            Some('n') => output.push('\n'),
            Some('r') => output.push('\r'),
            Some('f') => output.push('\x0c'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => output.push(decoded),
                    None => {
                        output.push('u');
                        output.push_str(&code);
                    }
                }
            }
            Some(other) => output.push(other),
            None => {}
        }
    }
    output
}
