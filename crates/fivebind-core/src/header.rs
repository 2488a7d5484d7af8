//! Hand-written parser for the stdlib header dialect.
//!
//! Recognizes `LIBFIVE_SECTION(name)` markers and `LIBFIVE_STDLIB name(args);`
//! declarations, which may span several lines. Everything else (includes,
//! macros, typedefs) is skipped. Line comments written inside a declaration
//! become the descriptor's documentation.
//!
//! Argument types are recorded verbatim (whitespace-normalized); deciding
//! whether a type is supported is left to the emitter.

use std::path::Path;

use log::debug;

use crate::descriptor::{is_identifier, normalize_c_type, DescriptorTable, FunctionDescriptor};
use crate::error::{CoreError, Result};

const SECTION_MARKER: &str = "LIBFIVE_SECTION";
const DECL_MARKER: &str = "LIBFIVE_STDLIB";

/// A declaration collected across one or more lines.
struct Pending {
    line: usize,
    text: String,
    doc: Vec<String>,
}

/// Parse header text into a descriptor table.
///
/// Linkage names are formed as `symbol_prefix + name`.
pub fn parse_header(input: &str, symbol_prefix: &str) -> Result<DescriptorTable> {
    let source = strip_block_comments(input);
    let mut table = DescriptorTable::new();
    let mut section: Option<String> = None;
    let mut pending: Option<Pending> = None;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let (code, comment) = match raw_line.find("//") {
            Some(pos) => (&raw_line[..pos], Some(raw_line[pos + 2..].trim())),
            None => (raw_line, None),
        };
        let mut comment = comment.filter(|c| !c.is_empty());
        let mut rest = code;
        let mut closed_on_line = false;

        loop {
            if let Some(decl) = pending.as_mut() {
                let Some(end) = rest.find(';') else {
                    decl.text.push(' ');
                    decl.text.push_str(rest);
                    decl.doc.extend(comment.take().map(str::to_string));
                    break;
                };
                decl.text.push(' ');
                decl.text.push_str(&rest[..end]);
                decl.doc.extend(comment.take().map(str::to_string));
                rest = &rest[end + 1..];
                closed_on_line = true;

                if let Some(decl) = pending.take() {
                    let module = section.as_deref().ok_or_else(|| CoreError::InvalidHeader {
                        line: decl.line,
                        detail: format!("declaration outside any {SECTION_MARKER}"),
                    })?;
                    table.push(parse_declaration(&decl, module, symbol_prefix)?);
                }
                continue;
            }

            let code = rest.trim();
            if code.is_empty() {
                break;
            }
            if let Some(tail) = code.strip_prefix(SECTION_MARKER) {
                let name = parse_section_name(tail, line_no)?;
                debug!("header section '{name}' at line {line_no}");
                table.ensure_module(&name);
                section = Some(name);
                break;
            }
            match code.strip_prefix(DECL_MARKER) {
                Some(tail) if tail.starts_with(|c: char| c.is_whitespace()) => {
                    pending = Some(Pending {
                        line: line_no,
                        text: String::new(),
                        doc: Vec::new(),
                    });
                    rest = tail;
                }
                _ if closed_on_line => {
                    return Err(CoreError::InvalidHeader {
                        line: line_no,
                        detail: format!("unexpected text after ';': '{code}'"),
                    });
                }
                _ => break,
            }
        }
    }

    if let Some(decl) = pending {
        return Err(CoreError::InvalidHeader {
            line: decl.line,
            detail: "unterminated declaration (missing ';')".to_string(),
        });
    }

    Ok(table)
}

/// Read and parse a header file.
pub fn load_header(path: &Path, symbol_prefix: &str) -> Result<DescriptorTable> {
    let content = std::fs::read_to_string(path)?;
    parse_header(&content, symbol_prefix)
}

/// Parse the `(name)` tail of a section marker.
fn parse_section_name(rest: &str, line: usize) -> Result<String> {
    let rest = rest.trim();
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.split_once(')'))
        .map(|(inner, _)| inner.trim())
        .ok_or_else(|| CoreError::InvalidHeader {
            line,
            detail: format!("malformed {SECTION_MARKER} marker"),
        })?;
    if !is_identifier(inner) {
        return Err(CoreError::InvalidHeader {
            line,
            detail: format!("invalid section name '{inner}'"),
        });
    }
    Ok(inner.to_string())
}

/// Turn `name(type a, type b);` into a descriptor.
fn parse_declaration(
    decl: &Pending,
    module: &str,
    symbol_prefix: &str,
) -> Result<FunctionDescriptor> {
    let err = |detail: String| CoreError::InvalidHeader {
        line: decl.line,
        detail,
    };

    let body = decl.text.trim();
    let open = body.find('(').ok_or_else(|| err("missing '('".to_string()))?;
    if !body.ends_with(')') {
        return Err(err("missing ')'".to_string()));
    }

    let name = body[..open].trim();
    if !is_identifier(name) {
        return Err(err(format!("invalid function name '{name}'")));
    }

    let raw_name = format!("{symbol_prefix}{name}");
    if !is_identifier(&raw_name) {
        return Err(err(format!("invalid linkage name '{raw_name}'")));
    }
    let mut descriptor = FunctionDescriptor::new(name, &raw_name, module);

    for (arg_type, arg_name) in parse_params(&body[open + 1..body.len() - 1]).map_err(err)? {
        descriptor = descriptor.arg(&arg_name, &arg_type);
    }
    if !decl.doc.is_empty() {
        descriptor = descriptor.with_doc(&decl.doc.join("\n"));
    }

    Ok(descriptor)
}

/// Parse the parameter list between `(` and `)` into `(type, name)` pairs.
fn parse_params(s: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let s = s.trim();
    if s.is_empty() || s == "void" {
        return Ok(Vec::new());
    }

    let mut params = Vec::new();
    for part in s.split(',') {
        let tokens = tokenize(part);
        let (name, ty) = match tokens.split_last() {
            Some((name, ty)) if !ty.is_empty() && is_identifier(name) => (name, ty),
            _ => return Err(format!("parameter '{}' needs a type and a name", part.trim())),
        };
        params.push((normalize_c_type(&ty.join(" ")), name.to_string()));
    }
    Ok(params)
}

/// Split on whitespace, keeping `*` as separate tokens.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut remaining = part;
        while !remaining.is_empty() {
            if let Some(star_pos) = remaining.find('*') {
                if star_pos > 0 {
                    tokens.push(&remaining[..star_pos]);
                }
                tokens.push("*");
                remaining = &remaining[star_pos + 1..];
            } else {
                tokens.push(remaining);
                break;
            }
        }
    }
    tokens
}

/// Replace `/* ... */` with spaces, keeping newlines so line numbers hold.
fn strip_block_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let (comment, tail) = match after.find("*/") {
            Some(end) => (&after[..end], &after[end + 2..]),
            None => (after, ""),
        };
        out.extend(comment.chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
        rest = tail;
    }
    out.push_str(rest);
    out
}
