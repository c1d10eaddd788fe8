use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Inline(String),
    Display(String),
}

/// Splits a statement into text and math segments.
///
/// `$$...$$` is display math, `$...$` inline math and `\$` a literal
/// dollar sign. A delimiter without its closing pair stays plain text.
pub fn parse_markup(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with("\\$") {
            text.push('$');
            rest = &rest[2..];
            continue;
        }

        if rest.starts_with("$$") {
            if let Some(end) = rest[2..].find("$$").filter(|end| *end > 0) {
                flush_text(&mut segments, &mut text);
                segments.push(Segment::Display(rest[2..2 + end].trim().to_string()));
                rest = &rest[2 + end + 2..];
                continue;
            }
        } else if ch == '$' {
            if let Some(end) = find_inline_close(&rest[1..]) {
                flush_text(&mut segments, &mut text);
                segments.push(Segment::Inline(rest[1..1 + end].to_string()));
                rest = &rest[1 + end + 1..];
                continue;
            }
        }

        text.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush_text(&mut segments, &mut text);
    segments
}

fn find_inline_close(rest: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '$' if !escaped => return if idx == 0 { None } else { Some(idx) },
            '\n' => return None,
            _ => escaped = false,
        }
    }
    None
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

/// Renders a statement for Markdown output: inline math as code spans,
/// display math as fenced `math` blocks.
pub fn render_markdown(input: &str) -> String {
    let mut output = String::new();
    for segment in parse_markup(input) {
        match segment {
            Segment::Text(text) => output.push_str(&text),
            Segment::Inline(expr) => {
                let _ = write!(output, "`{}`", expr);
            }
            Segment::Display(expr) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                let _ = writeln!(output, "```math");
                let _ = writeln!(output, "{}", expr);
                let _ = writeln!(output, "```");
            }
        }
    }
    output
}
