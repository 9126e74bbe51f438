//! Lenient markup reader for `set_html`.
//!
//! Understands elements, quoted and bare attributes, void and self-closing
//! tags, comments and the common character entities. Stray closing tags are
//! dropped and unclosed elements are closed at the end of input.

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Markup {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Markup>,
    },
    Text(String),
}

struct Open {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Markup>,
}

impl Open {
    fn into_markup(self) -> Markup {
        Markup::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

pub(super) fn parse(input: &str) -> Vec<Markup> {
    let mut root = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");
            close(&mut stack, &mut root, &name);
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = tag_end(rest);
            let inner = &rest[1..end];
            rest = rest.get(end + 1..).unwrap_or("");

            let (inner, self_closing) = inner
                .strip_suffix('/')
                .map_or((inner, false), |inner| (inner, true));
            let (tag, attributes) = parse_tag(inner);

            if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                let element = Markup::Element {
                    tag,
                    attributes,
                    children: Vec::new(),
                };
                push(&mut stack, &mut root, element);
            } else {
                stack.push(Open {
                    tag,
                    attributes,
                    children: Vec::new(),
                });
            }
        } else {
            // A lone '<' that opens no tag is text, so always consume the first char.
            let first = rest.chars().next().map_or(0, char::len_utf8);
            let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
            let text = decode_entities(&rest[..end]);
            rest = &rest[end..];
            if !text.trim().is_empty() {
                push(&mut stack, &mut root, Markup::Text(text));
            }
        }
    }

    while let Some(open) = stack.pop() {
        let element = open.into_markup();
        push(&mut stack, &mut root, element);
    }

    root
}

fn push(stack: &mut [Open], root: &mut Vec<Markup>, markup: Markup) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(markup),
        None => root.push(markup),
    }
}

fn close(stack: &mut Vec<Open>, root: &mut Vec<Markup>, name: &str) {
    if !stack.iter().any(|open| open.tag == name) {
        return;
    }
    while let Some(open) = stack.pop() {
        let matched = open.tag == name;
        let element = open.into_markup();
        push(stack, root, element);
        if matched {
            break;
        }
    }
}

/// Byte index of the `>` closing the tag that starts `input`, skipping quoted values.
fn tag_end(input: &str) -> usize {
    let mut quote = None;
    for (index, c) in input.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if q == c => quote = None,
            (None, '>') => return index,
            _ => {}
        }
    }
    input.len()
}

fn parse_tag(inner: &str) -> (String, Vec<(String, String)>) {
    let inner = inner.trim();
    let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let tag = inner[..name_end].to_ascii_lowercase();

    let chars: Vec<char> = inner[name_end..].chars().collect();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' {
            i += 1;
        }
        if start == i {
            i += 1;
            continue;
        }
        let name: String = chars[start..i].iter().collect::<String>().to_ascii_lowercase();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() || chars[i] != '=' {
            attributes.push((name, String::new()));
            continue;
        }
        i += 1;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let value: String = match chars.get(i) {
            Some(&(quote @ ('"' | '\''))) => {
                let value_start = i + 1;
                let mut end = value_start;
                while end < chars.len() && chars[end] != quote {
                    end += 1;
                }
                i = end + 1;
                chars[value_start..end.min(chars.len())].iter().collect()
            }
            _ => {
                let value_start = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                chars[value_start..i].iter().collect()
            }
        };
        attributes.push((name, decode_entities(&value)));
    }

    (tag, attributes)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
