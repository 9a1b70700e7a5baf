//! Structural visibility rewrite
//!
//! The document is streamed through quick-xml. Only the start tags of
//! root-level `<g>` elements with a decision are rebuilt; every other event
//! is written back from its original bytes. Attribute values are copied
//! raw, so entity references survive untouched.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::ParseError;
use crate::CompositorError;

const DISPLAY: &str = "display";

/// Rewrite `display` on root-level `<g>` elements.
///
/// `decisions[k]` applies to the k-th root-level group: `Some(true)` sets
/// `display="inline"`, `Some(false)` sets `display="none"`, `None` leaves the
/// tag alone. `text` must already be known to be well-formed.
pub(crate) fn apply_visibility(
    text: &str,
    decisions: &[Option<bool>],
) -> Result<Vec<u8>, CompositorError> {
    let mut reader = Reader::from_str(text);
    let mut writer = Writer::new(Vec::with_capacity(text.len() + 64));
    let mut depth = 0usize;
    let mut position = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(stream_error(err.to_string(), &reader, text).into()),
        };

        let rewritten = match &event {
            Event::Eof => break,
            Event::Start(tag) | Event::Empty(tag)
                if depth == 1 && tag.local_name().as_ref() == b"g" =>
            {
                let decision = decisions.get(position).copied().flatten();
                position += 1;
                match decision {
                    Some(visible) => Some(
                        set_display(tag, visible)
                            .map_err(|message| stream_error(message, &reader, text))?,
                    ),
                    None => None,
                }
            }
            _ => None,
        };

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }

        let out = match (rewritten, event) {
            (Some(tag), Event::Start(_)) => Event::Start(tag),
            (Some(tag), Event::Empty(_)) => Event::Empty(tag),
            (_, event) => event,
        };
        writer
            .write_event(out)
            .map_err(|err| CompositorError::Serialize(err.to_string()))?;
    }

    Ok(writer.into_inner())
}

/// Rebuild `tag` with `display` set. An existing `display` keeps its place;
/// otherwise it is appended.
fn set_display(tag: &BytesStart<'_>, visible: bool) -> Result<BytesStart<'static>, String> {
    let display = if visible { "inline" } else { "none" };

    let mut out = tag.to_owned();
    out.clear_attributes();

    let mut replaced = false;
    for attr in tag.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == DISPLAY.as_bytes() {
            if !replaced {
                out.push_attribute((DISPLAY, display));
                replaced = true;
            }
        } else {
            out.push_attribute(double_quoted(attr));
        }
    }
    if !replaced {
        out.push_attribute((DISPLAY, display));
    }

    Ok(out)
}

/// The raw value is re-emitted between double quotes, so a `"` taken from a
/// single-quoted value has to become a character reference.
fn double_quoted(attr: Attribute<'_>) -> Attribute<'_> {
    if !attr.value.contains(&b'"') {
        return attr;
    }

    let mut value = Vec::with_capacity(attr.value.len() + 8);
    for &byte in attr.value.iter() {
        if byte == b'"' {
            value.extend_from_slice(b"&quot;");
        } else {
            value.push(byte);
        }
    }
    Attribute {
        key: attr.key,
        value: Cow::Owned(value),
    }
}

fn stream_error(message: String, reader: &Reader<&[u8]>, text: &str) -> ParseError {
    let start = usize::try_from(reader.buffer_position())
        .unwrap_or(text.len())
        .min(text.len());
    ParseError::Xml {
        span: start..start,
        message,
    }
}
