//! Splits assistant text into plain runs and `[Label](Target)` navigation
//! links. Only the flat form is recognised: no nesting, no escapes.

use crate::site::Route;
use serde::ser::{ Serialize, SerializeStruct, Serializer };

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text {
        text: String,
    },
    Link {
        label: String,
        target: String,
    },
}

impl Segment {
    /// The exact slice of the input this segment was cut from.
    pub fn source_text(&self) -> String {
        match self {
            Segment::Text { text } => text.clone(),
            Segment::Link { label, target } => format!("[{}]({})", label, target),
        }
    }

    /// True for links that point at a page this site serves.
    pub fn is_internal(&self) -> bool {
        match self {
            Segment::Link { target, .. } => Route::parse(target).is_some(),
            Segment::Text { .. } => false,
        }
    }
}

/// `{"kind":"text","text":..}` or `{"kind":"link","label":..,"target":..,"internal":..}`.
impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Segment::Text { text } => {
                let mut state = serializer.serialize_struct("Segment", 2)?;
                state.serialize_field("kind", "text")?;
                state.serialize_field("text", text)?;
                state.end()
            }
            Segment::Link { label, target } => {
                let mut state = serializer.serialize_struct("Segment", 4)?;
                state.serialize_field("kind", "link")?;
                state.serialize_field("label", label)?;
                state.serialize_field("target", target)?;
                state.serialize_field("internal", &self.is_internal())?;
                state.end()
            }
        }
    }
}

/// Target of a `(target)` group at the start of `s`, with the group's byte
/// length. `None` when `s` does not open one or it is empty.
fn link_target(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix('(')?;
    let end = inner.find(')')?;
    let target = &inner[..end];
    if target.is_empty() {
        return None;
    }
    Some((target, end + 2))
}

/// Single forward pass. Every `[` before a given `]` shares that `]` as its
/// label end and the same text after it, so one failed check there rules all
/// of them out and the scan resumes past the `]`.
pub fn extract_segments(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find('[') {
        let start = cursor + offset;
        let Some(close) = input[start + 1..].find(']').map(|i| start + 1 + i) else {
            break;
        };
        let after = &input[close + 1..];

        if close > start + 1 {
            if let Some((target, len)) = link_target(after) {
                if start > plain_start {
                    segments.push(Segment::Text { text: input[plain_start..start].to_string() });
                }
                segments.push(Segment::Link {
                    label: input[start + 1..close].to_string(),
                    target: target.to_string(),
                });
                cursor = close + 1 + len;
                plain_start = cursor;
                continue;
            }
            // An open group with no ')' anywhere ahead cannot close later either.
            if after.starts_with('(') && !after.contains(')') {
                break;
            }
        }
        cursor = close + 1;
    }

    if plain_start < input.len() || segments.is_empty() {
        segments.push(Segment::Text { text: input[plain_start..].to_string() });
    }
    segments
}
