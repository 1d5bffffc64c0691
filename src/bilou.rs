/**
This module converts the character-offset annotations of a document into one BILOU tag per
word.

The text is scanned character by character, with one extra space appended so the last word is
closed like the others. Word boundaries are spaces, and nothing else. While scanning, a
`SpanState` records whether an annotation started and/or ended in the text accumulated since the
last flush. At every space, the state decides between:
* flushing the accumulated words as outside words (no annotation started),
* flushing them as a single chunk (an annotation started and ended),
* continuing to accumulate (an annotation started but has not ended yet). This is how a
    multi-word annotation ends up as a single `B`, `I`.., `L` chunk.
*/
use crate::datastructure::OffsetTagMapping;
use crate::entity::Annotation;
use crate::schemes::{tag_words, BilouLine, DEFAULT_DELIMITER};
use std::error::Error;
use std::fmt::Display;
use std::iter::once;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// State of the text accumulated since the last flush.
pub enum SpanState {
    /// No annotation started. `end_seen` remembers an annotation end met in the accumulated text:
    /// a start met afterwards closes the span right away.
    Outside { end_seen: bool },
    /// An annotation started and none ended yet.
    Open,
    /// An annotation started and an annotation ended.
    Closing,
}

impl Default for SpanState {
    fn default() -> Self {
        SpanState::Outside { end_seen: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What to do with the accumulated text when reaching a space.
pub enum BoundaryAction {
    /// Flush the words, all of them outside any chunk.
    EmitOutside,
    /// Flush the words as a single chunk.
    EmitChunk,
    /// Keep accumulating past this space.
    Defer,
}

impl SpanState {
    /// An annotation starts at the current offset.
    pub fn on_start(self) -> Self {
        match self {
            SpanState::Outside { end_seen: false } => SpanState::Open,
            SpanState::Outside { end_seen: true } => SpanState::Closing,
            SpanState::Open => SpanState::Open,
            SpanState::Closing => SpanState::Closing,
        }
    }

    /// An annotation ends at the current offset.
    pub fn on_end(self) -> Self {
        match self {
            SpanState::Outside { .. } => SpanState::Outside { end_seen: true },
            SpanState::Open | SpanState::Closing => SpanState::Closing,
        }
    }

    pub fn at_boundary(self) -> BoundaryAction {
        match self {
            SpanState::Outside { .. } => BoundaryAction::EmitOutside,
            SpanState::Closing => BoundaryAction::EmitChunk,
            SpanState::Open => BoundaryAction::Defer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The number of tagged words differs from the number of words of the text. This happens when an
/// annotation is never closed (e.g. its end lies past the end of the text) or does not line up
/// with the words of the text. The output would be misaligned and is discarded.
pub struct ConversionError {
    pub text_words: usize,
    pub bilou_lines: usize,
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Number of text words {}. Number of BILOU tagged words {}",
            self.text_words, self.bilou_lines
        )
    }
}

impl Error for ConversionError {}

/// Converts the annotations of one entity type into one BILOU line per word of `text`, using `-`
/// between prefix and entity.
///
/// # Example
/// ```rust
/// use scienceie_bilou::{bilou_lines, Annotation};
///
/// let text = "A carbon nanotube device";
/// let annotations = vec![Annotation::new(2, 17, "Material")];
/// let lines = bilou_lines(text, &annotations, "Material").unwrap();
/// let tags: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
/// assert_eq!(
///     tags,
///     vec!["A O-Material", "carbon B-Material", "nanotube L-Material", "device O-Material"]
/// );
/// ```
pub fn bilou_lines<'a>(
    text: &'a str,
    annotations: &[Annotation],
    entity: &'a str,
) -> Result<Vec<BilouLine<'a>>, ConversionError> {
    bilou_lines_with_delimiter(text, annotations, entity, DEFAULT_DELIMITER)
}

/// Same as `bilou_lines`, with a custom separator between prefix and entity.
///
/// * `text`: Raw text of the document
/// * `annotations`: Annotations of a single entity type. Their tag is not used for the output.
/// * `entity`: Entity appended to every prefix, including `O`
/// * `delimiter`: Separator between prefix and entity
pub fn bilou_lines_with_delimiter<'a>(
    text: &'a str,
    annotations: &[Annotation],
    entity: &'a str,
    delimiter: char,
) -> Result<Vec<BilouLine<'a>>, ConversionError> {
    let mapping = OffsetTagMapping::new(annotations);
    let mut lines: Vec<BilouLine<'a>> = Vec::new();
    let mut state = SpanState::default();
    // Byte offset of the first character not flushed yet.
    let mut word_start = 0;

    let padded = text.char_indices().chain(once((text.len(), ' ')));
    for (offset, (byte_index, c)) in padded.enumerate() {
        if mapping.starts_at(offset).is_some() {
            state = state.on_start();
        }
        if mapping.ends_at(offset).is_some() {
            state = state.on_end();
        }
        if c != ' ' {
            continue;
        }
        let mark_as_outside = match state.at_boundary() {
            BoundaryAction::Defer => continue,
            BoundaryAction::EmitOutside => true,
            BoundaryAction::EmitChunk => false,
        };
        let words: Vec<&'a str> = text[word_start..byte_index].split_whitespace().collect();
        lines.extend(tag_words(words, entity, delimiter, mark_as_outside));
        state = SpanState::default();
        word_start = byte_index + 1;
    }

    let text_words = text.split_whitespace().count();
    if text_words != lines.len() {
        return Err(ConversionError {
            text_words,
            bilou_lines: lines.len(),
        });
    }
    Ok(lines)
}
