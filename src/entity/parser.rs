/**
Parsing of brat annotation files. Only the entity lines are of interest. They look like
`T<number>\t<TAG> <start> <end>\t<surface text>`.
*/
use crate::entity::Annotation;
use crate::warnings::{Warning, WarningSink};
use std::error::Error;
use std::fmt::Display;
use std::io::BufRead;
use std::num::ParseIntError;

#[derive(Debug)]
pub enum AnnotationError {
    /// The start or end of an entity line is not a character offset.
    InvalidOffset {
        line_number: usize,
        token: String,
        source: ParseIntError,
    },
    /// The annotations could not be read.
    Io(std::io::Error),
}

impl Display for AnnotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOffset {
                line_number,
                token,
                ..
            } => write!(
                f,
                "Line {}: could not parse the offset `{}` into a character offset",
                line_number, token
            ),
            Self::Io(e) => write!(f, "Could not read the annotations: {}", e),
        }
    }
}

impl Error for AnnotationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOffset { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for AnnotationError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a single line of an annotation file turned out to be.
pub enum ParsedLine {
    Annotation(Annotation),
    /// Relations, events, notes and anything that is not a three-field `T` line.
    NotAnEntity,
    /// An entity line whose `TAG START END` field does not have exactly three parts. It is skipped
    /// with a warning.
    Malformed,
}

fn parse_offset(token: &str, line_number: usize) -> Result<usize, AnnotationError> {
    token
        .parse::<usize>()
        .map_err(|source| AnnotationError::InvalidOffset {
            line_number,
            token: String::from(token),
            source,
        })
}

/// Parses one line of an annotation file.
///
/// * `line`: The raw line. A trailing newline is not part of the surface text.
/// * `line_number`: Position of the line in its file, used in errors.
pub fn parse_annotation_line(line: &str, line_number: usize) -> Result<ParsedLine, AnnotationError> {
    if !line.trim().starts_with('T') {
        return Ok(ParsedLine::NotAnEntity);
    }
    let fields: Vec<&str> = line.split('\t').collect();
    let [entity_number, tag_start_end, words] = fields.as_slice() else {
        return Ok(ParsedLine::NotAnEntity);
    };
    let parts: Vec<&str> = tag_start_end.split_whitespace().collect();
    let [tag, start, end] = parts.as_slice() else {
        return Ok(ParsedLine::Malformed);
    };
    Ok(ParsedLine::Annotation(Annotation {
        start: parse_offset(start, line_number)?,
        end: parse_offset(end, line_number)?,
        tag: String::from(*tag),
        entity_number: String::from(*entity_number),
        words: String::from(words.trim_end_matches(['\r', '\n'])),
    }))
}

/// Reads the annotations of a document and keeps those of the requested entity type. Malformed
/// entity lines are skipped and a document without any annotation of that type yields an empty
/// vector; both are reported to the `sink`.
///
/// * `reader`: Content of the `.ann` file
/// * `file_id`: Identifier of the document, used in warnings
/// * `entity`: Entity type to keep (e.g. `Material`). The comparison ignores the case.
/// * `sink`: Receiver of the warnings
pub fn annotations_for_entity<R, S>(
    reader: R,
    file_id: &str,
    entity: &str,
    sink: &S,
) -> Result<Vec<Annotation>, AnnotationError>
where
    R: BufRead,
    S: WarningSink + ?Sized,
{
    let mut annotations = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        match parse_annotation_line(&line, line_number)? {
            ParsedLine::Annotation(annotation) if annotation.is_entity(entity) => {
                annotations.push(annotation)
            }
            ParsedLine::Annotation(_) | ParsedLine::NotAnEntity => {}
            ParsedLine::Malformed => sink.warn(&Warning::MalformedLine {
                file_id: String::from(file_id),
                entity: String::from(entity),
                line_number,
                line,
            }),
        }
    }
    if annotations.is_empty() {
        sink.warn(&Warning::NoAnnotations {
            file_id: String::from(file_id),
            entity: String::from(entity),
        });
    }
    Ok(annotations)
}
