/**
This modules renders the BILOU lines of documents as CoNLL files: one word per line followed by
its tag columns, and a blank line after every document. It can also read such files back.
*/
use crate::schemes::BilouLine;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Number of tag columns written after every word.
pub const DEFAULT_TAG_COLUMNS: usize = 3;

/// A word and its tag columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConllLine {
    pub word: String,
    pub tags: Vec<String>,
}

/// The ConllLine acts as a line of the file when displayed.
impl Display for ConllLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.word)?;
        for tag in self.tags.iter() {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The tag columns of a merged document do not describe the same words.
pub enum MergeError {
    /// The columns do not have the same number of lines.
    InconsistentLength { expected: usize, actual: usize },
    /// The columns disagree on the word at `index`.
    WordMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
}

impl Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InconsistentLength { expected, actual } => write!(
                f,
                "Inconsistent length between two tag columns. Expected {} lines, got {}",
                expected, actual
            ),
            Self::WordMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "The tag columns disagree on word {}: `{}` and `{}`",
                index, expected, actual
            ),
        }
    }
}

impl Error for MergeError {}

/// The lines of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConllDocument {
    pub lines: Vec<ConllLine>,
}

impl ConllDocument {
    /// Builds a document whose lines repeat the tag of every BILOU line `columns` times.
    pub fn from_bilou_lines(lines: &[BilouLine], columns: usize) -> Self {
        let lines = lines
            .iter()
            .map(|l| ConllLine {
                word: l.word.to_string(),
                tags: vec![l.tag.to_string(); columns],
            })
            .collect();
        ConllDocument { lines }
    }

    /// Builds a document with one tag column per element of `columns`, in the same order. Every
    /// column must tag the same words.
    pub fn merge(columns: &[Vec<BilouLine>]) -> Result<Self, MergeError> {
        let Some((first, rest)) = columns.split_first() else {
            return Ok(Self::default());
        };
        for column in rest {
            if column.len() != first.len() {
                return Err(MergeError::InconsistentLength {
                    expected: first.len(),
                    actual: column.len(),
                });
            }
            for (index, (expected, actual)) in first.iter().zip(column.iter()).enumerate() {
                if expected.word != actual.word {
                    return Err(MergeError::WordMismatch {
                        index,
                        expected: expected.word.to_string(),
                        actual: actual.word.to_string(),
                    });
                }
            }
        }
        let lines = first
            .iter()
            .enumerate()
            .map(|(i, line)| ConllLine {
                word: line.word.to_string(),
                tags: columns.iter().map(|c| c[i].tag.to_string()).collect(),
            })
            .collect();
        Ok(ConllDocument { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.word.as_str())
    }
}

/// The document is displayed as it is written in a file, blank separator line included.
impl Display for ConllDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines.iter() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Writes the documents one after the other, in order.
pub fn write_documents<'d, W, I>(mut writer: W, documents: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'d ConllDocument>,
{
    for document in documents {
        write!(writer, "{}", document)?;
    }
    writer.flush()
}

/// Reads a CoNLL file. Lines are split on whitespace: the first field is the word, the others
/// are its tags. Blank lines separate the documents.
pub fn read_documents<R: BufRead>(reader: R) -> io::Result<Vec<ConllDocument>> {
    let mut documents = vec![];
    let mut current = ConllDocument::default();
    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        match fields.next() {
            None if current.is_empty() => {}
            None => documents.push(std::mem::take(&mut current)),
            Some(word) => current.lines.push(ConllLine {
                word: String::from(word),
                tags: fields.map(String::from).collect_vec(),
            }),
        }
    }
    if !current.is_empty() {
        documents.push(current);
    }
    Ok(documents)
}
