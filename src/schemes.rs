/**
This modules holds the prefixes and tags of the BILOU scheme, and the helper assigning them to a
run of words.
*/
use either::Either;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Debug, Display};
use std::iter::repeat;
use std::str::FromStr;

/// Character separating the prefix from the entity in a tag, as in `B-Task`.
pub const DEFAULT_DELIMITER: char = '-';

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Sequence, Serialize, Deserialize)]
/// Prefix representing the place of a word in a chunk. All prefixes are a single ascii
/// character.
pub enum BilouPrefix {
    /// First word of a multi-word chunk
    B,
    /// Word strictly inside a multi-word chunk
    I,
    /// Last word of a multi-word chunk
    L,
    /// Word outside of any chunk
    O,
    /// Chunk made of a single word
    U,
}

impl BilouPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            BilouPrefix::B => "B",
            BilouPrefix::I => "I",
            BilouPrefix::L => "L",
            BilouPrefix::O => "O",
            BilouPrefix::U => "U",
        }
    }

    /// Is the word part of a chunk?
    pub fn is_chunk(&self) -> bool {
        !matches!(self, BilouPrefix::O)
    }
}

impl Display for BilouPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BilouPrefix {
    type Err = ParsingError<String>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Self::B),
            "I" => Ok(Self::I),
            "L" => Ok(Self::L),
            "O" => Ok(Self::O),
            "U" => Ok(Self::U),
            "" => Err(ParsingError::EmptyToken),
            _ => Err(ParsingError::PrefixError(String::from(s))),
        }
    }
}

impl TryFrom<char> for BilouPrefix {
    type Error = ParsingError<String>;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'B' => Ok(Self::B),
            'I' => Ok(Self::I),
            'L' => Ok(Self::L),
            'O' => Ok(Self::O),
            'U' => Ok(Self::U),
            _ => Err(ParsingError::PrefixError(String::from(value))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Could not parse the string into a `BilouPrefix` or a `BilouTag`
pub enum ParsingError<S: AsRef<str>> {
    PrefixError(S),
    EmptyToken,
}

impl<S: AsRef<str>> Display for ParsingError<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrefixError(s) => {
                let content = s.as_ref();
                write!(
                    f,
                    "Could not parse the following string into a BILOU prefix: {}",
                    content
                )
            }
            Self::EmptyToken => {
                write!(f, "Received an empty string/&str")
            }
        }
    }
}

impl<S: AsRef<str> + Debug> Error for ParsingError<S> {}

/// A tag is a prefix and the entity it applies to, such as `B-Task` or `O-Material`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BilouTag<'a> {
    pub prefix: BilouPrefix,
    pub entity: Cow<'a, str>,
    pub delimiter: char,
}

impl<'a> BilouTag<'a> {
    pub fn new<E: Into<Cow<'a, str>>>(prefix: BilouPrefix, entity: E, delimiter: char) -> Self {
        BilouTag {
            prefix,
            entity: entity.into(),
            delimiter,
        }
    }

    /// Parses a tag written as `<prefix><delimiter><entity>`. A bare `O` is accepted and yields an
    /// empty entity.
    ///
    /// * `token`: The full tag, such as `"L-Process"`
    /// * `delimiter`: The char separating the prefix from the entity
    pub fn try_from_str(token: &'a str, delimiter: char) -> Result<Self, ParsingError<String>> {
        if token.is_empty() {
            return Err(ParsingError::EmptyToken);
        }
        let (prefix, entity) = match token.split_once(delimiter) {
            Some((prefix, entity)) => (prefix, entity),
            None => (token, ""),
        };
        let prefix = BilouPrefix::from_str(prefix)?;
        Ok(BilouTag::new(prefix, entity, delimiter))
    }

    pub fn into_owned(self) -> BilouTag<'static> {
        BilouTag {
            prefix: self.prefix,
            entity: Cow::Owned(self.entity.into_owned()),
            delimiter: self.delimiter,
        }
    }
}

impl<'a> Display for BilouTag<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.delimiter, self.entity)
    }
}

/// One word of a document with the tag it received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BilouLine<'a> {
    pub word: Cow<'a, str>,
    pub tag: BilouTag<'a>,
}

impl<'a> BilouLine<'a> {
    pub fn new<W: Into<Cow<'a, str>>>(word: W, tag: BilouTag<'a>) -> Self {
        BilouLine {
            word: word.into(),
            tag,
        }
    }

    pub fn as_tuple(&self) -> (&str, String) {
        (self.word.as_ref(), self.tag.to_string())
    }

    pub fn into_owned(self) -> BilouLine<'static> {
        BilouLine {
            word: Cow::Owned(self.word.into_owned()),
            tag: self.tag.into_owned(),
        }
    }
}

impl<'a> Display for BilouLine<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.word, self.tag)
    }
}

/// Returns the prefixes of a run of `len` words. Every word is outside when `mark_as_outside` is
/// true. Otherwise the run is a single chunk: `U` for one word, `B`, `I`.., `L` for more.
pub fn bilou_prefixes(len: usize, mark_as_outside: bool) -> impl Iterator<Item = BilouPrefix> {
    if mark_as_outside {
        Either::Left(repeat(BilouPrefix::O).take(len))
    } else {
        Either::Right((0..len).map(move |i| match (i, len) {
            (_, 1) => BilouPrefix::U,
            (0, _) => BilouPrefix::B,
            (i, len) if i + 1 == len => BilouPrefix::L,
            _ => BilouPrefix::I,
        }))
    }
}

/// Returns only the tags of a run of `len` words, as `tag_words` would assign them.
pub fn bilou_tags(
    len: usize,
    entity: &str,
    delimiter: char,
    mark_as_outside: bool,
) -> impl Iterator<Item = BilouTag<'_>> {
    bilou_prefixes(len, mark_as_outside).map(move |prefix| BilouTag::new(prefix, entity, delimiter))
}

/// Tags a run of words flushed by the converter.
///
/// * `words`: The words, in order
/// * `entity`: Entity appended to every prefix (e.g. `Task`)
/// * `delimiter`: Separator between prefix and entity
/// * `mark_as_outside`: Tag every word with `O` instead of building a chunk
pub fn tag_words<'a, I>(
    words: I,
    entity: &'a str,
    delimiter: char,
    mark_as_outside: bool,
) -> impl Iterator<Item = BilouLine<'a>>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let words = words.into_iter();
    let prefixes = bilou_prefixes(words.len(), mark_as_outside);
    words
        .zip(prefixes)
        .map(move |(word, prefix)| BilouLine::new(word, BilouTag::new(prefix, entity, delimiter)))
}
