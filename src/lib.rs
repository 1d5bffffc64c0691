/*!
This library converts the brat annotations of the ScienceIE dataset into word-level BILOU tag
sequences, written as CoNLL files. The annotations are character spans over the raw text of a
document. The output has one line per whitespace-separated word, holding the word and its tags.
# SCHEME
Every word receives one of the prefixes of the BILOU scheme, followed by the entity type:
* B: The word begins a chunk of at least two words.
* I: The word is inside a chunk, neither its first nor its last word.
* L: The word is the last word of a chunk of at least two words.
* U: The word is a chunk on its own (a unit chunk).
* O: The word is outside any chunk. Outside words carry the entity suffix as well, as in
    `O-Material`.

## More information about the scheme
* [Wikipedia](https://en.wikipedia.org/wiki/Inside%E2%80%93outside%E2%80%93beginning_(tagging))
* [ScienceIE](https://scienceie.github.io/)

# Terminology
* A document is a pair of files sharing a stem: `<id>.txt` holds the raw text on its first line
    and `<id>.ann` holds the brat annotations.
* An annotation line looks like `T1\tMaterial 2 17\tcarbon nanotube`. Lines not starting with `T`
    are not entities and are ignored.
* An entity type is one of `Task`, `Process` or `Material`. A document is converted once per
    entity type, and the annotations of the other types are ignored.
* A chunk is a run of words covered by a single annotation. A chunk is tagged `U`, or `B`, `I`..,
    `L`.
* A warning is raised for a malformed annotation line or a document without annotations for the
    requested entity type. Warnings never stop a conversion and are sent to a `WarningSink`.
*/

mod bilou;
mod config;
mod conll;
mod datastructure;
mod dataset;
mod entity;
mod schemes;
mod warnings;

// The public api starts here
pub use bilou::{bilou_lines, bilou_lines_with_delimiter, BoundaryAction, ConversionError, SpanState};

pub use config::{default_entity_types, ConverterConfig, ConverterConfigBuilder};

pub use conll::{
    read_documents, write_documents, ConllDocument, ConllLine, MergeError, DEFAULT_TAG_COLUMNS,
};

pub use dataset::{convert_document, DatasetError, ScienceIeFolder};

pub use entity::{
    annotations_for_entity, parse_annotation_line, Annotation, AnnotationError, EntityType,
    EntityTypeParsingError, ParsedLine,
};

pub use schemes::{
    bilou_prefixes, bilou_tags, tag_words, BilouLine, BilouPrefix, BilouTag, ParsingError, DEFAULT_DELIMITER,
};

pub use warnings::{CollectedWarnings, SilentWarnings, TracingWarnings, Warning, WarningSink};

/// Reads a CoNLL file written by `ScienceIeFolder`, one document per blank-line separated block.
pub fn read_conll<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<ConllDocument>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_documents(std::io::BufReader::new(file)).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
