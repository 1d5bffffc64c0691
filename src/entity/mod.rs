use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

mod parser;

// Re-exporting
pub use parser::{annotations_for_entity, parse_annotation_line, AnnotationError, ParsedLine};

/// An annotation is a brat entity span over the raw text of a document. The offsets are character
/// offsets: `start` is inclusive and `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    /// The entity type of the span, such as `Task`.
    pub tag: String,
    /// The brat identifier, such as `T3`.
    #[serde(default)]
    pub entity_number: String,
    /// The surface text of the span, as written in the annotation file.
    #[serde(default)]
    pub words: String,
}

impl Annotation {
    pub fn new<T: Into<String>>(start: usize, end: usize, tag: T) -> Self {
        Annotation {
            start,
            end,
            tag: tag.into(),
            entity_number: String::new(),
            words: String::new(),
        }
    }

    /// Is this annotation of the given entity type? The comparison ignores the case.
    pub fn is_entity(&self, entity: &str) -> bool {
        self.tag.to_lowercase() == entity.to_lowercase()
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{} {} {}\t{}",
            self.entity_number, self.tag, self.start, self.end, self.words
        )
    }
}

#[derive(Debug, Clone, Copy, Sequence, Hash, Eq, PartialEq, Serialize, Deserialize)]
/// The entity types annotated in ScienceIE. The order of the variants is the order of the tag
/// columns in a merged CoNLL file.
pub enum EntityType {
    Task,
    Process,
    Material,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Process => "Process",
            Self::Material => "Material",
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub struct EntityTypeParsingError(String);

impl Display for EntityTypeParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Impossible to parse the string ({}) into an EntityType",
            self.0
        )
    }
}

impl std::error::Error for EntityTypeParsingError {}

impl FromStr for EntityType {
    type Err = EntityTypeParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "process" => Ok(Self::Process),
            "material" => Ok(Self::Material),
            _ => Err(EntityTypeParsingError(String::from(s))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use enum_iterator::all;
    use rstest::rstest;

    #[rstest]
    #[case("Task", "task", true)]
    #[case("MATERIAL", "Material", true)]
    #[case("Process", "Task", false)]
    fn test_is_entity(#[case] tag: &str, #[case] entity: &str, #[case] expected: bool) {
        let annotation = Annotation::new(0, 4, tag);
        assert_eq!(annotation.is_entity(entity), expected);
    }

    #[test]
    fn test_entity_type_column_order() {
        let actual: Vec<_> = all::<EntityType>().map(|e| e.to_string()).collect();
        assert_eq!(actual, vec!["Task", "Process", "Material"]);
    }

    #[test]
    fn test_entity_type_from_str() {
        assert_eq!(EntityType::from_str("pRoCeSs"), Ok(EntityType::Process));
        assert!(EntityType::from_str("Method").is_err());
    }

    #[test]
    fn test_annotation_display_is_a_brat_line() {
        let annotation = Annotation {
            start: 2,
            end: 18,
            tag: String::from("Material"),
            entity_number: String::from("T1"),
            words: String::from("carbon nanotube"),
        };
        assert_eq!(annotation.to_string(), "T1\tMaterial 2 18\tcarbon nanotube");
    }
}
