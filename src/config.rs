/*
 * This modules contains the `ConverterConfig` struct, which implements the default trait, and its
 * builder. The config is given to a `ScienceIeFolder` or to the `convert_document` function to
 * simplify their arguments.
*/
use crate::conll::DEFAULT_TAG_COLUMNS;
use crate::entity::EntityType;
use crate::schemes::DEFAULT_DELIMITER;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
/// Config struct used to simplify the inputs of parameters of the conversion. It implements the
/// default trait.
pub struct ConverterConfig {
    /// Should the warnings about malformed annotation lines and documents without annotations be
    /// dropped?
    ignore_warnings: bool,
    /// The entity types converted when writing the files of a folder, one file per entity type.
    entity_types: Vec<String>,
    /// How many times the tag of a word is repeated on its line when writing the file of a single
    /// entity type.
    tag_columns: usize,
    /// Can we use multiple cores to convert the documents of a folder? The documents are always
    /// written in the same order.
    parallel: bool,
    /// The character separating the prefix from the entity, as in `B-Task`.
    delimiter: char,
}

/// Entity types converted by default, in the order their files are written.
pub fn default_entity_types() -> Vec<String> {
    [EntityType::Process, EntityType::Material, EntityType::Task]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ignore_warnings: false,
            entity_types: default_entity_types(),
            tag_columns: DEFAULT_TAG_COLUMNS,
            parallel: false,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn ignore_warnings(&self) -> bool {
        self.ignore_warnings
    }
    pub fn entity_types(&self) -> &[String] {
        &self.entity_types
    }
    pub fn tag_columns(&self) -> usize {
        self.tag_columns
    }
    pub fn parallel(&self) -> bool {
        self.parallel
    }
    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Display for ConverterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!("Ignoring warnings: {}\n Entity types: {}\n Tag columns: {}\n Using parallel conversion: {}\n Delimiter: {:?}", self.ignore_warnings, self.entity_types.iter().join(", "), self.tag_columns, self.parallel, self.delimiter);
        write!(f, "{}", string)
    }
}

impl From<ConverterConfigBuilder> for ConverterConfig {
    fn from(value: ConverterConfigBuilder) -> Self {
        Self {
            ignore_warnings: value.ignore_warnings,
            entity_types: value.entity_types.unwrap_or_else(default_entity_types),
            tag_columns: value.tag_columns,
            parallel: value.parallel,
            delimiter: value.delimiter,
        }
    }
}

/// This builder can be used to build and customize a `ConverterConfig` stucture.
#[derive(Clone, Debug)]
pub struct ConverterConfigBuilder {
    ignore_warnings: bool,
    entity_types: Option<Vec<String>>,
    tag_columns: usize,
    parallel: bool,
    delimiter: char,
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterConfigBuilder {
    pub fn ignore_warnings(mut self, ignore_warnings: bool) -> Self {
        self.ignore_warnings = ignore_warnings;
        self
    }
    /// Replaces the entity types. Duplicates (ignoring the case) are removed, the first occurrence
    /// is kept.
    pub fn entity_types<I, S>(mut self, entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entity_types = entity_types
            .into_iter()
            .map(Into::into)
            .unique_by(|e: &String| e.to_lowercase())
            .collect();
        self.entity_types = Some(entity_types);
        self
    }
    pub fn tag_columns(mut self, tag_columns: usize) -> Self {
        self.tag_columns = tag_columns;
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
    pub fn new() -> Self {
        Self {
            ignore_warnings: false,
            entity_types: None,
            tag_columns: DEFAULT_TAG_COLUMNS,
            parallel: false,
            delimiter: DEFAULT_DELIMITER,
        }
    }
    pub fn build(self) -> ConverterConfig {
        ConverterConfig::from(self)
    }
}
