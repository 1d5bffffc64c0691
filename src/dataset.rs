/**
This module reads a ScienceIE folder, where every document `<id>` comes as `<id>.txt` (the raw
text, on its first line) and `<id>.ann` (the brat annotations), and writes the BILOU lines of
its documents as CoNLL files.
*/
use crate::bilou::{bilou_lines_with_delimiter, ConversionError};
use crate::config::ConverterConfig;
use crate::conll::{write_documents, ConllDocument, MergeError};
use crate::entity::{annotations_for_entity, Annotation, AnnotationError, EntityType};
use crate::schemes::BilouLine;
use crate::warnings::{SilentWarnings, TracingWarnings, WarningSink};
use enum_iterator::all;
use itertools::Itertools;
use rayon::prelude::*;
use std::error::Error;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TEXT_EXTENSION: &str = "txt";
const ANNOTATION_EXTENSION: &str = "ann";

#[derive(Debug)]
/// Enum of errors wrapping the errors of the different steps of a conversion.
pub enum DatasetError {
    /// A file or a folder could not be read or written
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The annotation file of a document is invalid
    Annotation {
        file_id: String,
        source: AnnotationError,
    },
    /// The BILOU lines of a document do not line up with its words
    Conversion {
        file_id: String,
        entity: String,
        source: ConversionError,
    },
    /// The entity types of a document could not be merged into a single file
    Merge { file_id: String, source: MergeError },
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Annotation { file_id, source } => {
                write!(f, "Invalid annotations in file {}: {}", file_id, source)
            }
            Self::Conversion {
                file_id,
                entity,
                source,
            } => write!(
                f,
                "Could not convert file {} for entity {}: {}",
                file_id, entity, source
            ),
            Self::Merge { file_id, source } => {
                write!(f, "Could not merge the entities of file {}: {}", file_id, source)
            }
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Annotation { source, .. } => Some(source),
            Self::Conversion { source, .. } => Some(source),
            Self::Merge { source, .. } => Some(source),
        }
    }
}

fn io_error<P: AsRef<Path>>(path: P) -> impl FnOnce(std::io::Error) -> DatasetError {
    let path = path.as_ref().to_path_buf();
    move |source| DatasetError::Io { path, source }
}

/// Parses the annotation file content of a document and converts it, in one go.
///
/// * `file_id`: Identifier of the document, used in warnings and errors
/// * `text`: Raw text of the document
/// * `annotation_source`: Content of the `.ann` file
/// * `entity`: The entity type to convert
/// * `config`: Delimiter and warnings configuration
/// * `sink`: Receiver of the warnings, unless the config ignores them
pub fn convert_document<'a, S: WarningSink + ?Sized>(
    file_id: &str,
    text: &'a str,
    annotation_source: &str,
    entity: &'a str,
    config: &ConverterConfig,
    sink: &S,
) -> Result<Vec<BilouLine<'a>>, DatasetError> {
    let annotations = if config.ignore_warnings() {
        annotations_for_entity(annotation_source.as_bytes(), file_id, entity, &SilentWarnings)
    } else {
        annotations_for_entity(annotation_source.as_bytes(), file_id, entity, sink)
    }
    .map_err(|source| DatasetError::Annotation {
        file_id: String::from(file_id),
        source,
    })?;
    to_bilou_lines(file_id, text, &annotations, entity, config)
}

fn to_bilou_lines<'a>(
    file_id: &str,
    text: &'a str,
    annotations: &[Annotation],
    entity: &'a str,
    config: &ConverterConfig,
) -> Result<Vec<BilouLine<'a>>, DatasetError> {
    bilou_lines_with_delimiter(text, annotations, entity, config.delimiter()).map_err(|source| {
        DatasetError::Conversion {
            file_id: String::from(file_id),
            entity: String::from(entity),
            source,
        }
    })
}

/// Utility over the documents of a ScienceIE folder.
pub struct ScienceIeFolder {
    folderpath: PathBuf,
    config: ConverterConfig,
    sink: Arc<dyn WarningSink>,
    file_ids: Vec<String>,
}

impl std::fmt::Debug for ScienceIeFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScienceIeFolder")
            .field("folderpath", &self.folderpath)
            .field("config", &self.config)
            .field("file_ids", &self.file_ids)
            .finish()
    }
}

impl ScienceIeFolder {
    /// Lists the documents of the folder. Warnings are emitted as `tracing` events, unless the
    /// config ignores them.
    pub fn new<P: Into<PathBuf>>(
        folderpath: P,
        config: ConverterConfig,
    ) -> Result<Self, DatasetError> {
        Self::with_sink(folderpath, config, Arc::new(TracingWarnings))
    }

    /// Same as `new`, with the warnings sent to `sink`.
    pub fn with_sink<P: Into<PathBuf>>(
        folderpath: P,
        config: ConverterConfig,
        sink: Arc<dyn WarningSink>,
    ) -> Result<Self, DatasetError> {
        let folderpath = folderpath.into();
        let file_ids = Self::list_file_ids(&folderpath)?;
        let sink: Arc<dyn WarningSink> = if config.ignore_warnings() {
            Arc::new(SilentWarnings)
        } else {
            sink
        };
        Ok(Self {
            folderpath,
            config,
            sink,
            file_ids,
        })
    }

    /// The ids are the stems of the `.txt` and `.ann` files, sorted.
    fn list_file_ids(folderpath: &Path) -> Result<Vec<String>, DatasetError> {
        let mut file_ids = vec![];
        for entry in fs::read_dir(folderpath).map_err(io_error(folderpath))? {
            let path = entry.map_err(io_error(folderpath))?.path();
            let is_document = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some(TEXT_EXTENSION) | Some(ANNOTATION_EXTENSION)
            );
            if !is_document || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                file_ids.push(String::from(stem));
            }
        }
        Ok(file_ids.into_iter().sorted().dedup().collect())
    }

    pub fn file_ids(&self) -> &[String] {
        &self.file_ids
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn document_path(&self, file_id: &str, extension: &str) -> PathBuf {
        self.folderpath.join(format!("{}.{}", file_id, extension))
    }

    /// The first line of `<file_id>.txt`, without its surrounding whitespace.
    pub fn text(&self, file_id: &str) -> Result<String, DatasetError> {
        let path = self.document_path(file_id, TEXT_EXTENSION);
        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        let text = content.lines().next().unwrap_or_default().trim();
        Ok(String::from(text))
    }

    /// The annotations of `<file_id>.ann` whose tag is `entity`, ignoring the case.
    pub fn annotations_for_entity(
        &self,
        file_id: &str,
        entity: &str,
    ) -> Result<Vec<Annotation>, DatasetError> {
        let path = self.document_path(file_id, ANNOTATION_EXTENSION);
        let file = File::open(&path).map_err(io_error(&path))?;
        annotations_for_entity(BufReader::new(file), file_id, entity, &self.sink).map_err(
            |source| DatasetError::Annotation {
                file_id: String::from(file_id),
                source,
            },
        )
    }

    /// The BILOU lines of a document for a single entity type.
    pub fn bilou_lines_for_entity(
        &self,
        file_id: &str,
        entity: &str,
    ) -> Result<Vec<BilouLine<'static>>, DatasetError> {
        let annotations = self.annotations_for_entity(file_id, entity)?;
        let text = self.text(file_id)?;
        let lines = to_bilou_lines(file_id, &text, &annotations, entity, &self.config)?;
        Ok(lines.into_iter().map(BilouLine::into_owned).collect())
    }

    /// Applies `f` to every document, in parallel if the config allows it. The results keep the
    /// order of the documents.
    fn map_documents<T, F>(&self, f: F) -> Result<Vec<T>, DatasetError>
    where
        T: Send,
        F: Fn(&str) -> Result<T, DatasetError> + Sync + Send,
    {
        if self.config.parallel() {
            self.file_ids.par_iter().map(|id| f(id.as_str())).collect()
        } else {
            self.file_ids.iter().map(|id| f(id.as_str())).collect()
        }
    }

    /// One CoNLL document per file of the folder, for a single entity type.
    pub fn documents_for_entity(&self, entity: &str) -> Result<Vec<ConllDocument>, DatasetError> {
        self.map_documents(|file_id| {
            let lines = self.bilou_lines_for_entity(file_id, entity)?;
            Ok(ConllDocument::from_bilou_lines(&lines, self.config.tag_columns()))
        })
    }

    /// One CoNLL document per file of the folder, with a tag column per ScienceIE entity type
    /// (Task, Process, Material, in this order).
    pub fn merged_documents(&self) -> Result<Vec<ConllDocument>, DatasetError> {
        self.map_documents(|file_id| {
            let columns = all::<EntityType>()
                .map(|entity| self.bilou_lines_for_entity(file_id, entity.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            ConllDocument::merge(&columns).map_err(|source| DatasetError::Merge {
                file_id: String::from(file_id),
                source,
            })
        })
    }

    /// Writes `<out_dir>/<stem>_<entity>_conll.txt` for every entity type of the config, the
    /// entity in lowercase. Returns the paths of the written files.
    pub fn write_bilou_lines<P: AsRef<Path>>(
        &self,
        out_dir: P,
        stem: &str,
    ) -> Result<Vec<PathBuf>, DatasetError> {
        tracing::info!(
            folder = %self.folderpath.display(),
            documents = self.file_ids.len(),
            "Writing BILOU lines for ScienceIE"
        );
        let mut written = vec![];
        for entity in self.config.entity_types() {
            let path = out_dir
                .as_ref()
                .join(format!("{}_{}_conll.txt", stem, entity.to_lowercase()));
            let documents = self.documents_for_entity(entity)?;
            write_file(&path, &documents)?;
            tracing::info!(%entity, path = %path.display(), "Wrote BILOU lines");
            written.push(path);
        }
        tracing::info!("Finished writing BILOU lines for ScienceIE");
        Ok(written)
    }

    /// Writes the merged documents of the folder to `path`.
    pub fn write_merged_bilou_lines<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let documents = self.merged_documents()?;
        write_file(path.as_ref(), &documents)?;
        tracing::info!(path = %path.as_ref().display(), "Wrote merged BILOU lines");
        Ok(())
    }
}

fn write_file(path: &Path, documents: &[ConllDocument]) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(io_error(path))?;
    write_documents(BufWriter::new(file), documents).map_err(io_error(path))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ConverterConfigBuilder;
    use crate::warnings::{CollectedWarnings, Warning};

    const TEXT: &str = "A carbon nanotube device";
    const ANNOTATIONS: &str = "T1\tMaterial 2 17\tcarbon nanotube\nT2\tTask 0 1\tA\n";

    fn folder(config: ConverterConfig) -> (tempfile::TempDir, ScienceIeFolder) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S1.txt"), format!("  {}\nsecond line\n", TEXT)).unwrap();
        fs::write(dir.path().join("S1.ann"), ANNOTATIONS).unwrap();
        fs::write(dir.path().join("S0.txt"), "nothing here").unwrap();
        fs::write(dir.path().join("S0.ann"), "").unwrap();
        fs::write(dir.path().join("README.md"), "not a document").unwrap();
        let folder = ScienceIeFolder::new(dir.path(), config).unwrap();
        (dir, folder)
    }

    #[test]
    fn test_convert_document() {
        let sink = CollectedWarnings::new();
        let config = ConverterConfig::default();
        let lines = convert_document("S1", TEXT, ANNOTATIONS, "Material", &config, &sink).unwrap();
        let tags: Vec<_> = lines.iter().map(|l| l.tag.to_string()).collect();
        assert_eq!(
            tags,
            vec!["O-Material", "B-Material", "L-Material", "O-Material"]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_convert_document_ignores_warnings() {
        let sink = CollectedWarnings::new();
        let config = ConverterConfigBuilder::default()
            .ignore_warnings(true)
            .build();
        convert_document("S1", TEXT, ANNOTATIONS, "Process", &config, &sink).unwrap();
        assert!(sink.is_empty());
        let config = ConverterConfig::default();
        convert_document("S1", TEXT, ANNOTATIONS, "Process", &config, &sink).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_convert_document_errors() {
        let config = ConverterConfig::default();
        let err = convert_document("S1", TEXT, "T1\tTask 2 99\tx", "Task", &config, &SilentWarnings)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Conversion { .. }));
        let err = convert_document("S1", TEXT, "T1\tTask a 9\tx", "Task", &config, &SilentWarnings)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Annotation { .. }));
    }

    #[test]
    fn test_file_ids_are_sorted_and_unique() {
        let (_dir, folder) = folder(ConverterConfig::default());
        assert_eq!(folder.file_ids(), &["S0", "S1"]);
    }

    #[test]
    fn test_text_is_first_line_trimmed() {
        let (_dir, folder) = folder(ConverterConfig::default());
        assert_eq!(folder.text("S1").unwrap(), TEXT);
    }

    #[test]
    fn test_missing_document_is_an_io_error() {
        let (_dir, folder) = folder(ConverterConfig::default());
        let err = folder.bilou_lines_for_entity("S9", "Task").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_warnings_go_to_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S0.txt"), "nothing here").unwrap();
        fs::write(dir.path().join("S0.ann"), "").unwrap();
        let sink = Arc::new(CollectedWarnings::new());
        let folder =
            ScienceIeFolder::with_sink(dir.path(), ConverterConfig::default(), sink.clone())
                .unwrap();
        let lines = folder.bilou_lines_for_entity("S0", "Task").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            sink.take(),
            vec![Warning::NoAnnotations {
                file_id: String::from("S0"),
                entity: String::from("Task"),
            }]
        );
    }

    #[test]
    fn test_ignore_warnings_overrides_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S0.txt"), "nothing here").unwrap();
        fs::write(dir.path().join("S0.ann"), "").unwrap();
        let sink = Arc::new(CollectedWarnings::new());
        let config = ConverterConfigBuilder::default()
            .ignore_warnings(true)
            .build();
        let folder = ScienceIeFolder::with_sink(dir.path(), config, sink.clone()).unwrap();
        folder.bilou_lines_for_entity("S0", "Task").unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_parallel_documents_keep_their_order() {
        let config = ConverterConfigBuilder::default().parallel(true).build();
        let (_dir, parallel) = folder(config);
        let (_dir2, sequential) = folder(ConverterConfig::default());
        assert_eq!(
            parallel.documents_for_entity("Material").unwrap(),
            sequential.documents_for_entity("Material").unwrap()
        );
    }

    #[test]
    fn test_merged_documents() {
        let (_dir, folder) = folder(ConverterConfig::default());
        let documents = folder.merged_documents().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(
            documents[1].lines[0].to_string(),
            "A U-Task O-Process O-Material"
        );
        assert_eq!(
            documents[1].lines[2].to_string(),
            "nanotube O-Task O-Process L-Material"
        );
    }

    #[test]
    fn test_write_bilou_lines_file_names() {
        let (dir, folder) = folder(ConverterConfig::default());
        let out = tempfile::tempdir().unwrap();
        let written = folder.write_bilou_lines(out.path(), "train_science").unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "train_science_process_conll.txt",
                "train_science_material_conll.txt",
                "train_science_task_conll.txt"
            ]
        );
        drop(dir);
    }
}
