use scienceie_bilou::{
    bilou_lines, read_conll, Annotation, CollectedWarnings, ConverterConfig,
    ConverterConfigBuilder, DatasetError, ScienceIeFolder, Warning,
};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::fs::read_to_string;
use std::sync::Arc;

const FOLDER: &str = "tests/data/scienceie";

#[derive(Deserialize)]
struct ConversionCase {
    name: String,
    text: String,
    entity: String,
    annotations: Vec<Annotation>,
    expected: Vec<String>,
}

#[test]
fn conversion_cases() {
    let cases = json_lines::<ConversionCase, _>("tests/data/conversion_cases.jsonl")
        .expect("file conversion_cases.jsonl not found in test directory")
        .map(|r| r.unwrap())
        .collect::<Vec<_>>();
    assert!(!cases.is_empty());
    for case in cases {
        let lines = bilou_lines(&case.text, &case.annotations, &case.entity).unwrap();
        let actual: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(actual, case.expected, "case {}", case.name);
    }
}

fn collected_folder(config: ConverterConfig) -> (ScienceIeFolder, Arc<CollectedWarnings>) {
    let sink = Arc::new(CollectedWarnings::new());
    let folder = ScienceIeFolder::with_sink(FOLDER, config, sink.clone()).unwrap();
    (folder, sink)
}

#[test]
fn fixture_folder_documents() {
    let (folder, _) = collected_folder(ConverterConfig::default());
    assert_eq!(folder.file_ids(), &["S0001", "S0002", "S0003"]);
    assert_eq!(
        folder.text("S0003").unwrap(),
        "Graphene oxide was reduced ."
    );
    let annotations = folder.annotations_for_entity("S0001", "material").unwrap();
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[1].words, "lithium-ion battery");
    assert_eq!(annotations[1].entity_number, "T2");
}

#[test]
fn fixture_task_lines() {
    let (folder, _) = collected_folder(ConverterConfig::default());
    let lines: Vec<String> = folder
        .bilou_lines_for_entity("S0001", "Task")
        .unwrap()
        .iter()
        .map(|l| l.to_string())
        .collect();
    let expected = vec![
        "Carbon O-Task",
        "nanotubes O-Task",
        "are O-Task",
        "used O-Task",
        "to O-Task",
        "improve B-Task",
        "lithium-ion I-Task",
        "battery I-Task",
        "performance L-Task",
        ". O-Task",
    ];
    assert_eq!(lines, expected);
}

#[test]
fn write_bilou_lines_per_entity() {
    let (folder, sink) = collected_folder(ConverterConfig::default());
    let out = tempfile::tempdir().unwrap();
    let written = folder.write_bilou_lines(out.path(), "train_science").unwrap();
    assert_eq!(
        written,
        vec![
            out.path().join("train_science_process_conll.txt"),
            out.path().join("train_science_material_conll.txt"),
            out.path().join("train_science_task_conll.txt"),
        ]
    );

    let material = read_to_string(&written[1]).unwrap();
    let expected = "Carbon B-Material B-Material B-Material
nanotubes L-Material L-Material L-Material
are O-Material O-Material O-Material
used O-Material O-Material O-Material
to O-Material O-Material O-Material
improve O-Material O-Material O-Material
lithium-ion B-Material B-Material B-Material
battery L-Material L-Material L-Material
performance O-Material O-Material O-Material
. O-Material O-Material O-Material

We O-Material O-Material O-Material
measure O-Material O-Material O-Material
the O-Material O-Material O-Material
thermal O-Material O-Material O-Material
conductivity O-Material O-Material O-Material
of O-Material O-Material O-Material
thin B-Material B-Material B-Material
films L-Material L-Material L-Material
using O-Material O-Material O-Material
Raman O-Material O-Material O-Material
spectroscopy O-Material O-Material O-Material
. O-Material O-Material O-Material

Graphene B-Material B-Material B-Material
oxide L-Material L-Material L-Material
was O-Material O-Material O-Material
reduced O-Material O-Material O-Material
. O-Material O-Material O-Material

";
    assert_eq!(material, expected);

    let warnings = sink.take();
    assert_eq!(warnings.len(), 4);
    let malformed = warnings
        .iter()
        .filter(|w| matches!(w, Warning::MalformedLine { file_id, line_number: 3, .. } if file_id == "S0002"))
        .count();
    assert_eq!(malformed, 3);
    assert_eq!(
        warnings[3],
        Warning::NoAnnotations {
            file_id: String::from("S0003"),
            entity: String::from("Task"),
        }
    );
}

#[test]
fn written_files_can_be_read_back() {
    let config = ConverterConfigBuilder::default()
        .entity_types(["Process"])
        .ignore_warnings(true)
        .parallel(true)
        .build();
    let (folder, sink) = collected_folder(config);
    let out = tempfile::tempdir().unwrap();
    let written = folder.write_bilou_lines(out.path(), "dev").unwrap();
    assert_eq!(written.len(), 1);
    assert!(sink.is_empty());

    let documents = read_conll(&written[0]).unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[2].len(), 5);
    assert_eq!(
        documents[2].lines[3].tags,
        vec!["U-Process", "U-Process", "U-Process"]
    );
    assert_eq!(documents, folder.documents_for_entity("Process").unwrap());
}

#[test]
fn merged_file_has_one_column_per_entity() {
    let (folder, _) = collected_folder(ConverterConfig::default());
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("merged_conll.txt");
    folder.write_merged_bilou_lines(&path).unwrap();
    let documents = read_conll(&path).unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(
        documents[1].lines[9].to_string(),
        "Raman O-Task B-Process O-Material"
    );
    assert_eq!(
        documents[0].lines[6].to_string(),
        "lithium-ion I-Task O-Process B-Material"
    );
}

#[test]
fn missing_folder_is_an_error() {
    let err = ScienceIeFolder::new("tests/data/missing", ConverterConfig::default()).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}
