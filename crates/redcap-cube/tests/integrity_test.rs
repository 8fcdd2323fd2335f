//! Integrity-constraint tests against compiled cubes.

mod common;

use oxigraph::model::{Literal, Term};

use common::{DATADICT, Fixture, MAPPING, METADATA, OBSERVATIONS};
use redcap_cube::integrity::{self, violates};
use redcap_cube::schema::naming::slice_key_name;
use redcap_cube::{Constraint, CubeConfig, CubeInputs, DataCube};

fn compile(fixture: &Fixture) -> DataCube {
    DataCube::compile(&fixture.inputs, CubeConfig::default()).expect("Compilation failed")
}

#[test]
fn test_well_formed_cube_passes_every_constraint() {
    let fixture = Fixture::standard();
    let report = compile(&fixture).check_integrity().unwrap();

    assert_eq!(report.checked, Constraint::ALL.len());
    assert!(report.is_valid(), "violations: {:?}", report.violations);
}

#[test]
fn test_two_datasets_violate_single_dataset() {
    let metadata = format!("{METADATA}ncanda-2016,NCANDA Year Two,,,,\n");
    let fixture = Fixture::with(DATADICT, MAPPING, &metadata, OBSERVATIONS);
    let report = compile(&fixture).check_integrity().unwrap();

    assert!(report.violates(Constraint::SingleDataSet));
    assert!(!report.violates(Constraint::UniqueStructure));
}

#[test]
fn test_unused_measure_is_reported() {
    let datadict = format!("{DATADICT}weight,visit_form,text,Weight,,number\n");
    let fixture = Fixture::with(&datadict, MAPPING, METADATA, OBSERVATIONS);
    let report = compile(&fixture).check_integrity().unwrap();

    assert!(report.violates(Constraint::DeclaredMeasuresUsed));
    assert!(report.violates(Constraint::AllMeasuresPresent));
    assert!(!report.violates(Constraint::StructureHasMeasure));
}

#[test]
fn test_unknown_code_is_reported() {
    let observations = format!("{OBSERVATIONS}S2,A1,3,Unknown,17,4.2\n");
    let fixture = Fixture::with(DATADICT, MAPPING, METADATA, &observations);
    let report = compile(&fixture).check_integrity().unwrap();

    assert_eq!(report.violations, vec![Constraint::CodesFromCodeList]);
}

#[test]
fn test_duplicate_slice_is_reported() {
    let fixture = Fixture::standard();
    let cube = compile(&fixture);

    let v = cube.vocabulary();
    let slice = v.instance("duplicate-slice").unwrap();
    let key = v.project(&format!("sliceBy{}", slice_key_name(&["arm", "visit"]))).unwrap();
    let triples = [
        (v.rdf_type.clone(), Term::from(v.qb_slice.clone())),
        (v.qb_slice_structure.clone(), Term::from(key)),
        (
            v.project("arm").unwrap(),
            Term::from(Literal::new_typed_literal("A1", v.xsd_string.clone())),
        ),
        (v.project("visit").unwrap(), Term::from(v.project("visit-1").unwrap())),
    ];

    let mut graph = cube.into_graph();
    for (predicate, object) in triples {
        graph.add(slice.clone(), predicate, object).unwrap();
    }

    assert!(violates(&graph, Constraint::NoDuplicateSlices).unwrap());
    assert!(!violates(&graph, Constraint::UniqueSliceStructure).unwrap());
}

#[test]
fn test_single_dimension_cube_is_valid() {
    let datadict = "\
Variable / Field Name,Form Name,Field Type,Field Label
subject,visit_form,text,Subject ID
score,visit_form,text,Score
";
    let mapping = "Variable / Field Name,dimension\nsubject,y\n";
    let observations = "subject,score\nS1,3.5\nS2,4.0\n";
    let fixture = Fixture::with(datadict, mapping, METADATA, observations);
    let inputs = CubeInputs {
        dimensions: "subject".to_string(),
        ..fixture.inputs.clone()
    };
    let report = DataCube::compile(&inputs, CubeConfig::default())
        .unwrap()
        .check_integrity()
        .unwrap();

    assert!(report.is_valid(), "violations: {:?}", report.violations);
}

#[test]
fn test_slice_without_structure_is_reported_when_keys_exist() {
    let fixture = Fixture::standard();
    let cube = compile(&fixture);

    let v = cube.vocabulary();
    let slice = v.instance("unkeyed-slice").unwrap();
    let slice_type = v.qb_slice.clone();
    let rdf_type = v.rdf_type.clone();

    let mut graph = cube.into_graph();
    graph.add(slice, rdf_type, slice_type).unwrap();

    assert!(violates(&graph, Constraint::UniqueSliceStructure).unwrap());
}

#[test]
fn test_report_serializes_constraint_names() {
    let observations = format!("{OBSERVATIONS}S2,A1,3,Unknown,17,4.2\n");
    let fixture = Fixture::with(DATADICT, MAPPING, METADATA, &observations);
    let report = integrity::check(compile(&fixture).graph()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["violations"][0], "codes-from-code-list");
}
