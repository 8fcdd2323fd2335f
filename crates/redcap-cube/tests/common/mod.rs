//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use redcap_cube::CubeInputs;

pub const DATADICT: &str = "\
Variable / Field Name,Form Name,Field Type,Field Label,\
    \"Choices, Calculations, OR Slider Labels\",Text Validation Type OR Show Slider Number
subject,visit_form,text,Subject ID,,
arm,visit_form,text,Study Arm,,
visit,visit_form,dropdown,Visit,\"1, Baseline | 2, Followup\",
age,visit_form,text,Age at Visit,,integer
score,visit_form,text,,,number
";

pub const MAPPING: &str = "\
Variable / Field Name,dimension,concept,categories,statistic,units,range
subject,y,,,,,
arm,y,,,,,
visit,y,,,,,
score,,,,,obo:UO_0000189,
";

pub const METADATA: &str = "\
dataset_id,title,description,publisher,issued,subject
ncanda-2015,NCANDA Visits,Visit measures,SRI International,2015-06-01,
";

pub const SLICES: &str = "\
slice,label,label_lang,comment,comment_lang
Arm,Slice by arm,en,Observations for one study arm,en
ArmVisit,Slice by arm and visit,en,,
";

pub const OBSERVATIONS: &str = "\
subject,arm,visit,visit_label,age,score
S1,A1,1,Baseline,15,3.5
S2,A1,1,Baseline,16,4.0
S1,A1,2,Followup,16,3.9
";

/// Input files written into a scratch directory.
pub struct Fixture {
    pub dir: TempDir,
    pub inputs: CubeInputs,
}

impl Fixture {
    /// The standard three-dimension fixture.
    pub fn standard() -> Self {
        Self::with(DATADICT, MAPPING, METADATA, OBSERVATIONS)
    }

    pub fn with(datadict: &str, mapping: &str, metadata: &str, observations: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let write = |name: &str, content: &str| -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, content).expect("Failed to write fixture");
            path
        };

        let inputs = CubeInputs {
            datadict: Some(write("datadict.csv", datadict)),
            mapping: Some(write("mapping.csv", mapping)),
            metadata: Some(write("metadata.csv", metadata)),
            dimensions: "subject,arm,visit".to_string(),
            slices: Some(write("slices.csv", SLICES)),
            observations: Some(write("observations.csv", observations)),
        };
        Self { dir, inputs }
    }
}
