//! The integrity constraints, each an ASK query that is true on violation.

use serde::{Deserialize, Serialize};

const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX qb: <http://purl.org/linked-data/cube#>
";

/// Structural rules a compiled cube must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Constraint {
    UniqueDataSet,
    SingleDataSet,
    UniqueStructure,
    SingleStructure,
    StructureHasMeasure,
    DimensionsHaveRange,
    CodedDimensionsHaveCodeList,
    OnlyAttributesOptional,
    SliceKeysDeclared,
    SliceKeysConsistent,
    UniqueSliceStructure,
    SliceDimensionsComplete,
    AllDimensionsPresent,
    NoDuplicateObservations,
    NoDuplicateSlices,
    AllMeasuresPresent,
    DeclaredMeasuresUsed,
    ConsistentDataSetLinks,
    CodesFromCodeList,
    SingleAttribute,
    ObservationsInSlices,
    ComponentPropertiesTyped,
    UniqueNotations,
    LiteralsMatchRange,
}

impl Constraint {
    pub const ALL: [Constraint; 24] = [
        Constraint::UniqueDataSet,
        Constraint::SingleDataSet,
        Constraint::UniqueStructure,
        Constraint::SingleStructure,
        Constraint::StructureHasMeasure,
        Constraint::DimensionsHaveRange,
        Constraint::CodedDimensionsHaveCodeList,
        Constraint::OnlyAttributesOptional,
        Constraint::SliceKeysDeclared,
        Constraint::SliceKeysConsistent,
        Constraint::UniqueSliceStructure,
        Constraint::SliceDimensionsComplete,
        Constraint::AllDimensionsPresent,
        Constraint::NoDuplicateObservations,
        Constraint::NoDuplicateSlices,
        Constraint::AllMeasuresPresent,
        Constraint::DeclaredMeasuresUsed,
        Constraint::ConsistentDataSetLinks,
        Constraint::CodesFromCodeList,
        Constraint::SingleAttribute,
        Constraint::ObservationsInSlices,
        Constraint::ComponentPropertiesTyped,
        Constraint::UniqueNotations,
        Constraint::LiteralsMatchRange,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Constraint::UniqueDataSet => "Every observation has exactly one qb:dataSet",
            Constraint::SingleDataSet => "The graph contains one qb:DataSet",
            Constraint::UniqueStructure => "Every dataset has exactly one qb:structure",
            Constraint::SingleStructure => "The graph contains one structure definition",
            Constraint::StructureHasMeasure => "Every structure declares at least one measure",
            Constraint::DimensionsHaveRange => "Every dimension property has an rdfs:range",
            Constraint::CodedDimensionsHaveCodeList => {
                "Dimensions ranging over concepts declare a qb:codeList"
            }
            Constraint::OnlyAttributesOptional => "Only attribute components may be optional",
            Constraint::SliceKeysDeclared => "Every slice key belongs to a structure",
            Constraint::SliceKeysConsistent => {
                "Slice key properties are dimensions of the structure"
            }
            Constraint::UniqueSliceStructure => {
                "Slices of a structure with slice keys have exactly one qb:sliceStructure"
            }
            Constraint::SliceDimensionsComplete => "Every slice has a value for each key dimension",
            Constraint::AllDimensionsPresent => {
                "Every observation has a value for each dimension, directly or via its slice"
            }
            Constraint::NoDuplicateObservations => {
                "No two observations in a slice share their observation-level dimensions"
            }
            Constraint::NoDuplicateSlices => "No two slices share the same dimension values",
            Constraint::AllMeasuresPresent => "Every observation has a value for each measure",
            Constraint::DeclaredMeasuresUsed => {
                "Every declared measure appears on some observation"
            }
            Constraint::ConsistentDataSetLinks => {
                "Observations in a dataset's slices belong to that dataset"
            }
            Constraint::CodesFromCodeList => {
                "Coded values are concepts of the property's code list"
            }
            Constraint::SingleAttribute => "Every structure has exactly one attribute component",
            Constraint::ObservationsInSlices => "Every observation belongs to a slice",
            Constraint::ComponentPropertiesTyped => {
                "Dimension and measure components reference correctly typed properties"
            }
            Constraint::UniqueNotations => "Concepts in a scheme have distinct notations",
            Constraint::LiteralsMatchRange => {
                "Literal values carry their property's range datatype"
            }
        }
    }

    /// Query body; true when the graph violates the constraint.
    fn pattern(&self) -> &'static str {
        match self {
            Constraint::UniqueDataSet => {
                "ASK {
                    { ?obs a qb:Observation . FILTER NOT EXISTS { ?obs qb:dataSet ?ds } }
                    UNION
                    { ?obs a qb:Observation ; qb:dataSet ?ds1, ?ds2 . FILTER (?ds1 != ?ds2) }
                }"
            }
            Constraint::SingleDataSet => {
                "ASK { ?a a qb:DataSet . ?b a qb:DataSet . FILTER (?a != ?b) }"
            }
            Constraint::UniqueStructure => {
                "ASK {
                    { ?ds a qb:DataSet . FILTER NOT EXISTS { ?ds qb:structure ?dsd } }
                    UNION
                    { ?ds a qb:DataSet ; qb:structure ?dsd1, ?dsd2 . FILTER (?dsd1 != ?dsd2) }
                }"
            }
            Constraint::SingleStructure => {
                "ASK {
                    ?a a qb:DataStructureDefinition . ?b a qb:DataStructureDefinition .
                    FILTER (?a != ?b)
                }"
            }
            Constraint::StructureHasMeasure => {
                "ASK {
                    ?dsd a qb:DataStructureDefinition .
                    FILTER NOT EXISTS { ?dsd qb:component/qb:measure ?measure }
                }"
            }
            Constraint::DimensionsHaveRange => {
                "ASK { ?dim a qb:DimensionProperty . FILTER NOT EXISTS { ?dim rdfs:range ?range } }"
            }
            Constraint::CodedDimensionsHaveCodeList => {
                "ASK {
                    ?dim a qb:DimensionProperty ; rdfs:range ?class .
                    ?class rdfs:subClassOf skos:Concept .
                    FILTER NOT EXISTS { ?dim qb:codeList ?list }
                }"
            }
            Constraint::OnlyAttributesOptional => {
                "ASK {
                    ?dsd qb:component ?component .
                    ?component qb:componentRequired false .
                    FILTER NOT EXISTS { ?component qb:attribute ?attribute }
                }"
            }
            Constraint::SliceKeysDeclared => {
                "ASK {
                    ?key a qb:SliceKey .
                    FILTER NOT EXISTS { ?dsd a qb:DataStructureDefinition ; qb:sliceKey ?key }
                }"
            }
            Constraint::SliceKeysConsistent => {
                "ASK {
                    ?dsd qb:sliceKey ?key .
                    ?key a qb:SliceKey ; qb:componentProperty ?prop .
                    FILTER NOT EXISTS { ?dsd qb:component/qb:dimension ?prop }
                }"
            }
            Constraint::UniqueSliceStructure => {
                "ASK {
                    {
                        ?slice a qb:Slice .
                        FILTER NOT EXISTS { ?slice qb:sliceStructure ?key }
                        FILTER NOT EXISTS {
                            ?ds qb:slice ?slice ; qb:structure ?dsd .
                            FILTER NOT EXISTS { ?dsd qb:sliceKey ?anyKey }
                        }
                    }
                    UNION
                    { ?slice a qb:Slice ; qb:sliceStructure ?key1, ?key2 . FILTER (?key1 != ?key2) }
                }"
            }
            Constraint::SliceDimensionsComplete => {
                "ASK {
                    ?slice qb:sliceStructure ?key .
                    ?key qb:componentProperty ?dim .
                    FILTER NOT EXISTS { ?slice ?dim ?value }
                }"
            }
            Constraint::AllDimensionsPresent => {
                "ASK {
                    ?obs a qb:Observation ; qb:dataSet/qb:structure ?dsd .
                    ?dsd qb:component/qb:dimension ?dim .
                    FILTER NOT EXISTS { ?obs ?dim ?value }
                    FILTER NOT EXISTS { ?slice qb:observation ?obs ; ?dim ?sliceValue }
                }"
            }
            Constraint::NoDuplicateObservations => {
                "ASK {
                    ?slice qb:observation ?obs1, ?obs2 .
                    FILTER (?obs1 != ?obs2)
                    ?obs1 qb:dataSet/qb:structure ?dsd .
                    ?dsd qb:component ?component .
                    ?component qb:componentAttachment qb:Observation ; qb:dimension ?dim .
                    ?obs1 ?dim ?value .
                    ?obs2 ?dim ?value .
                }"
            }
            Constraint::NoDuplicateSlices => {
                "ASK {
                    ?slice1 a qb:Slice ; qb:sliceStructure ?key .
                    ?slice2 a qb:Slice ; qb:sliceStructure ?key .
                    FILTER (?slice1 != ?slice2)
                    FILTER NOT EXISTS {
                        ?key qb:componentProperty ?dim .
                        ?slice1 ?dim ?value .
                        FILTER NOT EXISTS { ?slice2 ?dim ?value }
                    }
                }"
            }
            Constraint::AllMeasuresPresent => {
                "ASK {
                    ?obs a qb:Observation ; qb:dataSet/qb:structure ?dsd .
                    ?dsd qb:component/qb:measure ?measure .
                    FILTER NOT EXISTS { ?obs ?measure ?value }
                }"
            }
            Constraint::DeclaredMeasuresUsed => {
                "ASK {
                    ?dsd qb:component/qb:measure ?measure .
                    FILTER NOT EXISTS { ?obs a qb:Observation ; ?measure ?value }
                }"
            }
            Constraint::ConsistentDataSetLinks => {
                "ASK {
                    ?ds qb:slice ?slice .
                    ?slice qb:observation ?obs .
                    FILTER NOT EXISTS { ?obs qb:dataSet ?ds }
                }"
            }
            Constraint::CodesFromCodeList => {
                "ASK {
                    ?prop qb:codeList ?list ; rdfs:range ?class .
                    ?class rdfs:subClassOf skos:Concept .
                    { ?node a qb:Observation } UNION { ?node a qb:Slice }
                    ?node ?prop ?value .
                    FILTER NOT EXISTS { ?value a skos:Concept ; skos:inScheme ?list }
                }"
            }
            Constraint::SingleAttribute => {
                "ASK {
                    { ?dsd a qb:DataStructureDefinition .
                      FILTER NOT EXISTS { ?dsd qb:component/qb:attribute ?attribute } }
                    UNION
                    { ?dsd qb:component ?c1, ?c2 .
                      ?c1 qb:attribute ?a1 . ?c2 qb:attribute ?a2 .
                      FILTER (?c1 != ?c2) }
                }"
            }
            Constraint::ObservationsInSlices => {
                "ASK { ?obs a qb:Observation . FILTER NOT EXISTS { ?slice qb:observation ?obs } }"
            }
            Constraint::ComponentPropertiesTyped => {
                "ASK {
                    {
                        ?component qb:dimension ?prop .
                        FILTER NOT EXISTS { ?prop a qb:DimensionProperty }
                    }
                    UNION
                    {
                        ?component qb:measure ?prop .
                        FILTER NOT EXISTS { ?prop a qb:MeasureProperty }
                    }
                }"
            }
            Constraint::UniqueNotations => {
                "ASK {
                    ?c1 skos:inScheme ?scheme ; skos:notation ?notation .
                    ?c2 skos:inScheme ?scheme ; skos:notation ?notation .
                    FILTER (?c1 != ?c2)
                }"
            }
            Constraint::LiteralsMatchRange => {
                "ASK {
                    ?prop rdfs:range ?datatype .
                    { ?node a qb:Observation } UNION { ?node a qb:Slice }
                    ?node ?prop ?value .
                    FILTER (isLiteral(?value) && datatype(?value) != ?datatype)
                }"
            }
        }
    }

    /// Full SPARQL text, prefixes included.
    pub fn query(&self) -> String {
        format!("{PREFIXES}{}", self.pattern())
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{self:?}"));
        f.write_str(&name)
    }
}
