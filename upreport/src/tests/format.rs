use crate::format::{
    allocation_text, calculations_text, citation, file_name, flow_table, normalize_extension,
    parameter_section, process_doc_table, scientific, uncertainty_text, NO_FLOW_DATA,
};
use crate::model::{
    AllocationFactor, AllocationInfo, AllocationType, ExchangeRef, FlowRecord, Parameter,
    ParameterScope, ProcessDoc, ProcessType, Ref, Source, Uncertainty,
};
use crate::source::TableRow;
use crate::ReportError;

fn param(name: &str, value: f64, input: bool, scope: ParameterScope) -> Parameter {
    Parameter {
        name: name.to_string(),
        value,
        is_input_parameter: input,
        parameter_scope: scope,
        formula: None,
        description: None,
        uncertainty: None,
    }
}

fn row(cells: &[(&str, &str)]) -> TableRow {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_scientific_notation() {
    assert_eq!(scientific(0.0001234), "1.234E-04");
    assert_eq!(scientific(1.0), "1.000E+00");
    assert_eq!(scientific(0.0), "0.000E+00");
    assert_eq!(scientific(-2500.0), "-2.500E+03");
    assert_eq!(scientific(1.5e123), "1.500E+123");
}

#[test]
fn test_scientific_non_finite() {
    assert_eq!(scientific(f64::NAN), "NAN");
    assert_eq!(scientific(f64::INFINITY), "INF");
    assert_eq!(scientific(f64::NEG_INFINITY), "-INF");
}

#[test]
fn test_flow_table() {
    let flows = vec![FlowRecord {
        category: "Technosphere/Energy".to_string(),
        name: "Electricity".to_string(),
        amount: 0.0001234,
        unit: "MJ".to_string(),
        dq: "(1;2;3;4;5)".to_string(),
    }];
    let table = flow_table(Some(flows.as_slice()));
    assert_eq!(
        table,
        "| Compartment | Flow Name | Quantity | Unit | DQI |\n\
         |-------------|-----------|----------|------|-----|\n\
         | Technosphere/Energy | Electricity | 1.234E-04 | MJ | (1;2;3;4;5) |\n"
    );
}

#[test]
fn test_flow_table_without_flows() {
    assert_eq!(flow_table(None), NO_FLOW_DATA);
    assert_eq!(flow_table(Some(&[][..])), NO_FLOW_DATA);
}

#[test]
fn test_allocation_without_factors_is_only_the_default_line() {
    let info = AllocationInfo {
        factors: Vec::new(),
        default_method: Some(AllocationType::EconomicAllocation),
    };
    assert_eq!(allocation_text(&info), "Default allocation: Economic");

    assert_eq!(
        allocation_text(&AllocationInfo::default()),
        "Default allocation: No allocation"
    );
}

#[test]
fn test_allocation_groups_in_economic_physical_causal_order() {
    let factor = |kind, name: &str, value| AllocationFactor {
        allocation_type: kind,
        product: Ref {
            ref_unit: Some("kg".to_string()),
            name: Some(name.to_string()),
            ..Ref::default()
        },
        value,
        exchange: Some(ExchangeRef {
            internal_id: Some(3),
        }),
    };
    let info = AllocationInfo {
        factors: vec![
            factor(AllocationType::CausalAllocation, "steel", 0.25),
            factor(AllocationType::PhysicalAllocation, "slag", 0.5),
            factor(AllocationType::EconomicAllocation, "ingot", 0.75),
            factor(AllocationType::NoAllocation, "ignored", 1.0),
        ],
        default_method: Some(AllocationType::PhysicalAllocation),
    };

    let text = allocation_text(&info);
    assert!(text.starts_with("Default allocation: Physical\n\n"));

    let economic = text.find("Economic allocation factors:").unwrap();
    let physical = text.find("Physical allocation factors:").unwrap();
    let causal = text.find("Causal allocation factors:").unwrap();
    assert!(economic < physical && physical < causal);

    assert!(text.contains("Flow"));
    assert!(text.contains("ingot"));
    assert!(!text.contains("ignored"));
}

#[test]
fn test_uncertainty_triangle() {
    let u = Uncertainty {
        distribution_type: "TRIANGLE_DISTRIBUTION".to_string(),
        maximum: Some(13.0),
        minimum: Some(5.0),
        mode: Some(7.5),
        ..Uncertainty::default()
    };
    assert_eq!(
        uncertainty_text(Some(&u)),
        "Triangle Distribution (max:13.0, min:5.0, mode:7.5)"
    );
}

#[test]
fn test_uncertainty_lognormal_and_absent() {
    let u = Uncertainty {
        distribution_type: "LOG_NORMAL_DISTRIBUTION".to_string(),
        geom_mean: Some(2.0),
        geom_sd: Some(1.5),
        ..Uncertainty::default()
    };
    assert_eq!(
        uncertainty_text(Some(&u)),
        "Log Normal Distribution (gmean:2.0, gsdev:1.5)"
    );
    assert_eq!(uncertainty_text(None), "none");
}

#[test]
fn test_uncertainty_exponent_form() {
    let u = Uncertainty {
        distribution_type: "NORMAL_DISTRIBUTION".to_string(),
        mean: Some(1e16),
        sd: Some(2.5e-5),
        minimum: Some(0.0001),
        ..Uncertainty::default()
    };
    assert_eq!(
        uncertainty_text(Some(&u)),
        "Normal Distribution (ave:1e+16, min:0.0001, sdev:2.5e-05)"
    );
}

#[test]
fn test_parameter_section_layout() {
    let mut calculated = param("A_tot", 13.5, false, ParameterScope::ProcessScope);
    calculated.formula = Some("b * c".to_string());
    let mut input = param("b", 2.0, true, ParameterScope::ProcessScope);
    input.description = Some("first\nsecond".to_string());
    let global = param("c", 6.75, true, ParameterScope::GlobalScope);

    let text = parameter_section(&[calculated, global, input]);
    let expected = "The following are parameter formulas used or referenced in this process.\n\n\
                    $$\nA_{tot} = b c\n$$\n\n\
                    The following table provides process and global parameter values and their associated uncertainty.\n\n\
                    | Scope | Name | Value | Uncertainty | Description |\n\
                    |:------|:-----|------:|:------------|:------------|\n\
                    | Process |  |  |  |  |\n\
                    |  | b | 2.000E+00 | none | first second |\n\
                    |  | A_tot | 1.350E+01 | none |  |\n\
                    | Global |  |  |  |  |\n\
                    |  | c | 6.750E+00 | none |  |\n";
    assert_eq!(text, expected);
}

#[test]
fn test_parameter_section_without_formulas() {
    let text = parameter_section(&[param("x", 1.0, true, ParameterScope::GlobalScope)]);
    assert!(text.starts_with("The following table provides"));
    assert!(!text.contains("| Process |"));
}

#[test]
fn test_parameter_section_empty() {
    assert_eq!(parameter_section(&[]), "");
    let impact = param("cf", 1.0, true, ParameterScope::ImpactScope);
    assert_eq!(parameter_section(&[impact]), "");
}

#[test]
fn test_citation() {
    let source = Source {
        name: "Smith".to_string(),
        year: Some(2019),
        text_reference: Some("Casting data\r\nvolume 2".to_string()),
        description: Some("unused".to_string()),
        url: Some("https://example.org/a\r\n".to_string()),
        ..Source::default()
    };
    assert_eq!(
        citation(&source),
        "Smith (2019). Casting data volume 2. Online: https://example.org/a"
    );
}

#[test]
fn test_citation_falls_back_to_description() {
    let source = Source {
        name: "Jones".to_string(),
        description: Some("Field notes".to_string()),
        ..Source::default()
    };
    assert_eq!(citation(&source), "Jones. Field notes");
}

#[test]
fn test_process_doc_table() {
    let doc = ProcessDoc {
        valid_from: Some("2020-01-01".to_string()),
        creation_date: Some("2023-05-04T10:00:00Z".to_string()),
        technology_description: Some("Die casting\nof ingots".to_string()),
        ..ProcessDoc::default()
    };
    let table = process_doc_table(&doc, Some("US"), ProcessType::Manufacturing);
    assert_eq!(
        table,
        "| Feature | Information |\n|-----------|----------|\n\
         | Location | US |\n\
         | Valid From | 2020-01-01 |\n\
         | Valid Until | N/A |\n\
         | Creation Date | 2023-05-04 |\n\
         | Process Type | MP |\n\
         | Process Scope | Die casting of ingots |\n\
         | System Boundary | Cradle-to-Gate |\n\
         | Completeness | N/A |\n"
    );
}

#[test]
fn test_file_name_sanitization() {
    assert_eq!(
        file_name(Some("Aluminum, production mix, shape casted"), "md").unwrap(),
        "Aluminum_production_mix_shape_casted.md"
    );
    assert_eq!(
        file_name(Some("Steel (hot rolled) <EU>;"), ".PDF").unwrap(),
        "Steel_hot_rolled_EU.pdf"
    );
    assert_eq!(file_name(Some("notes"), "txt").unwrap(), "notes.md");
    assert_eq!(file_name(None, "html").unwrap(), "report.html");
    assert_eq!(file_name(Some("..."), "md").unwrap(), "report.md");
}

#[test]
fn test_invalid_extension() {
    match normalize_extension("csv") {
        Err(ReportError::InvalidExtension(ext)) => assert_eq!(ext, ".csv"),
        other => panic!("Expected invalid extension, got {:?}", other),
    }
}

#[test]
fn test_calculations_text() {
    let rows = vec![
        row(&[
            ("Parameter", "m"),
            ("Explanation", "mass"),
            ("Formula", "v*rho"),
            ("Value", "5"),
            ("Units", "kg"),
            ("References", "Handbook"),
        ]),
        row(&[("Parameter", "n"), ("Explanation", "count"), ("References", "None")]),
    ];
    let text = calculations_text(&rows);
    assert_eq!(
        text,
        "Parameter, m: mass\n:   - Formula: v*rho\n    - Value: 5 kg\n    - References: Handbook\n\
         \n\
         Parameter, n: count\n:   - Formula: N/A\n    - Value: N/A \n    - References: None\n"
    );
}
