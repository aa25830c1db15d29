//! Markdown fragments for each report section.
//!
//! Every function here is pure: the same records always produce the same
//! text, which keeps report rendering reproducible.

use crate::error::ReportError;
use crate::formula::render_equation;
use crate::model::{
    AllocationGroup, AllocationInfo, FlowRecord, Parameter, ParameterScope, ProcessDoc,
    ProcessType, Source, Uncertainty,
};
use crate::source::TableRow;
use crate::ReportResult;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use regex::Regex;
use std::sync::LazyLock;

/// Extensions a report can be written or published as
pub const VALID_EXTENSIONS: [&str; 5] = [".md", ".txt", ".docx", ".html", ".pdf"];

pub const NO_FLOW_DATA: &str = "No flow data available.";

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/@.,&'\\(|)<>#;]+").unwrap());

static RE_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Format a number like C's `%0.3E`: `0.0001234` → `1.234E-04`.
pub fn scientific(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let formatted = format!("{:.3E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}E{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Markdown table of flows; quantities in scientific notation.
pub fn flow_table(flows: Option<&[FlowRecord]>) -> String {
    let flows = match flows {
        Some(flows) if !flows.is_empty() => flows,
        _ => return NO_FLOW_DATA.to_string(),
    };

    let mut md = String::from(
        "| Compartment | Flow Name | Quantity | Unit | DQI |\n\
         |-------------|-----------|----------|------|-----|\n",
    );
    for flow in flows {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            flow.category,
            flow.name,
            scientific(flow.amount),
            flow.unit,
            flow.dq
        ));
    }
    md
}

fn markdown_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Default allocation line followed by one table per non-empty factor group.
pub fn allocation_text(info: &AllocationInfo) -> String {
    let default_name = info
        .default_method
        .map(|method| method.label())
        .unwrap_or("No allocation");
    let mut md = format!("Default allocation: {}", default_name);

    for group in [
        AllocationGroup::Economic,
        AllocationGroup::Physical,
        AllocationGroup::Causal,
    ] {
        let factors: Vec<_> = info
            .factors
            .iter()
            .filter(|f| f.allocation_type.group() == Some(group))
            .collect();
        if factors.is_empty() {
            continue;
        }

        let product = |f: &crate::model::AllocationFactor| f.product.name.clone().unwrap_or_default();
        let table = match group {
            AllocationGroup::Causal => markdown_table(
                &["Flow", "Product", "Amount"],
                factors
                    .iter()
                    .map(|f| {
                        let flow = f
                            .exchange
                            .as_ref()
                            .and_then(|e| e.internal_id)
                            .unwrap_or(-1);
                        vec![flow.to_string(), product(f), f.value.to_string()]
                    })
                    .collect(),
            ),
            AllocationGroup::Physical | AllocationGroup::Economic => markdown_table(
                &["Product", "Amount", "Unit"],
                factors
                    .iter()
                    .map(|f| {
                        vec![
                            product(f),
                            f.value.to_string(),
                            f.product.ref_unit.clone().unwrap_or_default(),
                        ]
                    })
                    .collect(),
            ),
        };

        md.push_str(&format!(
            "\n\n{} allocation factors:\n\n{}",
            group.label(),
            table
        ));
    }

    md
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if previous_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_alpha = c.is_alphabetic();
    }
    out
}

/// Shortest round-trip form with a signed, two-digit exponent: `13.0`,
/// `1e+16`, `2.5e-05`.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            Err(_) => text,
        },
        None => text,
    }
}

/// `Triangle Distribution (max:13.0, min:5.0, mode:7.5)`, or `none`.
pub fn uncertainty_text(uncertainty: Option<&Uncertainty>) -> String {
    let u = match uncertainty {
        Some(u) => u,
        None => return "none".to_string(),
    };

    let name = title_case(&u.distribution_type.replace('_', " "));
    let values = [
        ("gmean", u.geom_mean),
        ("gsdev", u.geom_sd),
        ("max", u.maximum),
        ("ave", u.mean),
        ("min", u.minimum),
        ("mode", u.mode),
        ("sdev", u.sd),
    ];
    let pairs: Vec<String> = values
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}:{}", key, float_repr(v))))
        .collect();

    format!("{} ({})", name, pairs.join(", "))
}

fn parameter_row(param: &Parameter) -> String {
    let description = param
        .description
        .as_deref()
        .map(single_line)
        .unwrap_or_default();
    format!(
        "|  | {} | {} | {} | {} |\n",
        param.name,
        scientific(param.value),
        uncertainty_text(param.uncertainty.as_ref()),
        description
    )
}

/// Formula equations followed by the parameter value table.
///
/// Returns an empty string when there are no process or global parameters.
pub fn parameter_section(params: &[Parameter]) -> String {
    let bucket = |scope: ParameterScope, input: bool| -> Vec<&Parameter> {
        params
            .iter()
            .filter(|p| p.parameter_scope == scope && p.is_input_parameter == input)
            .collect()
    };
    let scopes = [
        (
            "Process",
            bucket(ParameterScope::ProcessScope, true),
            bucket(ParameterScope::ProcessScope, false),
        ),
        (
            "Global",
            bucket(ParameterScope::GlobalScope, true),
            bucket(ParameterScope::GlobalScope, false),
        ),
    ];

    let mut formulas = String::new();
    let mut table = String::new();

    for (label, inputs, calculated) in &scopes {
        if inputs.is_empty() && calculated.is_empty() {
            continue;
        }
        table.push_str(&format!("| {} |  |  |  |  |\n", label));
        for param in inputs {
            table.push_str(&parameter_row(param));
        }
        for param in calculated {
            table.push_str(&parameter_row(param));
            let equation = render_equation(&param.name, param.formula.as_deref().unwrap_or(""));
            formulas.push_str(&equation);
            formulas.push_str("\n\n");
        }
    }

    if table.is_empty() {
        return String::new();
    }

    let mut md = String::new();
    if scopes.iter().any(|(_, _, calculated)| !calculated.is_empty()) {
        md.push_str("The following are parameter formulas used or referenced in this process.\n\n");
        md.push_str(&formulas);
    }
    md.push_str(
        "The following table provides process and global parameter values \
         and their associated uncertainty.\n\n",
    );
    md.push_str("| Scope | Name | Value | Uncertainty | Description |\n");
    md.push_str("|:------|:-----|------:|:------------|:------------|\n");
    md.push_str(&table);
    md
}

/// Citation close to APA: `Name (Year). Title. Online: URL`.
pub fn citation(source: &Source) -> String {
    let mut text = source.name.clone();

    if let Some(year) = source.year {
        text.push_str(&format!(" ({})", year));
    }

    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    if let Some(reference) = non_empty(&source.text_reference).or_else(|| non_empty(&source.description)) {
        text.push_str(&format!(". {}", reference));
    }

    if let Some(url) = non_empty(&source.url) {
        let url: String = url.chars().filter(|c| *c != '\r' && *c != '\n').collect();
        text.push_str(&format!(". Online: {}", url));
    }

    single_line(&text)
}

/// Feature/information table built from process documentation.
pub fn process_doc_table(
    doc: &ProcessDoc,
    location: Option<&str>,
    process_type: ProcessType,
) -> String {
    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());

    let creation = doc
        .creation_date
        .as_deref()
        .map(|date| date.split('T').next().unwrap_or(date).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let process_kind = doc
        .process_type
        .clone()
        .unwrap_or_else(|| process_type.code().to_string());
    let scope = doc
        .technology_description
        .as_deref()
        .map(single_line)
        .unwrap_or_else(|| "N/A".to_string());

    let rows = [
        ("Location", location.unwrap_or("N/A").to_string()),
        ("Valid From", or_na(&doc.valid_from)),
        ("Valid Until", or_na(&doc.valid_until)),
        ("Creation Date", creation),
        ("Process Type", process_kind),
        ("Process Scope", scope),
        ("System Boundary", "Cradle-to-Gate".to_string()),
        ("Completeness", or_na(&doc.completeness_description)),
    ];

    let mut md = String::from("| Feature | Information |\n|-----------|----------|\n");
    for (feature, information) in rows {
        md.push_str(&format!("| {} | {} |\n", feature, information));
    }
    md
}

/// Normalize an extension to lower case with a leading dot and validate it.
///
/// `.txt` is accepted but maps to `.md`.
pub fn normalize_extension(ext: &str) -> ReportResult<String> {
    let mut ext = ext.trim().to_lowercase();
    if !ext.starts_with('.') {
        ext.insert(0, '.');
    }
    if !VALID_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ReportError::InvalidExtension(ext));
    }
    if ext == ".txt" {
        ext = ".md".to_string();
    }
    Ok(ext)
}

/// Report file name derived from the reference process name.
///
/// `"Aluminum, production mix, shape casted"` with `md` gives
/// `Aluminum_production_mix_shape_casted.md`.
pub fn file_name(reference_name: Option<&str>, ext: &str) -> ReportResult<String> {
    let ext = normalize_extension(ext)?;

    let stem = reference_name
        .map(|name| {
            let name = RE_WHITESPACE.replace_all(name, "_");
            let name = RE_SPECIAL.replace_all(&name, "_");
            let name = RE_UNDERSCORES.replace_all(&name, "_");
            name.strip_suffix('_').unwrap_or(&name).to_string()
        })
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "report".to_string());

    Ok(format!("{}{}", stem, ext))
}

/// Definition-list entries for the rows of a calculation workbook.
pub fn calculations_text(rows: &[TableRow]) -> String {
    let entries: Vec<String> = rows
        .iter()
        .map(|row| {
            let cell = |key: &str| row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

            let parameter = cell("Parameter").unwrap_or("N/A");
            let explanation = cell("Explanation").unwrap_or("N/A");
            let references = cell("References").unwrap_or("N/A");
            let formula = cell("Formula").unwrap_or("N/A");
            let units = cell("Units").filter(|u| *u != "N/A").unwrap_or("");
            let value = match cell("Value") {
                Some(value) => value,
                None if units.is_empty() => "N/A",
                None => "",
            };

            format!(
                "Parameter, {}: {}\n:   - Formula: {}\n    - Value: {} {}\n    - References: {}\n",
                parameter, explanation, formula, value, units, references
            )
        })
        .collect();

    entries.join("\n")
}
