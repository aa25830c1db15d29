//! Records exchanged with a [`DataSource`](crate::source::DataSource).
//!
//! Field names follow the olca-schema JSON-LD conventions (camelCase, `@id`)
//! so that project exports decode directly into these types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reference to another entity, as embedded in olca-schema records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_unit: Option<String>,
}

/// Identifier and display name of a root entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub id: String,
    pub name: String,
}

/// Root entity classes a data source can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    ProductSystem,
    Process,
    Actor,
    Source,
    Parameter,
}


/// One row of an input or output flow table
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub category: String,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub dq: String,
}

/// Allocation method names used by olca-schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationType {
    PhysicalAllocation,
    EconomicAllocation,
    CausalAllocation,
    NoAllocation,
    UseDefaultAllocation,
    #[serde(other)]
    Unknown,
}

impl AllocationType {
    /// Report label for the method; methods without a table group yield `None`
    pub fn group(&self) -> Option<AllocationGroup> {
        match self {
            AllocationType::PhysicalAllocation => Some(AllocationGroup::Physical),
            AllocationType::EconomicAllocation => Some(AllocationGroup::Economic),
            AllocationType::CausalAllocation => Some(AllocationGroup::Causal),
            AllocationType::NoAllocation
            | AllocationType::UseDefaultAllocation
            | AllocationType::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.group() {
            Some(group) => group.label(),
            None => "No allocation",
        }
    }
}

/// The three kinds of allocation factor tables in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationGroup {
    Physical,
    Economic,
    Causal,
}

impl AllocationGroup {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationGroup::Physical => "Physical",
            AllocationGroup::Economic => "Economic",
            AllocationGroup::Causal => "Causal",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRef {
    #[serde(default)]
    pub internal_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFactor {
    pub allocation_type: AllocationType,
    #[serde(default)]
    pub product: Ref,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub exchange: Option<ExchangeRef>,
}

/// Allocation factors of a process together with its default method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationInfo {
    pub factors: Vec<AllocationFactor>,
    pub default_method: Option<AllocationType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterScope {
    #[default]
    ProcessScope,
    GlobalScope,
    ImpactScope,
}

/// Uncertainty distribution attached to a parameter or exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uncertainty {
    /// Distribution name in olca-schema form, e.g. `TRIANGLE_DISTRIBUTION`
    pub distribution_type: String,
    #[serde(default)]
    pub geom_mean: Option<f64>,
    #[serde(default)]
    pub geom_sd: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub mode: Option<f64>,
    #[serde(default)]
    pub sd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub is_input_parameter: bool,
    #[serde(default)]
    pub parameter_scope: ParameterScope,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uncertainty: Option<Uncertainty>,
}

/// A literature source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub text_reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A person or organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(rename = "@id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Actor {
    pub fn to_ref(&self) -> Ref {
        Ref {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            ..Ref::default()
        }
    }
}

/// Process documentation block of a unit process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_selection_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_set_owner: Option<Ref>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<Ref>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Ref>,
}

/// NETL process type codes carried over from the DS/DF workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessType {
    Extraction,
    Manufacturing,
    #[default]
    Basic,
    Installation,
    EnergyConversion,
    Transportation,
    Recovery,
    WasteTreatment,
    Auxiliary,
}

impl ProcessType {
    pub const ALL: [ProcessType; 9] = [
        ProcessType::Extraction,
        ProcessType::Manufacturing,
        ProcessType::Basic,
        ProcessType::Installation,
        ProcessType::EnergyConversion,
        ProcessType::Transportation,
        ProcessType::Recovery,
        ProcessType::WasteTreatment,
        ProcessType::Auxiliary,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ProcessType::Extraction => "EP",
            ProcessType::Manufacturing => "MP",
            ProcessType::Basic => "BP",
            ProcessType::Installation => "IP",
            ProcessType::EnergyConversion => "EC",
            ProcessType::Transportation => "TP",
            ProcessType::Recovery => "RP",
            ProcessType::WasteTreatment => "WT",
            ProcessType::Auxiliary => "AP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessType::Extraction => "Extraction Process",
            ProcessType::Manufacturing => "Manufacturing Process",
            ProcessType::Basic => "Basic Process",
            ProcessType::Installation => "Installation Process",
            ProcessType::EnergyConversion => "Energy Conversion",
            ProcessType::Transportation => "Transportation Process",
            ProcessType::Recovery => "Recovery Process",
            ProcessType::WasteTreatment => "Waste Treatment",
            ProcessType::Auxiliary => "Auxiliary Process",
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ProcessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        ProcessType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| format!("Unknown process type '{}'", s.trim()))
    }
}
