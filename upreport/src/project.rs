//! File-based openLCA project.
//!
//! A project is a single JSON document with the olca-schema root entity
//! lists (`productSystems`, `processes`, `parameters`, `sources`,
//! `actors`). Edits are applied in memory and saved next to the opened file
//! as `<stem>_edited.json`; the original export is never overwritten.

use crate::error::ReportError;
use crate::model::{
    Actor, AllocationFactor, AllocationInfo, AllocationType, Descriptor, EntityClass, FlowRecord,
    Parameter, ParameterScope, ProcessDoc, Ref, Source,
};
use crate::source::DataSource;
use crate::ReportResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the actor list kept in the working directory
pub const ACTOR_FILE_NAME: &str = "actors.yaml";

const EDITED_SUFFIX: &str = "_edited";

static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectData {
    #[serde(default)]
    product_systems: Vec<ProductSystemRecord>,
    #[serde(default)]
    processes: Vec<ProcessRecord>,
    /// Global parameters
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    actors: Vec<Actor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSystemRecord {
    #[serde(rename = "@id")]
    id: String,
    name: String,
    #[serde(default)]
    ref_process: Ref,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRecord {
    #[serde(rename = "@id")]
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Ref>,
    #[serde(default)]
    exchanges: Vec<Exchange>,
    #[serde(default)]
    allocation_factors: Vec<AllocationFactor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_allocation_method: Option<AllocationType>,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    process_documentation: Option<ProcessDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Exchange {
    #[serde(default)]
    is_input: bool,
    #[serde(default)]
    is_quantitative_reference: bool,
    #[serde(default)]
    amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount_formula: Option<String>,
    flow: Ref,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<Ref>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dq_entry: Option<String>,
}

impl Exchange {
    fn unit_name(&self) -> String {
        self.unit
            .as_ref()
            .and_then(|u| u.name.clone())
            .or_else(|| self.flow.ref_unit.clone())
            .unwrap_or_default()
    }

    fn to_record(&self) -> FlowRecord {
        FlowRecord {
            category: self.flow.category.clone().unwrap_or_default(),
            name: self.flow.name.clone().unwrap_or_default(),
            amount: self.amount,
            unit: self.unit_name(),
            dq: self.dq_entry.clone().unwrap_or_default(),
        }
    }
}

/// An openLCA project loaded from a JSON export.
#[derive(Debug, Default)]
pub struct Project {
    path: Option<PathBuf>,
    data: Option<ProjectData>,
    port: u16,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a project directly from JSON text.
    pub fn from_json(text: &str) -> ReportResult<Self> {
        Ok(Self {
            path: None,
            data: Some(serde_json::from_str(text)?),
            port: 0,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Where edits are saved: `<stem>_edited.json` beside the opened file.
    pub fn edited_path(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        let stem = path.file_stem()?.to_string_lossy();
        let name = if stem.ends_with(EDITED_SUFFIX) {
            format!("{}.json", stem)
        } else {
            format!("{}{}.json", stem, EDITED_SUFFIX)
        };
        Some(path.with_file_name(name))
    }

    fn data(&self) -> ReportResult<&ProjectData> {
        self.data
            .as_ref()
            .ok_or_else(|| ReportError::connection("no project is open"))
    }

    fn product_system(&self, scope: &str) -> ReportResult<&ProductSystemRecord> {
        let data = self.data()?;
        if scope.is_empty() {
            return data
                .product_systems
                .first()
                .ok_or_else(|| ReportError::not_found("project has no product systems"));
        }
        data.product_systems
            .iter()
            .find(|ps| ps.id == scope)
            .ok_or_else(|| ReportError::not_found(format!("product system '{}'", scope)))
    }

    fn process_index(&self, scope: &str) -> ReportResult<usize> {
        let system = self.product_system(scope)?;
        let process_id = system.ref_process.id.as_deref().unwrap_or_default();
        self.data()?
            .processes
            .iter()
            .position(|p| p.id == process_id)
            .ok_or_else(|| {
                ReportError::not_found(format!(
                    "reference process of product system '{}'",
                    system.name
                ))
            })
    }

    fn process(&self, scope: &str) -> ReportResult<&ProcessRecord> {
        let index = self.process_index(scope)?;
        Ok(&self.data()?.processes[index])
    }

    fn flows(&self, scope: &str, inputs: bool) -> ReportResult<Option<Vec<FlowRecord>>> {
        let process = self.process(scope)?;
        let flows: Vec<FlowRecord> = process
            .exchanges
            .iter()
            .filter(|e| e.is_input == inputs)
            .map(Exchange::to_record)
            .collect();
        Ok(Some(flows).filter(|f| !f.is_empty()))
    }

    fn save_edits(&self) -> ReportResult<()> {
        let data = self.data()?;
        let path = self
            .edited_path()
            .ok_or_else(|| ReportError::not_found("no project file to save edits beside"))?;
        let text = serde_json::to_string_pretty(data)?;
        fs::write(&path, text).map_err(|e| ReportError::io(&path, e))?;
        info!(path = %path.display(), "project edits saved");
        Ok(())
    }

    /// Edits are only persisted for projects opened from a file.
    fn persist(&self) -> ReportResult<()> {
        if self.path.is_some() {
            self.save_edits()
        } else {
            Ok(())
        }
    }
}

/// Global parameters named by the process's formulas, followed transitively
/// through the formulas of the globals themselves.
fn referenced_globals<'a>(process: &ProcessRecord, globals: &'a [Parameter]) -> Vec<&'a Parameter> {
    let mut pending: Vec<String> = process
        .parameters
        .iter()
        .filter_map(|p| p.formula.clone())
        .chain(process.exchanges.iter().filter_map(|e| e.amount_formula.clone()))
        .collect();
    let mut names = BTreeSet::new();

    while let Some(formula) = pending.pop() {
        for token in RE_IDENTIFIER.find_iter(&formula) {
            let name = token.as_str();
            if names.contains(name) {
                continue;
            }
            if let Some(global) = globals.iter().find(|g| g.name == name) {
                names.insert(name.to_string());
                if let Some(f) = &global.formula {
                    pending.push(f.clone());
                }
            }
        }
    }

    globals.iter().filter(|g| names.contains(&g.name)).collect()
}

impl DataSource for Project {
    fn open(&mut self, path: &Path) -> ReportResult<()> {
        let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let data: ProjectData = serde_json::from_str(&text)?;
        debug!(
            path = %path.display(),
            processes = data.processes.len(),
            "project opened"
        );
        self.data = Some(data);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn connect(&mut self, port: u16) -> ReportResult<()> {
        Err(ReportError::connection(format!(
            "Failed to connect to IPC server on port {}",
            port
        )))
    }

    fn read(&mut self) -> ReportResult<()> {
        let data = self.data()?;
        let resolves = data.product_systems.iter().any(|ps| {
            data.processes
                .iter()
                .any(|p| Some(p.id.as_str()) == ps.ref_process.id.as_deref())
        });
        if !resolves {
            return Err(ReportError::not_found(
                "no product system points to a process in this project",
            ));
        }
        Ok(())
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    fn spec_ids(&self, class: EntityClass) -> ReportResult<Vec<String>> {
        let data = self.data()?;
        let ids = match class {
            EntityClass::ProductSystem => data.product_systems.iter().map(|p| p.id.clone()).collect(),
            EntityClass::Process => data.processes.iter().map(|p| p.id.clone()).collect(),
            EntityClass::Actor => data.actors.iter().map(|a| a.id.clone()).collect(),
            EntityClass::Source => data.sources.iter().filter_map(|s| s.id.clone()).collect(),
            EntityClass::Parameter => data.parameters.iter().map(|p| p.name.clone()).collect(),
        };
        Ok(ids)
    }

    fn product_systems(&self) -> ReportResult<Vec<Descriptor>> {
        Ok(self
            .data()?
            .product_systems
            .iter()
            .map(|ps| Descriptor {
                id: ps.id.clone(),
                name: ps.name.clone(),
            })
            .collect())
    }

    fn reference_process(&self, scope: &str) -> ReportResult<Option<Descriptor>> {
        match self.process(scope) {
            Ok(p) => Ok(Some(Descriptor {
                id: p.id.clone(),
                name: p.name.clone(),
            })),
            Err(ReportError::NotFound(_)) if self.product_system(scope).is_ok() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn reference_name(&self, scope: &str) -> ReportResult<Option<String>> {
        Ok(Some(self.process(scope)?.name.clone()))
    }

    fn reference_flow(&self, scope: &str) -> ReportResult<Option<String>> {
        let process = self.process(scope)?;
        Ok(process
            .exchanges
            .iter()
            .find(|e| e.is_quantitative_reference)
            .map(|e| {
                format!(
                    "{} {} {}",
                    e.amount,
                    e.unit_name(),
                    e.flow.name.as_deref().unwrap_or_default()
                )
            }))
    }

    fn reference_description(&self, scope: &str) -> ReportResult<Option<String>> {
        Ok(self.process(scope)?.description.clone())
    }

    fn reference_category(&self, scope: &str) -> ReportResult<Option<String>> {
        Ok(self.process(scope)?.category.clone())
    }

    fn input_flows(&self, scope: &str) -> ReportResult<Option<Vec<FlowRecord>>> {
        self.flows(scope, true)
    }

    fn output_flows(&self, scope: &str) -> ReportResult<Option<Vec<FlowRecord>>> {
        self.flows(scope, false)
    }

    fn allocation_info(&self, scope: &str) -> ReportResult<AllocationInfo> {
        let process = self.process(scope)?;
        Ok(AllocationInfo {
            factors: process.allocation_factors.clone(),
            default_method: process.default_allocation_method,
        })
    }

    fn location(&self, scope: &str) -> ReportResult<Option<String>> {
        Ok(self
            .process(scope)?
            .location
            .as_ref()
            .and_then(|l| l.name.clone()))
    }

    fn process_doc(&self, scope: &str) -> ReportResult<Option<ProcessDoc>> {
        Ok(self.process(scope)?.process_documentation.clone())
    }

    fn process_parameters(&self, scope: &str) -> ReportResult<Vec<Parameter>> {
        let process = self.process(scope)?;
        let globals = &self.data()?.parameters;

        let mut params: Vec<Parameter> = process
            .parameters
            .iter()
            .cloned()
            .map(|mut p| {
                p.parameter_scope = ParameterScope::ProcessScope;
                p
            })
            .collect();
        params.extend(referenced_globals(process, globals).into_iter().cloned().map(|mut p| {
            p.parameter_scope = ParameterScope::GlobalScope;
            p
        }));
        Ok(params)
    }

    fn sources(&self, scope: &str) -> ReportResult<Vec<Source>> {
        let process = self.process(scope)?;
        let known = &self.data()?.sources;
        let refs = process
            .process_documentation
            .as_ref()
            .map(|doc| doc.sources.as_slice())
            .unwrap_or_default();

        Ok(refs
            .iter()
            .map(|r| {
                known
                    .iter()
                    .find(|s| s.id.is_some() && s.id == r.id)
                    .cloned()
                    .unwrap_or_else(|| Source {
                        id: r.id.clone(),
                        name: r.name.clone().unwrap_or_default(),
                        ..Source::default()
                    })
            })
            .collect())
    }

    fn actors(&self) -> ReportResult<Vec<Actor>> {
        Ok(self.data()?.actors.clone())
    }

    fn find_actor(&self, id: &str) -> ReportResult<Option<Actor>> {
        Ok(self.data()?.actors.iter().find(|a| a.id == id).cloned())
    }

    fn add_actor(&mut self, mut actor: Actor) -> ReportResult<()> {
        if actor.id.is_empty() {
            actor.id = uuid::Uuid::new_v4().to_string();
        }
        let data = self
            .data
            .as_mut()
            .ok_or_else(|| ReportError::connection("no project is open"))?;
        match data.actors.iter_mut().find(|a| a.id == actor.id) {
            Some(existing) => *existing = actor,
            None => data.actors.push(actor),
        }
        self.persist()
    }

    fn set_reviewer(&mut self, scope: &str, actor_id: &str) -> ReportResult<()> {
        let actor = self
            .find_actor(actor_id)?
            .ok_or_else(|| ReportError::not_found(format!("actor '{}'", actor_id)))?;
        let index = self.process_index(scope)?;

        if let Some(data) = self.data.as_mut() {
            let process = &mut data.processes[index];
            process
                .process_documentation
                .get_or_insert_with(ProcessDoc::default)
                .reviewer = Some(actor.to_ref());
        }
        self.persist()
    }
}

/// Read the actor list of a working directory's `actors.yaml`.
pub fn load_actor_yaml(path: &Path) -> ReportResult<Vec<Actor>> {
    let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Files directly inside `dir` whose extension is one of `extensions`
/// (lower case, without the dot), sorted by path.
pub fn find_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| extensions.contains(&ext.to_string_lossy().to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
