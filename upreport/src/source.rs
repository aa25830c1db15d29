//! Collaborator interfaces consumed by the report assembler.
//!
//! The assembler and the interactive shell only ever see these traits, so
//! a project file, a live server, or an in-memory fixture can stand behind
//! them interchangeably.

use crate::model::{
    Actor, AllocationInfo, Descriptor, EntityClass, FlowRecord, Parameter, ProcessDoc, Source,
};
use crate::ReportResult;
use std::collections::BTreeMap;
use std::path::Path;

/// A life cycle inventory data source.
///
/// Every `scope` argument is a product system identifier. The empty string
/// means "the source's designated reference product system".
pub trait DataSource {
    /// Open a file-based project.
    fn open(&mut self, path: &Path) -> ReportResult<()>;

    /// Connect to a live project server on the given local port.
    fn connect(&mut self, port: u16) -> ReportResult<()>;

    /// Read the opened or connected project so that queries can be answered.
    fn read(&mut self) -> ReportResult<()>;

    fn port(&self) -> u16;

    fn set_port(&mut self, port: u16);

    /// Identifiers of every entity of the given class, in source order.
    fn spec_ids(&self, class: EntityClass) -> ReportResult<Vec<String>>;

    fn product_systems(&self) -> ReportResult<Vec<Descriptor>>;

    /// The unit process a product system points to.
    fn reference_process(&self, scope: &str) -> ReportResult<Option<Descriptor>>;

    fn reference_name(&self, scope: &str) -> ReportResult<Option<String>>;

    fn reference_flow(&self, scope: &str) -> ReportResult<Option<String>>;

    fn reference_description(&self, scope: &str) -> ReportResult<Option<String>>;

    fn reference_category(&self, scope: &str) -> ReportResult<Option<String>>;

    fn input_flows(&self, scope: &str) -> ReportResult<Option<Vec<FlowRecord>>>;

    fn output_flows(&self, scope: &str) -> ReportResult<Option<Vec<FlowRecord>>>;

    fn allocation_info(&self, scope: &str) -> ReportResult<AllocationInfo>;

    fn location(&self, scope: &str) -> ReportResult<Option<String>>;

    fn process_doc(&self, scope: &str) -> ReportResult<Option<ProcessDoc>>;

    /// Process parameters plus the global parameters the process references.
    fn process_parameters(&self, scope: &str) -> ReportResult<Vec<Parameter>>;

    fn sources(&self, scope: &str) -> ReportResult<Vec<Source>>;

    fn actors(&self) -> ReportResult<Vec<Actor>>;

    fn find_actor(&self, id: &str) -> ReportResult<Option<Actor>>;

    fn add_actor(&mut self, actor: Actor) -> ReportResult<()>;

    /// Point the reviewer of the scoped process at an existing actor.
    fn set_reviewer(&mut self, scope: &str, actor_id: &str) -> ReportResult<()>;
}

/// Converts a markdown report into another document format.
pub trait Converter {
    fn is_installed(&self) -> bool;

    /// Convert `input` to `output`; the output extension selects the format.
    fn convert(&self, input: &Path, output: &Path) -> ReportResult<()>;
}

/// One spreadsheet row keyed by column header; empty cells are absent.
pub type TableRow = BTreeMap<String, String>;

/// Reads a named sheet of a tabular workbook.
pub trait TableReader {
    fn read_table(&self, path: &Path, sheet: &str) -> ReportResult<Vec<TableRow>>;
}
