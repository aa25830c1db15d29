//! # upreport
//!
//! **Unit process reports from life cycle inventory data**
//!
//! The engine pulls a unit process out of an openLCA-style data source and
//! assembles a structured markdown report from it: flow tables, allocation
//! factors, parameter formulas typeset as LaTeX, process documentation and
//! literature citations. The report can then be published to PDF, Word or
//! HTML through an external converter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upreport::{DataSource, Project, Report, ReportResult};
//! use std::path::Path;
//!
//! fn main() -> ReportResult<()> {
//!     let mut project = Project::new();
//!     project.open(Path::new("data/aluminum.json"))?;
//!     project.read()?;
//!
//!     let mut report = Report::new("output");
//!     report.fetch(&project, "")?;
//!     let path = report.save_markdown()?;
//!     println!("saved {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Collaborators
//!
//! The assembler talks to the outside world only through three traits:
//! [`DataSource`] for inventory data, [`Converter`] for document formats and
//! [`TableReader`] for calculation workbooks. [`Project`], [`Pandoc`] and
//! [`WorkbookReader`] are the stock implementations.

pub mod error;
pub mod format;
pub mod formula;
pub mod model;
pub mod pandoc;
pub mod project;
pub mod report;
pub mod source;
pub mod template;
pub mod workbook;

pub use error::ReportError;
pub use formula::{parse_formula, render_equation, Expr};
pub use model::{
    Actor, AllocationFactor, AllocationGroup, AllocationInfo, AllocationType, Descriptor,
    EntityClass, ExchangeRef, FlowRecord, Parameter, ParameterScope, ProcessDoc, ProcessType, Ref,
    Source, Uncertainty,
};
pub use pandoc::Pandoc;
pub use project::{find_files, load_actor_yaml, Project, ACTOR_FILE_NAME};
pub use report::{Report, ReportFields};
pub use source::{Converter, DataSource, TableReader, TableRow};
pub use workbook::WorkbookReader;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests;
