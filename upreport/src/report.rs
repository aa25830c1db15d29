use crate::error::ReportError;
use crate::format;
use crate::model::ProcessType;
use crate::source::{Converter, DataSource, TableReader};
use crate::template;
use crate::ReportResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sheet of a calculation workbook that holds the calculation rows
pub const CALCULATION_SHEET: &str = "Calculations";

pub const TEMPLATE_FILE_NAME: &str = "report_template.md";

/// Every slot of the report template, already formatted as markdown.
///
/// `None` means "not available"; the template supplies the fallback text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFields {
    pub reference_name: Option<String>,
    pub reference_flow: Option<String>,
    pub reference_description: Option<String>,
    pub input_flows: Option<String>,
    pub output_flows: Option<String>,
    pub allocation: Option<String>,
    pub parameters: Option<String>,
    pub process_doc: Option<String>,
    pub location: Option<String>,
    pub boundary: Option<String>,
    pub goal_scope: Option<String>,
    pub point_of_contact: Option<String>,
    pub sources: Vec<String>,
    pub calculations: Option<String>,
    pub create_date: Option<String>,
    pub version: Option<String>,
}

/// Assembles a unit process report from a data source.
///
/// Field state only changes through [`Report::fetch`] and the explicit
/// setters; [`Report::render`] is a pure function of that state.
#[derive(Debug, Clone)]
pub struct Report {
    fields: ReportFields,
    process_type: ProcessType,
    output_dir: PathBuf,
    disclaimer: String,
    fetched: bool,
    md: Option<String>,
}

impl Report {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fields: ReportFields::default(),
            process_type: ProcessType::default(),
            output_dir: output_dir.into(),
            disclaimer: template::DISCLAIMER.to_string(),
            fetched: false,
            md: None,
        }
    }

    pub fn fields(&self) -> &ReportFields {
        &self.fields
    }

    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    /// The most recently generated, written or read markdown
    pub fn markdown(&self) -> Option<&str> {
        self.md.as_deref()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn process_type(&self) -> ProcessType {
        self.process_type
    }

    /// Used by the documentation table on the next fetch.
    pub fn set_process_type(&mut self, process_type: ProcessType) {
        self.process_type = process_type;
    }

    /// Name used for report file names before the next fetch.
    pub fn set_reference_name(&mut self, name: Option<String>) {
        self.fields.reference_name = name;
    }

    pub fn set_calculations(&mut self, text: Option<String>) {
        self.fields.calculations = text.filter(|t| !t.is_empty());
    }

    /// Read the calculation sheet of a workbook into the Calculations section.
    pub fn load_calculations(&mut self, reader: &dyn TableReader, path: &Path) -> ReportResult<()> {
        let rows = reader.read_table(path, CALCULATION_SHEET)?;
        debug!(rows = rows.len(), path = %path.display(), "read calculation workbook");
        self.set_calculations(Some(format::calculations_text(&rows)));
        Ok(())
    }

    /// Pull every report field for the product system `scope`.
    ///
    /// On error the previously committed fields are kept and the report is
    /// marked as not fetched.
    pub fn fetch(&mut self, source: &dyn DataSource, scope: &str) -> ReportResult<()> {
        match self.stage(source, scope) {
            Ok(mut staged) => {
                staged.create_date = Some(chrono::Local::now().date_naive().to_string());
                self.fields = staged;
                self.fetched = true;
                info!(scope, "report data fetched");
                Ok(())
            }
            Err(e) => {
                self.fetched = false;
                Err(e)
            }
        }
    }

    fn stage(&self, source: &dyn DataSource, scope: &str) -> ReportResult<ReportFields> {
        let mut staged = self.fields.clone();

        staged.reference_name = source.reference_name(scope)?;
        staged.reference_flow = source.reference_flow(scope)?;
        staged.reference_description = source.reference_description(scope)?;

        staged.input_flows = source
            .input_flows(scope)?
            .filter(|flows| !flows.is_empty())
            .map(|flows| format::flow_table(Some(flows.as_slice())));
        staged.output_flows = source
            .output_flows(scope)?
            .filter(|flows| !flows.is_empty())
            .map(|flows| format::flow_table(Some(flows.as_slice())));

        staged.allocation = Some(format::allocation_text(&source.allocation_info(scope)?));
        staged.location = source.location(scope)?;

        match source.process_doc(scope)? {
            Some(doc) => {
                staged.boundary = doc.data_selection_description.clone();
                staged.goal_scope = doc.project_description.clone();
                staged.point_of_contact = doc.data_set_owner.as_ref().and_then(|o| o.name.clone());
                staged.process_doc = Some(format::process_doc_table(
                    &doc,
                    staged.location.as_deref(),
                    self.process_type,
                ));
            }
            None => {
                staged.boundary = None;
                staged.goal_scope = None;
                staged.point_of_contact = None;
                staged.process_doc = None;
            }
        }

        let parameters = format::parameter_section(&source.process_parameters(scope)?);
        staged.parameters = Some(parameters).filter(|p| !p.is_empty());

        staged.sources = source
            .sources(scope)?
            .iter()
            .map(format::citation)
            .collect();

        Ok(staged)
    }

    /// Fill the template from the current fields.
    pub fn render(&self) -> String {
        template::render(&self.fields, &self.disclaimer)
    }

    /// Render and cache the report; requires a successful fetch.
    pub fn generate(&mut self) -> ReportResult<&str> {
        if !self.fetched {
            return Err(ReportError::NotFetched);
        }
        let md = self.render();
        Ok(self.md.insert(md).as_str())
    }

    pub fn file_name(&self, ext: &str) -> ReportResult<String> {
        format::file_name(self.fields.reference_name.as_deref(), ext)
    }

    /// Output directory joined with [`Report::file_name`].
    pub fn file_path(&self, ext: &str) -> ReportResult<PathBuf> {
        Ok(self.output_dir.join(self.file_name(ext)?))
    }

    fn ensure_output_dir(&self) -> ReportResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ReportError::io(&self.output_dir, e))
    }

    /// Re-render and write the markdown report, replacing any earlier file.
    pub fn save_markdown(&mut self) -> ReportResult<PathBuf> {
        let path = self.file_path("md")?;
        self.ensure_output_dir()?;

        let md = self.render();
        fs::write(&path, &md).map_err(|e| ReportError::io(&path, e))?;
        self.md = Some(md);

        info!(path = %path.display(), "markdown report saved");
        Ok(path)
    }

    /// Read a markdown report, defaulting to this report's own file.
    ///
    /// Trailing whitespace is stripped from every line and each line ends
    /// with `\n`.
    pub fn read_markdown(&mut self, path: Option<&Path>) -> ReportResult<&str> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.file_path("md")?,
        };
        let text = fs::read_to_string(&path).map_err(|e| ReportError::io(&path, e))?;
        Ok(self.md.insert(normalize_lines(&text)).as_str())
    }

    /// Convert the markdown report to `ext` (pdf, docx or html).
    ///
    /// An existing markdown file is reused as the conversion input; otherwise
    /// it is written first.
    pub fn publish(&mut self, ext: &str, converter: &dyn Converter) -> ReportResult<PathBuf> {
        let target = format::normalize_extension(ext)?;
        if target == ".md" {
            return Err(ReportError::InvalidExtension(target));
        }

        let input = self.file_path("md")?;
        if input.is_file() {
            self.read_markdown(Some(input.as_path()))?;
        } else {
            self.save_markdown()?;
        }

        let output = self.file_path(&target)?;
        converter.convert(&input, &output)?;
        info!(path = %output.display(), "report published");
        Ok(output)
    }

    /// Write the blank report skeleton to the output directory.
    pub fn write_empty_template(&self) -> ReportResult<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(TEMPLATE_FILE_NAME);
        fs::write(&path, template::empty(&self.disclaimer))
            .map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }
}

/// Strip trailing whitespace from each line and end each with `\n`.
pub fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
