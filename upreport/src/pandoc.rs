use crate::error::ReportError;
use crate::source::Converter;
use crate::ReportResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

const HTML_STYLESHEET: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/concrete.css/3.0.0/concrete.min.css";

/// Document conversion through the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: OsString,
    template_dir: PathBuf,
}

impl Pandoc {
    /// `template_dir` may hold `before_body.html`, `after_body.html` and
    /// `template.docx`; each is used only when present.
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("pandoc"),
            template_dir: template_dir.into(),
        }
    }

    fn template(&self, name: &str) -> Option<PathBuf> {
        let path = self.template_dir.join(name);
        path.is_file().then_some(path)
    }

    /// Command-line arguments after the program name.
    pub fn arguments(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.into(),
            "--output".into(),
            output.into(),
        ];

        let ext = output
            .extension()
            .map(|e| e.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        match ext.as_str() {
            "HTML" => {
                for flag in ["--standalone", "--embed-resources", "--section-divs", "--css"] {
                    args.push(flag.into());
                }
                args.push(HTML_STYLESHEET.into());
                args.push("--mathjax".into());
                if let Some(before) = self.template("before_body.html") {
                    args.push("--include-before-body".into());
                    args.push(before.into());
                }
                if let Some(after) = self.template("after_body.html") {
                    args.push("--include-after-body".into());
                    args.push(after.into());
                }
            }
            "DOCX" => {
                if let Some(reference) = self.template("template.docx") {
                    args.push("--reference-doc".into());
                    args.push(reference.into());
                }
            }
            _ => {}
        }
        args
    }
}

impl Converter for Pandoc {
    fn is_installed(&self) -> bool {
        let found = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok();
        if !found {
            warn!("pandoc is not installed");
        }
        found
    }

    fn convert(&self, input: &Path, output: &Path) -> ReportResult<()> {
        if !input.is_file() {
            return Err(ReportError::not_found(format!(
                "Input file, {}, missing!",
                input.display()
            )));
        }
        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;
        }

        let args = self.arguments(input, output);
        debug!(?args, "running pandoc");
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| {
                ReportError::conversion(format!(
                    "Ensure pandoc is installed and accessible. {}",
                    e
                ))
            })?;

        if !status.success() {
            let target = output
                .extension()
                .map(|e| e.to_string_lossy().to_uppercase())
                .unwrap_or_default();
            return Err(ReportError::conversion(format!(
                "An error occurred while converting to {}. {}",
                target, status
            )));
        }
        Ok(())
    }
}
