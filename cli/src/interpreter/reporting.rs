use super::Interpreter;
use crate::menu::{Category, PublishFormat};
use tracing::{info, warn};

impl Interpreter {
    pub(crate) fn display_report(&mut self) {
        match self.report.markdown() {
            Some(md) => {
                let md = md.to_string();
                self.console.line(&md);
            }
            None => self
                .console
                .line("Please read or write report to file first."),
        }
    }

    /// Fetch, attach calculations, and write the markdown report.
    pub(crate) fn write_report(&mut self) {
        let scope = self.session.product_system.clone();
        if let Err(e) = self.report.fetch(self.source.as_ref(), &scope) {
            warn!(error = %e, "report fetch failed");
            self.console
                .line(&format!("Error during report generation: {}", e));
            return;
        }

        if let Some(path) = self.session.calc_file.clone() {
            if let Err(e) = self.report.load_calculations(self.tables.as_ref(), &path) {
                warn!(error = %e, path = %path.display(), "calculation workbook unreadable");
                self.console
                    .warn("No calculations found or error in reading the workbook.");
            }
        }

        match self.report.save_markdown() {
            Ok(path) => self
                .console
                .line(&format!("Markdown report saved to {}", path.display())),
            Err(e) => self
                .console
                .line(&format!("Error during report generation: {}", e)),
        }
    }

    pub(crate) fn read_report(&mut self) {
        match self.report.read_markdown(None) {
            Ok(_) => self.console.line("Markdown report read."),
            Err(e) => {
                info!(error = %e, "no markdown report to read");
                self.console
                    .warn("Markdown report is not found! Try writing report first.");
            }
        }
    }

    pub(crate) fn write_blank_template(&mut self) {
        match self.report.write_empty_template() {
            Ok(path) => self
                .console
                .line(&format!("Blank report template saved to {}", path.display())),
            Err(e) => self
                .console
                .warn(&format!("Failed to write report template: {}", e)),
        }
    }

    /// Probe the converter before offering the publishing menu; without it
    /// only the navigation entries are listed.
    pub(crate) fn publish_menu(&mut self) {
        let installed = self.converter.is_installed();
        if !installed {
            self.console.line(
                "Pandoc is not installed. Reports in PDF, Word, or HTML format cannot be generated.",
            );
            let answer = match self.next_line("Would you like to continue anyway? (y/n): ") {
                Some(answer) => answer.trim().to_lowercase(),
                None => {
                    self.quit();
                    return;
                }
            };
            if answer == "q" || answer == "quit" {
                self.quit();
                return;
            }
            if answer != "y" && answer != "yes" {
                self.console
                    .line("Okay. You can still view the report from the report menu.");
                return;
            }
        }
        if let Err(e) = self.menu.set_publishing(installed) {
            self.console.warn(&e.to_string());
        }
        self.show_menu(Category::Publish);
    }

    pub(crate) fn publish(&mut self, format: PublishFormat) {
        match self.report.publish(format.extension(), self.converter.as_ref()) {
            Ok(path) => self.console.line(&format!(
                "{} report saved to {}",
                format.label(),
                path.display()
            )),
            Err(e) => {
                warn!(error = %e, format = format.extension(), "publishing failed");
                self.console
                    .warn(&format!("Failed to publish {} report: {}", format.label(), e));
            }
        }
    }
}
