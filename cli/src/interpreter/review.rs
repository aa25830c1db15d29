use super::Interpreter;
use upreport::format::NO_FLOW_DATA;
use upreport::FlowRecord;

impl Interpreter {
    /// Scope of every query; warns when falling back to the reference system.
    fn query_scope(&mut self) -> String {
        if self.session.product_system.is_empty() {
            self.console.warn("Assuming the reference product system");
        }
        self.session.product_system.clone()
    }

    pub(crate) fn query_description(&mut self) {
        let scope = self.query_scope();
        match self.source.reference_description(&scope) {
            Ok(description) => {
                let message = format!(
                    "DESCRIPTION:\n{}",
                    description.as_deref().unwrap_or("N/A")
                );
                self.console.messages(&[message], Some(">>"));
            }
            Err(e) => self.console.warn(&format!("Failed to read description: {}", e)),
        }
    }

    pub(crate) fn query_documentation(&mut self) {
        let scope = self.query_scope();
        let doc = match self.source.process_doc(&scope) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                self.console.line("No process documentation available.");
                return;
            }
            Err(e) => {
                self.console
                    .warn(&format!("Failed to read documentation: {}", e));
                return;
            }
        };

        match serde_yaml::to_string(&doc) {
            Ok(yaml) => {
                self.console.line("DOCUMENTATION:");
                self.console.line(yaml.trim_end());
            }
            Err(e) => self
                .console
                .warn(&format!("Failed to read documentation: {}", e)),
        }
    }

    pub(crate) fn query_category(&mut self) {
        let scope = self.query_scope();
        match self.source.reference_category(&scope) {
            Ok(category) => {
                let message = format!("CATEGORY:\n{}", category.as_deref().unwrap_or("N/A"));
                self.console.messages(&[message], Some(">>"));
            }
            Err(e) => self.console.warn(&format!("Failed to read category: {}", e)),
        }
    }

    fn flow_section(&mut self, title: &str, flows: Option<Vec<FlowRecord>>) {
        self.console.line(title);
        match flows.filter(|flows| !flows.is_empty()) {
            Some(flows) => {
                let table = self.formatter.format_flows(&flows);
                self.console.line(&table);
            }
            None => self.console.line(NO_FLOW_DATA),
        }
    }

    pub(crate) fn query_flows(&mut self) {
        let scope = self.query_scope();
        let flows = self
            .source
            .input_flows(&scope)
            .and_then(|inputs| Ok((inputs, self.source.output_flows(&scope)?)));

        match flows {
            Ok((inputs, outputs)) => {
                self.flow_section("INPUT FLOWS:", inputs);
                self.flow_section("OUTPUT FLOWS:", outputs);
            }
            Err(e) => self.console.warn(&format!("Failed to read flows: {}", e)),
        }
    }
}
