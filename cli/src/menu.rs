//! The option table behind every menu of the interactive shell.

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Option,
    ConnectionJson,
    ConnectionOlca,
    Query,
    Report,
    Publish,
    Edit,
    Misc,
}

impl Category {
    pub fn title(&self) -> &'static str {
        match self {
            Category::Option => "MAIN MENU: Select an option",
            Category::ConnectionJson | Category::ConnectionOlca => {
                "CONNECTION MENU: Select an option"
            }
            Category::Query => "REVIEW MENU: Select an option",
            Category::Report => "REPORT MENU: Select an option",
            Category::Publish => "PUBLISHING MENU: Select an option",
            Category::Edit => "EDIT MENU: Select an option",
            Category::Misc => "MISCELLANY MENU: Select an option",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishFormat {
    Pdf,
    Word,
    Html,
}

impl PublishFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PublishFormat::Pdf => "pdf",
            PublishFormat::Word => "docx",
            PublishFormat::Html => "html",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PublishFormat::Pdf => "PDF",
            PublishFormat::Word => "Word",
            PublishFormat::Html => "HTML",
        }
    }
}

/// What selecting an option does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ConnectJson,
    ShowMenu(Category),
    AssignWorkingDir,
    AssignProjectFile,
    AssignServerPort,
    OpenServer,
    QueryDescription,
    QueryDocumentation,
    QueryCategory,
    QueryFlows,
    DisplayReport,
    WriteReport,
    ReadReport,
    BlankTemplate,
    PublishMenu,
    Publish(PublishFormat),
    AssignProcessType,
    AssignCalculationFile,
    AddActor,
    EditReviewer,
    AssignProductSystem,
    Quit,
}

/// Session value printed under an option's help text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dump {
    WorkingDir,
    ProjectFile,
    ServerPort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption {
    pub code: &'static str,
    pub name: &'static str,
    pub text: String,
    pub category: Category,
    pub visible: bool,
    pub action: Action,
    pub dump: Option<Dump>,
    pub help: &'static str,
}

/// Codes hidden after a successful connection
pub const CONNECT_HIDE: [&str; 2] = ["1", "2"];

/// Codes revealed after a successful connection
pub const CONNECT_SHOW: [&str; 6] = ["3", "4", "5", "6", "7", "o"];

/// Conversion entries of the publishing menu
pub const PUBLISH_ACTIONS: [&str; 3] = ["5a", "5b", "5c"];

#[derive(Debug, Clone)]
pub struct Menu {
    options: BTreeMap<String, MenuOption>,
}

impl Menu {
    /// The full option table; `data_dir` appears as the directory default.
    pub fn standard(data_dir: &Path) -> Self {
        use Action::*;
        use Category as C;

        let rows = [
            ("1", "CONNECT TO JSON-LD", "connect to JSON-LD".to_string(), C::Option, true, ConnectJson, None,
             "Connect to a JSON-LD project file in your data directory."),
            ("1a", "SET DIRECTORY", format!("change data directory (default \"{}\")", data_dir.display()), C::ConnectionJson, true, AssignWorkingDir, Some(Dump::WorkingDir),
             "Type the path to the folder on your computer where your openLCA JSON-LD project files are located."),
            ("1b", "OPEN JSON-LD FILE", "select JSON-LD file from data directory".to_string(), C::ConnectionJson, true, AssignProjectFile, Some(Dump::ProjectFile),
             "Open an openLCA project from a JSON-LD file."),
            ("2", "CONNECT TO OPENLCA", "connect to openLCA".to_string(), C::Option, true, ShowMenu(C::ConnectionOlca), None,
             "Connect to a running openLCA database (e.g., through the IPC service)."),
            ("2a", "SET IPC SERVER PORT", "define the server port number".to_string(), C::ConnectionOlca, true, AssignServerPort, Some(Dump::ServerPort),
             "Set the port number of the openLCA IPC server."),
            ("2b", "OPEN IPC SERVER", "connect to openLCA server".to_string(), C::ConnectionOlca, true, OpenServer, None,
             "Connect to an openLCA project through the IPC server."),
            ("3", "REVIEW DATA", "review data".to_string(), C::Option, false, ShowMenu(C::Query), None,
             "Open the review data menu."),
            ("3a", "DESCRIPTION", "review process description".to_string(), C::Query, true, QueryDescription, None,
             "Show the unit process description."),
            ("3b", "DOCUMENTATION", "review process documentation".to_string(), C::Query, true, QueryDocumentation, None,
             "Show the unit process documentation."),
            ("3c", "CATEGORY", "review process category".to_string(), C::Query, true, QueryCategory, None,
             "Show the unit process category."),
            ("3d", "FLOW", "review process flows".to_string(), C::Query, true, QueryFlows, None,
             "Show the unit process input and output flows."),
            ("4", "GENERATE REPORT", "generate report".to_string(), C::Option, false, ShowMenu(C::Report), None,
             "Generate a detailed report of the current unit process."),
            ("4a", "DISPLAY REPORT", "Display a draft of the report template".to_string(), C::Report, true, DisplayReport, None,
             "Show the generated report on screen."),
            ("4b", "WRITE REPORT", "Write report template to file".to_string(), C::Report, true, WriteReport, None,
             "Write the report as a plain text file in markdown format."),
            ("4c", "READ REPORT", "Read report template from file".to_string(), C::Report, true, ReadReport, None,
             "Read an existing markdown report back from the output directory."),
            ("4d", "BLANK TEMPLATE", "Write a blank report template to file".to_string(), C::Report, true, BlankTemplate, None,
             "Write the empty report skeleton for manual editing."),
            ("5", "PUBLISH REPORT", "publish report".to_string(), C::Option, false, PublishMenu, None,
             "Publish the report to a document format (e.g., .docx, .pdf, or .html)."),
            ("5a", "TO PDF", "publish report as .pdf".to_string(), C::Publish, true, Publish(PublishFormat::Pdf), None,
             "Convert the markdown report to PDF."),
            ("5b", "TO WORD", "publish report as .docx".to_string(), C::Publish, true, Publish(PublishFormat::Word), None,
             "Convert the markdown report to Microsoft Word format."),
            ("5c", "TO HTML", "publish report as .html".to_string(), C::Publish, true, Publish(PublishFormat::Html), None,
             "Convert the markdown report to a standalone HTML page."),
            ("6", "PROCESS TYPE", "choose process type".to_string(), C::Option, false, AssignProcessType, None,
             "Select the process type (e.g., EP, MP, BP, IP, EC, TP, RP, WT, AP)."),
            ("7", "CALCULATION WORKBOOK", "choose calculation workbook".to_string(), C::Option, false, AssignCalculationFile, None,
             "Select an Excel workbook with supplemental calculations to add to your report."),
            ("o", "OTHER OPTIONS", "other options".to_string(), C::Option, false, ShowMenu(C::Misc), None,
             "Open the other options menu (e.g., editing and changing the unit process)."),
            ("e", "EDIT PROCESS", "edit process".to_string(), C::Misc, true, ShowMenu(C::Edit), None,
             "Open the edit menu. Edits are saved next to the opened project file."),
            ("e1", "ADD ACTOR", "add new person or organization".to_string(), C::Edit, true, AddActor, None,
             "Add an actor listed in actors.yaml to the project."),
            ("e2", "EDIT REVIEWER", "edit reviewer".to_string(), C::Edit, true, EditReviewer, None,
             "Edit the reviewer in the process documentation."),
            ("p", "CHANGE UNIT PROCESS", "select product system".to_string(), C::Misc, true, AssignProductSystem, None,
             "Select the product system that represents the unit process to review and report."),
            ("m", "MAIN MENU", "main menu".to_string(), C::Option, false, ShowMenu(C::Option), None,
             "Open the main menu."),
            ("q", "QUIT", "quit".to_string(), C::Option, false, Quit, None,
             "Use this command any time to exit the program."),
        ];

        let options = rows
            .into_iter()
            .map(|(code, name, text, category, visible, action, dump, help)| {
                let option = MenuOption {
                    code,
                    name,
                    text,
                    category,
                    visible,
                    action,
                    dump,
                    help,
                };
                (code.to_string(), option)
            })
            .collect();

        Self { options }
    }

    pub fn get(&self, code: &str) -> Option<&MenuOption> {
        self.options.get(code)
    }

    pub fn options(&self) -> impl Iterator<Item = &MenuOption> {
        self.options.values()
    }

    pub fn is_visible(&self, code: &str) -> bool {
        self.options.get(code).map(|o| o.visible).unwrap_or(false)
    }

    /// Show or hide every conversion entry at once.
    pub fn set_publishing(&mut self, enabled: bool) -> Result<()> {
        let changes: Vec<(&str, bool)> =
            PUBLISH_ACTIONS.iter().map(|code| (*code, enabled)).collect();
        self.apply_visibility(&changes)
    }

    /// Apply a batch of visibility changes: nothing changes unless every
    /// code is known.
    pub fn apply_visibility(&mut self, changes: &[(&str, bool)]) -> Result<()> {
        if let Some((code, _)) = changes.iter().find(|(code, _)| !self.options.contains_key(*code)) {
            bail!("Parameter '{}' not found", code);
        }
        for (code, visible) in changes {
            if let Some(option) = self.options.get_mut(*code) {
                option.visible = *visible;
            }
        }
        Ok(())
    }

    /// Hide the connection entries and reveal the data entries.
    pub fn show_connected(&mut self) -> Result<()> {
        let changes: Vec<(&str, bool)> = CONNECT_HIDE
            .iter()
            .map(|code| (*code, false))
            .chain(CONNECT_SHOW.iter().map(|code| (*code, true)))
            .collect();
        self.apply_visibility(&changes)
    }

    /// Visible options of a category in code order, plus the navigation
    /// entries (`m` and `q` for sub-menus, `q` for the main menu).
    pub fn listing(&self, category: Category) -> Vec<&MenuOption> {
        let mut listing: Vec<&MenuOption> = self
            .options
            .values()
            .filter(|o| o.category == category && o.visible)
            .collect();

        let navigation: &[&str] = if category == Category::Option {
            &["q"]
        } else {
            &["m", "q"]
        };
        listing.extend(navigation.iter().filter_map(|code| self.options.get(*code)));
        listing
    }

    /// Rendered menu lines, `" 1 ..... connect to JSON-LD"`.
    pub fn lines(&self, category: Category) -> Vec<String> {
        self.listing(category)
            .into_iter()
            .map(|o| format!("{:>2} ..... {}", o.code, o.text))
            .collect()
    }
}
