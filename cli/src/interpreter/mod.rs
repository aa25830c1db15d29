//! The menu-driven session loop.

mod assign;
mod reporting;
mod review;

use crate::config::Config;
use crate::console::Console;
use crate::formatter::Formatter;
use crate::input::LineInput;
use crate::menu::{Action, Category, Dump, Menu};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{info, warn};
use upreport::{
    find_files, Actor, Converter, DataSource, Descriptor, Pandoc, Project, Report, TableReader,
    WorkbookReader,
};

pub const PROMPT: &str = "(h for help) > ";

/// Extensions of project files in the working directory
pub const PROJECT_EXTENSIONS: [&str; 1] = ["json"];

pub const WORKBOOK_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

static RE_HELP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h(elp)?\(([a-z0-9]{1,2})\)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Stopped(StopReason),
}

/// Mutable state of one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: RunState,
    /// Drops when the working directory has no project files to offer
    pub okay: bool,
    pub work_dir: PathBuf,
    pub calc_dir: PathBuf,
    pub project_file: Option<PathBuf>,
    /// Product system id; empty means the source's reference system
    pub product_system: String,
    pub calc_file: Option<PathBuf>,
    pub connected: bool,
    /// Menu shown most recently
    pub current: Category,
    project_files: Vec<PathBuf>,
    workbooks: Vec<PathBuf>,
    product_systems: Vec<Descriptor>,
    actors: Vec<Actor>,
}

impl Session {
    fn new(config: &Config) -> Self {
        Self {
            state: RunState::NotStarted,
            okay: true,
            work_dir: config.data_dir.clone(),
            calc_dir: config.calc_dir.clone(),
            project_file: None,
            product_system: String::new(),
            calc_file: None,
            connected: false,
            current: Category::Option,
            project_files: Vec::new(),
            workbooks: Vec::new(),
            product_systems: Vec::new(),
            actors: Vec::new(),
        }
    }
}

pub struct Interpreter {
    session: Session,
    menu: Menu,
    console: Console,
    input: Box<dyn LineInput>,
    source: Box<dyn DataSource>,
    converter: Box<dyn Converter>,
    tables: Box<dyn TableReader>,
    report: Report,
    formatter: Formatter,
}

impl Interpreter {
    /// A session over a file-based project, pandoc and calamine.
    pub fn new(config: &Config, input: Box<dyn LineInput>, console: Console) -> Self {
        let mut project = Project::new();
        project.set_port(config.port);

        Self {
            session: Session::new(config),
            menu: Menu::standard(&config.data_dir),
            console,
            input,
            source: Box::new(project),
            converter: Box::new(Pandoc::new(&config.template_dir)),
            tables: Box::new(WorkbookReader),
            report: Report::new(&config.output_dir),
            formatter: Formatter::new(),
        }
    }

    /// Replace the data source; the configured port carries over.
    pub fn with_source(mut self, mut source: Box<dyn DataSource>) -> Self {
        source.set_port(self.source.port());
        self.source = source;
        self
    }

    pub fn with_converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_tables(mut self, tables: Box<dyn TableReader>) -> Self {
        self.tables = tables;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.session.state == RunState::Running
    }

    /// Run the session until the operator quits or input ends.
    pub fn run(&mut self) -> RunState {
        self.session.state = RunState::Running;
        info!(work_dir = %self.session.work_dir.display(), "session started");

        if !self.session.work_dir.is_dir() {
            self.assign_working_dir();
        }
        if self.is_running() {
            self.show_menu(Category::Option);
        }
        while self.is_running() && self.session.okay {
            self.do_next();
        }

        if self.session.state == RunState::Running {
            warn!("session stopped without project files");
            self.session.state = RunState::Stopped(StopReason::Failed);
        }
        self.session.state
    }

    pub(crate) fn quit(&mut self) {
        if self.is_running() {
            self.console.line("Exiting...");
            self.session.state = RunState::Stopped(StopReason::Quit);
        }
    }

    /// Prompt and read one line; `None` at end of input.
    pub(crate) fn next_line(&mut self, prompt: &str) -> Option<String> {
        self.console.prompt(prompt);
        self.input.read_line()
    }

    /// Read and act on one command.
    pub fn do_next(&mut self) {
        let line = match self.next_line(PROMPT) {
            Some(line) => line,
            None => {
                self.quit();
                return;
            }
        };

        let key = line.trim().to_lowercase();
        if key == "exit" || key == "quit" {
            self.quit();
            return;
        }
        if key.starts_with('h') {
            self.help(&key);
            return;
        }

        match self.menu.get(&key).map(|option| option.action) {
            Some(action) => self.dispatch(action),
            None => {
                self.console.line("Invalid option.");
                self.show_menu(self.session.current);
            }
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::ConnectJson => {
                let found = find_files(&self.session.work_dir, &PROJECT_EXTENSIONS).len();
                info!(found, work_dir = %self.session.work_dir.display(), "scanned working directory");
                self.show_menu(Category::ConnectionJson);
            }
            Action::ShowMenu(category) => self.show_menu(category),
            Action::AssignWorkingDir => {
                self.assign_working_dir();
            }
            Action::AssignProjectFile => self.open_project_file(),
            Action::AssignServerPort => {
                self.assign_server_port();
            }
            Action::OpenServer => self.open_server(),
            Action::QueryDescription => self.query_description(),
            Action::QueryDocumentation => self.query_documentation(),
            Action::QueryCategory => self.query_category(),
            Action::QueryFlows => self.query_flows(),
            Action::DisplayReport => self.display_report(),
            Action::WriteReport => self.write_report(),
            Action::ReadReport => self.read_report(),
            Action::BlankTemplate => self.write_blank_template(),
            Action::PublishMenu => self.publish_menu(),
            Action::Publish(format) => self.publish(format),
            Action::AssignProcessType => {
                self.assign_process_type();
                self.show_menu_if_running(Category::Option);
            }
            Action::AssignCalculationFile => {
                self.assign_calculation_file();
                self.show_menu_if_running(Category::Option);
            }
            Action::AddActor => {
                self.add_actor();
            }
            Action::EditReviewer => {
                self.edit_reviewer();
            }
            Action::AssignProductSystem => {
                self.assign_product_system();
            }
            Action::Quit => self.quit(),
        }
    }

    pub(crate) fn show_menu(&mut self, category: Category) {
        self.session.current = category;
        self.console.banner(category.title());
        for line in self.menu.lines(category) {
            self.console.line(&line);
        }
    }

    pub(crate) fn show_menu_if_running(&mut self, category: Category) {
        if self.is_running() {
            self.show_menu(category);
        }
    }

    fn help(&mut self, text: &str) {
        match RE_HELP.captures(text).and_then(|caps| caps.get(2)) {
            Some(code) => self.show_help(code.as_str()),
            None if text.starts_with("help") => self.console.line("Usage: help(<option>)"),
            None => self.console.line("Usage: h(<option>)"),
        }
    }

    fn show_help(&mut self, code: &str) {
        let (message, dump) = match self.menu.get(code) {
            Some(option) => (format!("{}: {}", option.name, option.help), option.dump),
            None => (format!("ERROR: Option '{}' not recognized.", code), None),
        };
        self.console.messages(&[message], Some(">>"));

        if let Some(dump) = dump {
            let value = self.dump_value(dump);
            self.console.line(&format!("-{} {}", code, value));
        }
    }

    fn dump_value(&self, dump: Dump) -> String {
        match dump {
            Dump::WorkingDir => self.session.work_dir.display().to_string(),
            Dump::ProjectFile => self
                .session
                .project_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "None".to_string()),
            Dump::ServerPort => self.source.port().to_string(),
        }
    }

    /// Flip the menu over to the data options after a connection.
    pub(crate) fn mark_connected(&mut self) {
        match self.menu.show_connected() {
            Ok(()) => {
                self.session.connected = true;
                info!("connected; data options revealed");
            }
            Err(e) => self.console.warn(&e.to_string()),
        }
    }
}
