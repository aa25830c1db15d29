//! Prompted assignment of session values.
//!
//! Every assignable value goes through [`Interpreter::confirm_loop`]: build
//! a request, read an answer, parse it, confirm it with the operator, then
//! commit it.

use super::{Interpreter, PROJECT_EXTENSIONS, WORKBOOK_EXTENSIONS};
use crate::menu::Category;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use upreport::{find_files, load_actor_yaml, ProcessType, ACTOR_FILE_NAME};

/// How an assignment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assigned {
    Committed,
    /// Blank answer
    Skipped,
    /// Nothing to choose from
    Aborted,
    Quit,
}

/// Result of a successful commit
pub(crate) enum Commit {
    Done,
    /// Rebuild the request and ask again without reporting success
    Again,
}

pub(crate) struct Request {
    text: String,
    /// Number of enumerated choices; zero for free text
    choices: usize,
    /// Answer used without prompting or confirming
    preset: Option<String>,
}

impl Request {
    pub(crate) fn text(prompt: String) -> Self {
        Self {
            text: prompt,
            choices: 0,
            preset: None,
        }
    }

    pub(crate) fn choice(text: String, choices: usize) -> Self {
        Self {
            text,
            choices,
            preset: None,
        }
    }

    fn preset(mut self, answer: &str) -> Self {
        self.preset = Some(answer.to_string());
        self
    }
}

fn file_listing(files: &[PathBuf]) -> String {
    let mut text = String::new();
    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _ = writeln!(text, "{} ... {}", i + 1, name);
    }
    text
}

fn is_quit(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "q" | "quit")
}

impl Interpreter {
    /// Ask `You entered '<v>', is this correct (y/n)?`; `None` stops the session.
    fn confirm(&mut self, value: &str) -> Option<bool> {
        let prompt = format!("You entered '{}', is this correct (y/n)? ", value);
        let answer = self.next_line(&prompt)?;
        let answer = answer.trim().to_lowercase();
        if is_quit(&answer) {
            return None;
        }
        Some(answer == "y" || answer == "yes")
    }

    fn confirm_loop<T, B, P, C>(&mut self, title: &str, build: B, parse: P, commit: C) -> Assigned
    where
        B: Fn(&mut Self) -> Option<Request>,
        P: Fn(&Request, &str) -> Result<T, String>,
        C: Fn(&mut Self, T) -> Result<Commit, String>,
    {
        self.console.banner(title);

        loop {
            if !self.is_running() {
                return Assigned::Quit;
            }
            let request = match build(self) {
                Some(request) => request,
                None => return Assigned::Aborted,
            };

            let preset = request.preset.is_some();
            let raw = match &request.preset {
                Some(answer) => answer.clone(),
                None => match self.next_line(&request.text) {
                    Some(line) => line,
                    None => {
                        self.quit();
                        return Assigned::Quit;
                    }
                },
            };

            let value = raw.trim();
            if is_quit(value) {
                self.quit();
                return Assigned::Quit;
            }
            if value.is_empty() {
                return Assigned::Skipped;
            }

            let parsed = match parse(&request, value) {
                Ok(parsed) => parsed,
                Err(message) => {
                    self.console.warn(&message);
                    continue;
                }
            };

            if !preset {
                match self.confirm(value) {
                    Some(true) => {}
                    Some(false) => {
                        self.console.warn("Entry not confirmed");
                        continue;
                    }
                    None => {
                        self.quit();
                        return Assigned::Quit;
                    }
                }
            }

            match commit(self, parsed) {
                Ok(Commit::Done) => {
                    self.console.success();
                    return Assigned::Committed;
                }
                Ok(Commit::Again) => continue,
                Err(message) => {
                    self.console.warn(&message);
                    if preset {
                        return Assigned::Aborted;
                    }
                }
            }
        }
    }

    pub(crate) fn assign_text<B, C>(&mut self, title: &str, build: B, commit: C) -> Assigned
    where
        B: Fn(&mut Self) -> Option<Request>,
        C: Fn(&mut Self, String) -> Result<Commit, String>,
    {
        self.confirm_loop(title, build, |_, value| Ok(value.to_string()), commit)
    }

    /// Commit receives the zero-based index of the chosen entry.
    pub(crate) fn assign_choice<B, C>(&mut self, title: &str, build: B, commit: C) -> Assigned
    where
        B: Fn(&mut Self) -> Option<Request>,
        C: Fn(&mut Self, usize) -> Result<Commit, String>,
    {
        self.confirm_loop(
            title,
            build,
            |request, value| {
                let selected: usize = value
                    .parse()
                    .map_err(|_| "Selection should be an integer.".to_string())?;
                if selected < 1 || selected > request.choices {
                    return Err(format!("Choose number from 1 to {}", request.choices));
                }
                Ok(selected - 1)
            },
            commit,
        )
    }

    pub(crate) fn assign_working_dir(&mut self) -> Assigned {
        self.assign_text(
            "Enter the directory with your project files",
            |s| {
                Some(Request::text(format!(
                    "working dir ({})> ",
                    s.session.work_dir.display()
                )))
            },
            |s, dir| {
                let path = PathBuf::from(dir);
                if !path.is_dir() {
                    return Err("Working directory must exist".to_string());
                }
                let files = find_files(&path, &PROJECT_EXTENSIONS);
                if files.is_empty() {
                    return Err("No files found in directory".to_string());
                }
                s.console
                    .line(&format!("Read {} files in working directory", files.len()));
                info!(work_dir = %path.display(), "working directory set");
                s.session.work_dir = path;
                Ok(Commit::Done)
            },
        )
    }

    fn assign_project_file(&mut self) -> Assigned {
        self.assign_choice(
            "Select a project file",
            |s| {
                let files = find_files(&s.session.work_dir, &PROJECT_EXTENSIONS);
                if files.is_empty() {
                    s.console.warn("No JSON-LD files");
                    s.session.okay = false;
                    return None;
                }
                let text = format!("{}choose file > ", file_listing(&files));
                let count = files.len();
                s.session.project_files = files;
                Some(Request::choice(text, count))
            },
            |s, index| {
                let path = s
                    .session
                    .project_files
                    .get(index)
                    .cloned()
                    .ok_or("Project file not set!")?;
                s.source
                    .open(&path)
                    .and_then(|()| s.source.read())
                    .map_err(|e| format!("Project file not set! {}", e))?;
                info!(path = %path.display(), "project file opened");
                s.session.project_file = Some(path);
                Ok(Commit::Done)
            },
        )
    }

    /// Open a project file, pick its product system, then reveal the data menus.
    pub(crate) fn open_project_file(&mut self) {
        if self.assign_project_file() == Assigned::Committed
            && self.assign_product_system() == Assigned::Committed
        {
            self.mark_connected();
        }
        self.show_menu_if_running(Category::Option);
    }

    pub(crate) fn assign_server_port(&mut self) -> Assigned {
        self.assign_text(
            "Enter the IPC server port number",
            |s| Some(Request::text(format!("server port ({})> ", s.source.port()))),
            |s, port| {
                let port: u16 = port
                    .parse()
                    .map_err(|_| "Port number not set!".to_string())?;
                s.source.set_port(port);
                Ok(Commit::Done)
            },
        )
    }

    /// Connect to the live source and read it, then pick a product system.
    pub(crate) fn open_server(&mut self) {
        let port = self.source.port();
        let connected = self.source.connect(port).and_then(|()| self.source.read());
        if let Err(e) = connected {
            warn!(port, error = %e, "connection failed");
            self.console
                .warn(&format!("Failed to connect to IPC server on port {}", port));
            return;
        }

        info!(port, "connected to IPC server");
        self.mark_connected();
        self.assign_product_system();
        self.show_menu_if_running(Category::Option);
    }

    pub(crate) fn assign_product_system(&mut self) -> Assigned {
        self.assign_choice(
            "Select the product system of the unit process",
            |s| {
                let systems = match s.source.product_systems() {
                    Ok(systems) => systems,
                    Err(e) => {
                        s.console.warn(&format!("Product system failed to set: {}", e));
                        return None;
                    }
                };
                if systems.is_empty() {
                    s.console.warn("No product systems found");
                    return None;
                }

                let text = format!(
                    "{}\nchoose product system > ",
                    s.formatter
                        .format_product_systems(&systems, &s.session.product_system)
                );
                let count = systems.len();
                s.session.product_systems = systems;
                let request = Request::choice(text, count);
                Some(if count == 1 { request.preset("1") } else { request })
            },
            |s, index| {
                let system = s
                    .session
                    .product_systems
                    .get(index)
                    .cloned()
                    .ok_or("Product system failed to set")?;
                let name = s
                    .source
                    .reference_name(&system.id)
                    .map_err(|e| format!("Product system failed to set: {}", e))?;

                s.console.line(&format!(
                    "Product system set to '{}'",
                    name.as_deref().unwrap_or(&system.name)
                ));
                info!(id = %system.id, "product system selected");
                s.report.set_reference_name(name);
                s.session.product_system = system.id;
                Ok(Commit::Done)
            },
        )
    }

    pub(crate) fn assign_process_type(&mut self) -> Assigned {
        self.assign_text(
            "Select the process type",
            |s| {
                let mut text = String::new();
                for process_type in ProcessType::ALL {
                    let _ = writeln!(text, "{} ... {}", process_type.code(), process_type.label());
                }
                let _ = write!(text, "choose process type ({})> ", s.report.process_type());
                Some(Request::text(text))
            },
            |s, code| {
                let process_type: ProcessType = code
                    .parse()
                    .map_err(|_| "Selection should be a two-letter option.".to_string())?;
                s.report.set_process_type(process_type);
                Ok(Commit::Done)
            },
        )
    }

    pub(crate) fn assign_calculation_file(&mut self) -> Assigned {
        self.assign_choice(
            "Select a calculation workbook",
            |s| {
                let files = find_files(&s.session.calc_dir, &WORKBOOK_EXTENSIONS);
                if files.is_empty() {
                    s.console.warn("No Excel files found");
                    return None;
                }
                let text = format!("{}choose file > ", file_listing(&files));
                let count = files.len();
                s.session.workbooks = files;
                Some(Request::choice(text, count))
            },
            |s, index| {
                let path = s
                    .session
                    .workbooks
                    .get(index)
                    .filter(|path| path.is_file())
                    .cloned()
                    .ok_or("Calculation file not set!")?;
                info!(path = %path.display(), "calculation workbook selected");
                s.session.calc_file = Some(path);
                Ok(Commit::Done)
            },
        )
    }

    pub(crate) fn add_actor(&mut self) -> Assigned {
        self.assign_choice(
            "Select a person or organization to add",
            |s| {
                let path = s.session.work_dir.join(ACTOR_FILE_NAME);
                let actors = match load_actor_yaml(&path) {
                    Ok(actors) => actors,
                    Err(e) => {
                        s.console.warn(&format!("Failed to read actors: {}", e));
                        return None;
                    }
                };
                if actors.is_empty() {
                    s.console
                        .warn(&format!("No actors listed in {}", display_name(&path)));
                    return None;
                }

                let mut text = String::new();
                for (i, actor) in actors.iter().enumerate() {
                    let _ = writeln!(
                        text,
                        "{}. {}, {}",
                        i + 1,
                        actor.name,
                        actor.address.as_deref().unwrap_or("")
                    );
                }
                text.push_str("select > ");
                let count = actors.len();
                s.session.actors = actors;
                Some(Request::choice(text, count))
            },
            |s, index| {
                let actor = s
                    .session
                    .actors
                    .get(index)
                    .cloned()
                    .ok_or("Failed to set new actor")?;
                let name = actor.name.clone();
                s.source
                    .add_actor(actor)
                    .map_err(|e| format!("Failed to set new actor: {}", e))?;
                info!(%name, "actor added");
                Ok(Commit::Done)
            },
        )
    }

    /// Pick the reviewer among the project's actors; the last entry routes
    /// to [`Interpreter::add_actor`] and asks again.
    pub(crate) fn edit_reviewer(&mut self) -> Assigned {
        self.assign_choice(
            "Select the reviewer of the unit process",
            |s| {
                let actors = match s.source.actors() {
                    Ok(actors) => actors,
                    Err(e) => {
                        s.console.warn(&format!("Failed to set reviewer: {}", e));
                        return None;
                    }
                };
                let current = s
                    .source
                    .process_doc(&s.session.product_system)
                    .ok()
                    .flatten()
                    .and_then(|doc| doc.reviewer)
                    .and_then(|reviewer| reviewer.name)
                    .unwrap_or_else(|| "none".to_string());

                let mut text = String::new();
                for (i, actor) in actors.iter().enumerate() {
                    let _ = writeln!(
                        text,
                        "{}. {}, {}",
                        i + 1,
                        actor.name,
                        actor.address.as_deref().unwrap_or("")
                    );
                }
                let _ = writeln!(text, "{}. Add new name to YAML.", actors.len() + 1);
                let _ = write!(text, "select reviewer ({})> ", current);

                let count = actors.len() + 1;
                s.session.actors = actors;
                Some(Request::choice(text, count))
            },
            |s, index| {
                if index == s.session.actors.len() {
                    s.add_actor();
                    return Ok(Commit::Again);
                }
                let actor = s
                    .session
                    .actors
                    .get(index)
                    .cloned()
                    .ok_or("Failed to set reviewer")?;
                s.source
                    .set_reviewer(&s.session.product_system, &actor.id)
                    .map_err(|e| format!("Failed to set reviewer: {}", e))?;
                info!(reviewer = %actor.name, "reviewer set");
                Ok(Commit::Done)
            },
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
