use crate::config::Config;
use crate::console::Console;
use crate::input::LineInput;
use crate::interpreter::Interpreter;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use upreport::{Converter, ReportResult, TableReader, TableRow};





pub(crate) const ALUMINUM_JSON: &str = include_str!("../../../upreport/tests/data/aluminum.json");

/// Console sink that can be inspected after the session ends.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) struct ScriptedInput(VecDeque<String>);

impl ScriptedInput {
    pub(crate) fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|line| line.to_string()).collect())
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self) -> Option<String> {
        self.0.pop_front()
    }
}

/// Records conversions and writes an empty output file.
#[derive(Clone, Default)]
pub(crate) struct FakeConverter {
    pub installed: bool,
    pub outputs: Rc<RefCell<Vec<PathBuf>>>,
}

impl Converter for FakeConverter {
    fn is_installed(&self) -> bool {
        self.installed
    }

    fn convert(&self, _input: &Path, output: &Path) -> ReportResult<()> {
        fs::write(output, "").map_err(|e| upreport::ReportError::io(output, e))?;
        self.outputs.borrow_mut().push(output.to_path_buf());
        Ok(())
    }
}

pub(crate) struct FakeTables(pub Vec<TableRow>);

impl TableReader for FakeTables {
    fn read_table(&self, _path: &Path, _sheet: &str) -> ReportResult<Vec<TableRow>> {
        Ok(self.0.clone())
    }
}

/// Temporary workspace with `data/aluminum.json` in place.
pub(crate) struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data").join("aluminum.json"), ALUMINUM_JSON).unwrap();

        let config = Config {
            data_dir: root.join("data"),
            output_dir: root.join("output"),
            calc_dir: root.join("calculations"),
            template_dir: root.join("template"),
            port: 8080,
        };
        Self { dir, config }
    }

    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Interpreter fed with `lines`, a converter that is not installed and
    /// an empty calculation table.
    pub(crate) fn interpreter(&self, lines: &[&str]) -> (Interpreter, SharedBuffer) {
        let out = SharedBuffer::default();
        let interpreter = Interpreter::new(
            &self.config,
            Box::new(ScriptedInput::new(lines)),
            Console::new(Box::new(out.clone())),
        )
        .with_converter(Box::new(FakeConverter::default()))
        .with_tables(Box::new(FakeTables(Vec::new())));
        (interpreter, out)
    }
}

/// Answers that open the fixture and select its aluminum product system.
pub(crate) const CONNECT: [&str; 5] = ["1b", "1", "y", "1", "y"];

pub(crate) fn script<'a>(head: &[&'a str], tail: &[&'a str]) -> Vec<&'a str> {
    head.iter().chain(tail.iter()).copied().collect()
}
