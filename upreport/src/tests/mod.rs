use crate::Project;

// Formatting tests
mod format;


// Collaborator tests
mod project;


pub(crate) const ALUMINUM_JSON: &str = include_str!("../../tests/data/aluminum.json");

pub(crate) fn aluminum() -> Project {
    Project::from_json(ALUMINUM_JSON).unwrap()
}
