use super::{aluminum, ALUMINUM_JSON};
use crate::model::{Actor, EntityClass, ParameterScope};
use crate::project::{find_files, load_actor_yaml, Project};
use crate::source::DataSource;
use crate::ReportError;
use std::fs;

#[test]
fn test_read_validates_product_systems() {
    let mut project = aluminum();
    assert!(project.read().is_ok());

    let mut empty = Project::from_json("{}").unwrap();
    assert!(matches!(empty.read(), Err(ReportError::NotFound(_))));

    let mut closed = Project::new();
    assert!(matches!(closed.read(), Err(ReportError::Connection(_))));
}

#[test]
fn test_empty_scope_is_first_product_system() {
    let project = aluminum();
    assert_eq!(
        project.reference_name("").unwrap(),
        project.reference_name("ps-aluminum").unwrap()
    );
    assert_eq!(
        project.reference_process("").unwrap().map(|d| d.id),
        Some("proc-aluminum".to_string())
    );
}

#[test]
fn test_unknown_scope_is_not_found() {
    let project = aluminum();
    assert!(matches!(
        project.reference_name("ps-missing"),
        Err(ReportError::NotFound(_))
    ));
}

#[test]
fn test_spec_ids() {
    let project = aluminum();
    assert_eq!(
        project.spec_ids(EntityClass::ProductSystem).unwrap(),
        vec!["ps-aluminum", "ps-water"]
    );
    assert_eq!(
        project.spec_ids(EntityClass::Actor).unwrap(),
        vec!["actor-jane"]
    );
}

#[test]
fn test_reference_flow_and_flows() {
    let project = aluminum();
    assert_eq!(
        project.reference_flow("").unwrap().as_deref(),
        Some("1 kg Aluminum, cast")
    );

    let inputs = project.input_flows("").unwrap().unwrap();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].name, "Electricity");
    assert_eq!(inputs[0].dq, "(1;2;3;4;5)");

    let outputs = project.output_flows("").unwrap().unwrap();
    assert_eq!(outputs.len(), 2);

    assert_eq!(project.input_flows("ps-water").unwrap(), None);
}

#[test]
fn test_process_parameters_include_referenced_globals() {
    let project = aluminum();
    let params = project.process_parameters("").unwrap();
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["scrap_mass", "A_tot", "loss_rate", "density", "base_density"]
    );
    assert_eq!(params[0].parameter_scope, ParameterScope::ProcessScope);
    assert_eq!(params[2].parameter_scope, ParameterScope::GlobalScope);
}

#[test]
fn test_sources_resolve_against_project() {
    let project = aluminum();
    let sources = project.sources("").unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "Smith");
    assert_eq!(sources[0].year, Some(2019));
    assert_eq!(sources[1].name, "Plant survey");
}

#[test]
fn test_connect_has_no_transport() {
    let mut project = Project::new();
    match project.connect(8080) {
        Err(ReportError::Connection(msg)) => {
            assert_eq!(msg, "Failed to connect to IPC server on port 8080")
        }
        other => panic!("Expected connection error, got {:?}", other),
    }
}

#[test]
fn test_edits_are_saved_beside_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aluminum.json");
    fs::write(&path, ALUMINUM_JSON).unwrap();

    let mut project = Project::new();
    project.open(&path).unwrap();
    project
        .add_actor(Actor {
            name: "Sam Reviewer".to_string(),
            address: Some("Morgantown, WV".to_string()),
            ..Actor::default()
        })
        .unwrap();

    let actors = project.actors().unwrap();
    assert_eq!(actors.len(), 2);
    let new_id = actors[1].id.clone();
    assert!(!new_id.is_empty());

    project.set_reviewer("", &new_id).unwrap();
    let doc = project.process_doc("").unwrap().unwrap();
    assert_eq!(
        doc.reviewer.and_then(|r| r.name).as_deref(),
        Some("Sam Reviewer")
    );

    let edited = dir.path().join("aluminum_edited.json");
    assert_eq!(project.edited_path(), Some(edited.clone()));
    assert!(edited.is_file());
    assert_eq!(fs::read_to_string(&path).unwrap(), ALUMINUM_JSON);

    let mut reopened = Project::new();
    reopened.open(&edited).unwrap();
    assert!(reopened.find_actor(&new_id).unwrap().is_some());
    assert_eq!(reopened.edited_path(), Some(edited));
}

#[test]
fn test_set_reviewer_requires_known_actor() {
    let mut project = aluminum();
    assert!(matches!(
        project.set_reviewer("", "nobody"),
        Err(ReportError::NotFound(_))
    ));
}

#[test]
fn test_load_actor_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actors.yaml");
    fs::write(
        &path,
        "- name: Jane Analyst\n  address: Pittsburgh, PA\n  email: jane@example.org\n\
         - name: Sam Reviewer\n  address: Morgantown, WV\n",
    )
    .unwrap();

    let actors = load_actor_yaml(&path).unwrap();
    assert_eq!(actors.len(), 2);
    assert_eq!(actors[0].email.as_deref(), Some("jane@example.org"));
    assert_eq!(actors[1].website, None);
    assert!(actors[1].id.is_empty());
}

#[test]
fn test_find_files_is_shallow_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.JSON"), "{}").unwrap();
    fs::write(dir.path().join("a.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.json"), "{}").unwrap();

    let files = find_files(dir.path(), &["json"]);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.json", "b.JSON"]);
}
