//! Runs the built binary for the commands that do not need Postgres.

use std::path::Path;
use std::process::{Command, Output};

fn portal(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_coord-portal"))
        .arg("--config")
        .arg(workdir.join("absent.toml"))
        .arg("--storage-dir")
        .arg(workdir.join("state"))
        .args(args)
        .env_remove("DATABASE_URL")
        .output()
        .expect("failed to run coord-portal")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

const SELECTION_FILE: &str = "state/coord-selected-member.json";

#[test]
fn grade_command_maps_both_directions() {
    let dir = tempfile::tempdir().unwrap();

    let output = portal(dir.path(), &["grade", "8"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("8: Acima do esperado [border-green-500]"));

    let output = portal(dir.path(), &["grade", "7"]);
    assert!(stdout(&output).contains("7: Dentro do esperado [border-red-400]"));

    let output = portal(dir.path(), &["grade", "Abaixo do esperado"]);
    assert!(stdout(&output).contains("Abaixo do esperado: 4"));

    let output = portal(dir.path(), &["grade", "Excelente"]);
    assert!(stdout(&output).contains("Excelente: 6"));
}

#[test]
fn area_command_prints_colors() {
    let dir = tempfile::tempdir().unwrap();

    let output = portal(dir.path(), &["area", "Marketing"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Marketing: #EC4899"));

    let output = portal(dir.path(), &["area", "Financeiro"]);
    assert!(stdout(&output).contains("Financeiro: #6B7280"));
}

#[test]
fn open_without_login_redirects_to_entry() {
    let dir = tempfile::tempdir().unwrap();
    let output = portal(dir.path(), &["open", "/coord/ciclos"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Redirecionado para /");
}

#[test]
fn open_while_loading_shows_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let output = portal(dir.path(), &["open", "/coord/ciclos", "--loading", "--authenticated"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Carregando...");
}

#[test]
fn restricted_role_is_sent_to_selection_process() {
    let dir = tempfile::tempdir().unwrap();
    let output = portal(
        dir.path(),
        &["open", "/coord/other", "--authenticated", "--equipe-ps"],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "Redirecionado para /coord/processo-seletivo"
    );
}

#[test]
fn guarded_page_without_database_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = portal(dir.path(), &["open", "/coord/ciclos", "--authenticated"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DATABASE_URL"));
}

#[test]
fn selected_reads_stored_member() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("state")).unwrap();
    std::fs::write(
        dir.path().join(SELECTION_FILE),
        r#"{"id":"2","name":"Bruno Lima","area":"Projetos","photo":null}"#,
    )
    .unwrap();

    let output = portal(dir.path(), &["selected"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Bruno Lima (2) Projetos `#0EA5E9`"));
}

#[test]
fn selected_discards_corrupt_state() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("state")).unwrap();
    std::fs::write(dir.path().join(SELECTION_FILE), "not json at all").unwrap();

    let output = portal(dir.path(), &["selected"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Nenhum membro selecionado."));
    assert!(!dir.path().join(SELECTION_FILE).exists());
}

#[test]
fn clear_removes_stored_member() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("state")).unwrap();
    std::fs::write(
        dir.path().join(SELECTION_FILE),
        r#"{"id":"2","name":"Bruno Lima","area":"Projetos","photo":null}"#,
    )
    .unwrap();

    let output = portal(dir.path(), &["clear"]);
    assert!(output.status.success());
    assert!(!dir.path().join(SELECTION_FILE).exists());

    let output = portal(dir.path(), &["selected"]);
    assert!(stdout(&output).contains("Nenhum membro selecionado."));
}

#[test]
fn undecodable_state_does_not_block_commands() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("state")).unwrap();
    std::fs::write(dir.path().join(SELECTION_FILE), [0xff, 0xfe, 0x00]).unwrap();

    let output = portal(dir.path(), &["clear"]);
    assert!(output.status.success());
    assert!(!dir.path().join(SELECTION_FILE).exists());

    std::fs::write(dir.path().join(SELECTION_FILE), [0xff, 0xfe, 0x00]).unwrap();
    let output = portal(dir.path(), &["selected"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Nenhum membro selecionado."));
}
