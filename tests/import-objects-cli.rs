use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;

const SAMPLE_TOKEN: &str = "integration-token";

fn write_settings(dir: &Path, api_url: &str, table_path: &Path) -> PathBuf {
    let settings = serde_json::json!({
        "credentials": {
            "host": api_url,
            "identifier": "importer@example.org",
            "password": "secret"
        },
        "file_path": table_path,
    });
    let path = dir.join("settings.json");
    fs::write(&path, serde_json::to_vec_pretty(&settings).unwrap()).unwrap();
    path
}

fn write_source_table(dir: &Path) -> PathBuf {
    let path = dir.join("trees.csv");
    fs::write(
        &path,
        "Nom,long,lat,plantation,FBUNQ_simple\n\
         PX_10_RG_5,3.87,43.61,2015,689\n\
         PX_10_RG_6,3.88,43.62,,\n",
    )
    .unwrap();
    path
}

fn auth_mock(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("POST", "/security/authenticate")
        .with_body(
            serde_json::to_vec(&serde_json::json!({
                "result": { "token": SAMPLE_TOKEN },
                "metadata": {}
            }))
            .unwrap(),
        )
        .create()
}

fn object_search_mock(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/core/scientific_objects")
        .match_query(Matcher::Any)
        .with_body(r#"{"result": [], "metadata": {}}"#)
        .create()
}

fn germplasm_mock(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/core/germplasm")
        .match_query(Matcher::Any)
        .with_body(
            r#"{"result": [{"uri": "dev:germplasm/g689", "code": "689", "name": "Fuji"}], "metadata": {}}"#,
        )
        .create()
}

fn cmd(settings: &Path, extra_args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("osi").unwrap();
    cmd.arg("--settings").arg(settings).arg("import-objects");
    cmd.args(extra_args);
    cmd
}

#[test]
fn imports_every_row_of_the_source_table() {
    let mut server = mockito::Server::new();
    let tempdir = tempfile::tempdir().unwrap();

    let table_path = write_source_table(tempdir.path());
    let settings = write_settings(tempdir.path(), &server.url(), &table_path);

    let _auth = auth_mock(&mut server);
    let _search = object_search_mock(&mut server);
    let _germplasm = germplasm_mock(&mut server);
    let create = server
        .mock("POST", "/core/scientific_objects")
        .match_header("Authorization", SAMPLE_TOKEN)
        .with_body(r#"{"result": ["dev:so/created"], "metadata": {}}"#)
        .expect(2)
        .create();

    cmd(&settings, &[])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 submitted, 0 skipped, 0 failed"));
    create.assert();
}

#[test]
fn attaches_publication_date_and_germplasm() {
    let mut server = mockito::Server::new();
    let tempdir = tempfile::tempdir().unwrap();

    let table_path = write_source_table(tempdir.path());
    let settings = write_settings(tempdir.path(), &server.url(), &table_path);

    let _auth = auth_mock(&mut server);
    let _search = object_search_mock(&mut server);
    let _germplasm = germplasm_mock(&mut server);
    let create_first = server
        .mock("POST", "/core/scientific_objects")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "rdf_type": "vocabulary:tree",
            "name": "PX_10_RG_5",
            "publication_date": "2015-01-01T00:00:00Z",
            "germplasm": "dev:germplasm/g689"
        })))
        .with_body(r#"{"result": ["dev:so/px_10_rg_5"], "metadata": {}}"#)
        .expect(1)
        .create();
    let create_second = server
        .mock("POST", "/core/scientific_objects")
        .match_body(Matcher::PartialJson(
            serde_json::json!({"name": "PX_10_RG_6"}),
        ))
        .with_body(r#"{"result": ["dev:so/px_10_rg_6"], "metadata": {}}"#)
        .expect(1)
        .create();

    cmd(&settings, &[]).assert().success();
    create_first.assert();
    create_second.assert();
}

#[test]
fn dry_run_builds_requests_but_creates_nothing() {
    let mut server = mockito::Server::new();
    let tempdir = tempfile::tempdir().unwrap();

    let table_path = write_source_table(tempdir.path());
    let settings = write_settings(tempdir.path(), &server.url(), &table_path);

    let _auth = auth_mock(&mut server);
    let _search = object_search_mock(&mut server);
    let _germplasm = germplasm_mock(&mut server);
    let create = server
        .mock("POST", "/core/scientific_objects")
        .expect(0)
        .create();

    cmd(&settings, &["--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry run]"));
    create.assert();
}

#[test]
fn missing_source_table_setting_fails_fast() {
    let tempdir = tempfile::tempdir().unwrap();
    let settings = write_settings(tempdir.path(), "http://localhost:1", Path::new(""));

    // Rewrite without file_path
    let stripped = serde_json::json!({
        "credentials": {
            "host": "http://localhost:1",
            "identifier": "importer@example.org",
            "password": "secret"
        }
    });
    fs::write(&settings, serde_json::to_vec(&stripped).unwrap()).unwrap();

    cmd(&settings, &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required setting: file_path"));
}
