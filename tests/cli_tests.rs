use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE_A: &str = r#"BOOST_AUTO_TEST_CASE(smoke)
{
	char const* sourceCode = R"(
		contract test {
			function f(uint a) returns(uint d) { return a * 7; }
		}
	)";
	compileAndRun(sourceCode);
}

BOOST_AUTO_TEST_CASE(delimited)
{
	char const* sourceCode = R"DELIMITER(
		contract C {
			string s = ")";
		}
	)DELIMITER";
}
"#;

const FIXTURE_B: &str = r#"BOOST_AUTO_TEST_CASE(empty)
{
	char const* sourceCode = R"(
	)";
}
"#;

fn source_tree() -> TempDir {
    let src = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join("libsolidity")).unwrap();
    fs::write(src.path().join("libsolidity/SolidityEndToEndTest.cpp"), FIXTURE_A).unwrap();
    fs::write(src.path().join("libsolidity/SolidityParser.cpp"), FIXTURE_B).unwrap();
    fs::write(src.path().join("README.md"), "no literals here\n").unwrap();
    src
}

fn isolate() -> Command {
    Command::cargo_bin("isolate-tests").unwrap()
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn writes_cases_into_current_directory() {
    let src = source_tree();
    let work = TempDir::new().unwrap();

    isolate()
        .current_dir(work.path())
        .arg(src.path())
        .arg("--quiet")
        .assert()
        .success();

    assert_eq!(
        read(work.path(), "test0.sol"),
        "\t\tcontract test {\n\t\t\tfunction f(uint a) returns(uint d) { return a * 7; }\n\t\t}\n"
    );
    assert_eq!(
        read(work.path(), "test1.sol"),
        "\t\tcontract C {\n\t\t\tstring s = \")\";\n\t\t}\n"
    );
    assert_eq!(read(work.path(), "test2.sol"), "");
    assert!(!work.path().join("test3.sol").exists());
}

#[test]
fn honours_output_options() {
    let src = source_tree();
    let out = TempDir::new().unwrap();
    let corpus = out.path().join("corpus");

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(&corpus)
        .args(["--stem", "case", "--extension", "txt", "--start", "5", "-q"])
        .assert()
        .success();

    assert!(corpus.join("case5.txt").exists());
    assert!(corpus.join("case6.txt").exists());
    assert!(corpus.join("case7.txt").exists());
    assert!(!corpus.join("case8.txt").exists());
}

#[test]
fn unterminated_literal_warns_but_succeeds() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(
        src.path().join("broken.cpp"),
        "auto a = R\"(\nkept\n)\";\nauto b = R\"x(\nlost\n)\";\n",
    )
    .unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unterminated"))
        .stdout(predicate::str::contains("Cases: 1"));

    assert_eq!(read(out.path(), "test0.sol"), "kept\n");
    assert!(!out.path().join("test1.sol").exists());
}

#[test]
fn strict_mode_fails_on_unterminated_literal() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(src.path().join("broken.cpp"), "auto b = R\"x(\nlost\n").unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--strict", "--output-format", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("never closed"));
}

#[test]
fn missing_path_exits_with_error() {
    let work = TempDir::new().unwrap();

    isolate()
        .arg(work.path().join("does-not-exist"))
        .args(["--output-format", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist"));
}

#[test]
fn unreadable_file_aborts_by_default() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(src.path().join("a.cpp"), "R\"(\nfirst\n)\";\n").unwrap();
    fs::write(src.path().join("b.bin"), [0xffu8, 0xfe, 0x00, 0x9f]).unwrap();
    fs::write(src.path().join("c.cpp"), "R\"(\nthird\n)\";\n").unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--output-format", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("b.bin"));

    assert_eq!(read(out.path(), "test0.sol"), "first\n");
    assert!(!out.path().join("test1.sol").exists());

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--skip-unreadable", "-q"])
        .assert()
        .success();

    assert_eq!(read(out.path(), "test1.sol"), "third\n");
}

#[test]
fn git_directory_is_scanned_by_default() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join(".git")).unwrap();
    fs::write(src.path().join(".git/a.cpp"), "R\"(\nx\n)\";\n").unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("-q")
        .assert()
        .success();
    assert_eq!(read(out.path(), "test0.sol"), "x\n");

    let excluded = TempDir::new().unwrap();
    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(excluded.path())
        .args(["--exclude", ".git", "-q"])
        .assert()
        .success();
    assert!(!excluded.path().join("test0.sol").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_source_file_is_extracted() {
    let src = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(store.path().join("real.cpp"), "R\"(\nlinked\n)\";\n").unwrap();
    std::os::unix::fs::symlink(store.path().join("real.cpp"), src.path().join("link.cpp"))
        .unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("-q")
        .assert()
        .success();

    assert_eq!(read(out.path(), "test0.sol"), "linked\n");
}

#[test]
fn no_overwrite_refuses_existing_files() {
    let src = source_tree();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("test0.sol"), "keep me").unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--no-overwrite", "--output-format", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(read(out.path(), "test0.sol"), "keep me");
}

#[test]
fn dry_run_reports_without_writing() {
    let src = source_tree();
    let out = TempDir::new().unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--dry-run", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cases_written\": 3"))
        .stdout(predicate::str::contains("\"dry_run\": true"));

    assert!(!out.path().join("test0.sol").exists());
}

#[test]
fn extension_filter_limits_scanned_files() {
    let src = source_tree();
    let out = TempDir::new().unwrap();
    fs::write(
        src.path().join("notes.txt"),
        "R\"(\nshould not be extracted\n)\";\n",
    )
    .unwrap();

    isolate()
        .arg(src.path())
        .arg("--output-dir")
        .arg(out.path())
        .args(["--extensions", "cpp", "-q"])
        .assert()
        .success();

    assert!(out.path().join("test2.sol").exists());
    assert!(!out.path().join("test3.sol").exists());
}

#[test]
fn generate_config_writes_sample() {
    let work = TempDir::new().unwrap();
    let config_path = work.path().join("isolate.toml");

    isolate()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[scan.syntax]"));
}

#[test]
fn config_file_is_used() {
    let src = source_tree();
    let out = TempDir::new().unwrap();
    let config_path = out.path().join("custom.toml");
    fs::write(
        &config_path,
        format!(
            "[output]\ndirectory = {:?}\nstem = \"fuzz\"\nextension = \"in\"\n",
            out.path().join("cases").to_string_lossy()
        ),
    )
    .unwrap();

    isolate()
        .arg(src.path())
        .arg("--config")
        .arg(&config_path)
        .arg("-q")
        .assert()
        .success();

    assert!(out.path().join("cases").join("fuzz0.in").exists());
}
