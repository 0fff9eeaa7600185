use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn project() -> Result<tempfile::TempDir, Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    fs::create_dir_all(&src)?;
    fs::write(
        src.join("index.rst"),
        "Home\n====\n\nRead :doc:`install`.\n\n.. toctree::\n   install\n",
    )?;
    fs::write(src.join("install.rst"), "Installation\n============\n\nRun it.\n")?;
    Ok(dir)
}

#[test]
fn missing_target_prints_usage() -> Result<(), Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Targets:"))
        .stderr(predicate::str::contains("rebuild  Force rebuild"));
    Ok(())
}

#[test]
fn unknown_target_prints_usage() -> Result<(), Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported target: deploy"))
        .stderr(predicate::str::contains("clean    Clean intermediate files"));
    Ok(())
}

#[test]
fn build_writes_html() -> Result<(), Box<dyn std::error::Error>> {
    let dir = project()?;

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    let index = fs::read_to_string(dir.path().join("build/index.html"))?;
    assert!(index.contains("<title>Home</title>"));
    assert!(index.contains("<a href=\"install.html\">\nInstallation\n</a>"));
    assert!(dir.path().join("build/install.html").is_file());
    assert!(dir.path().join("cache/artifacts.json").is_file());
    Ok(())
}

#[test]
fn base_dir_overrides_working_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = project()?;
    let elsewhere = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(elsewhere.path())
        .arg("--base-dir")
        .arg(dir.path())
        .arg("build")
        .assert()
        .success();

    assert!(dir.path().join("build/index.html").is_file());
    Ok(())
}

#[test]
fn config_file_sets_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = project()?;
    fs::write(
        dir.path().join("rstbuild.yml"),
        "paths:\n  build: site\n  cache: .rstbuild\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    assert!(dir.path().join("site/index.html").is_file());
    assert!(dir.path().join(".rstbuild/artifacts.json").is_file());
    assert!(!dir.path().join("build").exists());
    Ok(())
}

#[test]
fn broken_reference_fails_build() -> Result<(), Box<dyn std::error::Error>> {
    let dir = project()?;
    fs::write(dir.path().join("src/index.rst"), "Home\n====\n\nSee :doc:`ghost`.\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to link: index"));

    assert!(dir.path().join("build/install.html").is_file());
    Ok(())
}

#[test]
fn clean_removes_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = project()?;

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    #[allow(deprecated)]
    Command::cargo_bin("rstbuild")?
        .current_dir(dir.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up."));

    assert!(!dir.path().join("build").exists());
    assert!(!dir.path().join("cache").exists());
    assert!(dir.path().join("src/index.rst").is_file());
    Ok(())
}
