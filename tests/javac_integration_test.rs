//! End-to-end tests against a real `javac`. Each test returns early when no
//! working compiler is installed.

use jvmch::archive::entry_names;
use jvmch::compile::{compile_to_exit_code, FallbackNamer, SystemJavac};
use jvmch::cli::resolve_javac;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn available_javac() -> Option<PathBuf> {
    let javac = resolve_javac(None);
    let status = Command::new(&javac)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .ok()?;
    if status.success() {
        Some(javac)
    } else {
        eprintln!("skipping: {} -version failed", javac.display());
        None
    }
}

#[test]
fn two_independent_classes_end_up_in_the_jar() {
    let Some(javac) = available_javac() else { return };
    let dir = tempdir().unwrap();
    let hello = dir.path().join("first.java");
    let world = dir.path().join("second.java");
    fs::write(
        &hello,
        "package greet.en;\n\npublic class Hello {\n    \
         public static String get() { return \"hello\"; }\n}\n",
    )
    .unwrap();
    fs::write(
        &world,
        "// top comment\npublic class World {\n    int size() { return 5; }\n}\n",
    )
    .unwrap();
    let jar = dir.path().join("out.jar");

    let mut namer = FallbackNamer::seeded();
    let code = compile_to_exit_code(
        &dir.path().join("scratch"),
        &jar,
        &[hello, world],
        &SystemJavac::new(javac),
        &mut namer,
    );
    assert_eq!(code, 0);

    let mut names = entry_names(&jar).unwrap();
    names.sort();
    assert_eq!(names, vec!["World.class", "greet/en/Hello.class"]);
}

#[test]
fn syntax_error_returns_the_compilers_own_code() {
    let Some(javac) = available_javac() else { return };
    let dir = tempdir().unwrap();
    let broken = dir.path().join("Broken.java");
    fs::write(&broken, "public class Broken { int x = ; }\n").unwrap();
    let jar = dir.path().join("out.jar");

    fs::create_dir_all(dir.path().join("direct")).unwrap();
    let direct = Command::new(&javac)
        .arg("-d")
        .arg(dir.path().join("direct"))
        .arg(&broken)
        .stderr(Stdio::null())
        .status()
        .unwrap()
        .code()
        .unwrap();
    assert_ne!(direct, 0);

    let mut namer = FallbackNamer::seeded();
    let code = compile_to_exit_code(
        &dir.path().join("scratch"),
        &jar,
        &[broken],
        &SystemJavac::new(javac),
        &mut namer,
    );
    assert_eq!(code, direct);
    assert!(!jar.exists());
}
