use jvmch::archive::{entry_names, merge_archives, MergeOptions, MANIFEST_NAME};
use jvmch::JvmchError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

// ---------- helpers ----------

fn make_jar(path: &Path, entries: &[(&str, &[u8])], method: CompressionMethod) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = FileOptions::default().compression_method(method);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap();
}

fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

fn manifest_jar(path: &Path, class: &str) {
    make_jar(
        path,
        &[
            ("META-INF/", b""),
            (MANIFEST_NAME, b"Manifest-Version: 1.0\r\n\r\n"),
            (class, b"\xCA\xFE\xBA\xBE"),
        ],
        CompressionMethod::Deflated,
    );
}

// ---------- tests ----------

#[test]
fn merged_entries_are_the_concatenation_of_inputs() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    let c = dir.path().join("c.jar");
    make_jar(&a, &[("p/A.class", b"alpha"), ("p/B.class", b"beta")], CompressionMethod::Deflated);
    make_jar(&b, &[("q/", b""), ("q/C.class", b"gamma")], CompressionMethod::Deflated);
    make_jar(&c, &[("D.class", b"delta")], CompressionMethod::Stored);

    let out = dir.path().join("out.jar");
    let inputs = vec![a.clone(), b.clone(), c.clone()];
    let summary = merge_archives(&out, &inputs, &MergeOptions::default()).unwrap();
    assert_eq!(summary.archives, 3);
    assert_eq!(summary.entries, 5);
    assert_eq!(summary.skipped, 0);

    let mut expected = Vec::new();
    for input in &inputs {
        expected.extend(read_entries(input));
    }
    assert_eq!(read_entries(&out), expected);
}

#[test]
fn duplicate_names_are_passed_through() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    make_jar(&a, &[("Same.class", b"first")], CompressionMethod::Deflated);
    make_jar(&b, &[("Same.class", b"second")], CompressionMethod::Deflated);

    let out = dir.path().join("out.jar");
    merge_archives(&out, &[a, b], &MergeOptions::default()).unwrap();
    assert_eq!(entry_names(&out).unwrap(), vec!["Same.class", "Same.class"]);
}

#[test]
fn manifests_are_ordinary_entries_by_default() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    manifest_jar(&a, "A.class");
    manifest_jar(&b, "B.class");

    let out = dir.path().join("out.jar");
    merge_archives(&out, &[a, b], &MergeOptions::default()).unwrap();
    let names = entry_names(&out).unwrap();
    assert_eq!(
        names,
        vec!["META-INF/", MANIFEST_NAME, "A.class", "META-INF/", MANIFEST_NAME, "B.class"]
    );
}

#[test]
fn drop_manifest_skips_only_manifest_entries() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    manifest_jar(&a, "A.class");
    manifest_jar(&b, "B.class");

    let out = dir.path().join("out.jar");
    let summary = merge_archives(&out, &[a, b], &MergeOptions { drop_manifest: true }).unwrap();
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.entries, 4);
    assert_eq!(
        entry_names(&out).unwrap(),
        vec!["META-INF/", "A.class", "META-INF/", "B.class"]
    );
}

#[test]
fn stored_entries_stay_stored() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    make_jar(&a, &[("S.class", b"stored body")], CompressionMethod::Stored);
    make_jar(&b, &[("D.class", b"deflated body")], CompressionMethod::Deflated);

    let out = dir.path().join("out.jar");
    merge_archives(&out, &[a, b], &MergeOptions::default()).unwrap();

    let mut archive = ZipArchive::new(File::open(&out).unwrap()).unwrap();
    assert_eq!(archive.by_name("S.class").unwrap().compression(), CompressionMethod::Stored);
    assert_eq!(archive.by_name("D.class").unwrap().compression(), CompressionMethod::Deflated);
}

#[test]
fn entries_larger_than_the_copy_buffer_survive() {
    let dir = tempdir().unwrap();
    let body: Vec<u8> = (0..200_000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
        .collect();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    make_jar(&a, &[("big.bin", &body)], CompressionMethod::Deflated);
    make_jar(&b, &[("small.bin", b"x")], CompressionMethod::Deflated);

    let out = dir.path().join("out.jar");
    merge_archives(&out, &[a, b], &MergeOptions::default()).unwrap();
    let entries = read_entries(&out);
    assert_eq!(entries[0].0, "big.bin");
    assert_eq!(entries[0].1, body);
}

#[test]
fn rerunning_overwrites_with_identical_output() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    let b = dir.path().join("b.jar");
    make_jar(&a, &[("A.class", b"a"), ("B.class", b"b")], CompressionMethod::Deflated);
    make_jar(&b, &[("C.class", b"c")], CompressionMethod::Deflated);
    let inputs = vec![a, b];
    let out = dir.path().join("out.jar");

    fs::write(&out, b"stale contents that must disappear").unwrap();
    merge_archives(&out, &inputs, &MergeOptions::default()).unwrap();
    let first = fs::read(&out).unwrap();
    merge_archives(&out, &inputs, &MergeOptions::default()).unwrap();
    let second = fs::read(&out).unwrap();

    assert_eq!(first, second);
    assert_eq!(entry_names(&out).unwrap(), vec!["A.class", "B.class", "C.class"]);
}

#[test]
fn missing_input_aborts_the_merge() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.jar");
    make_jar(&a, &[("A.class", b"a")], CompressionMethod::Deflated);
    let missing: PathBuf = dir.path().join("missing.jar");

    let inputs = [a, missing.clone()];
    let result = merge_archives(&dir.path().join("out.jar"), &inputs, &MergeOptions::default());
    match result {
        Err(JvmchError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
