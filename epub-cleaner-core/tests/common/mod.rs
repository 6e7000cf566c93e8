#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Build an in-memory ZIP archive from `(name, content)` pairs.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(content).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Minimal EPUB-shaped archive with the fixture text used across tests.
pub fn sample_epub() -> Vec<u8> {
    build_zip(&[
        ("mimetype", b"application/epub+zip"),
        (
            "chapter1.xhtml",
            b"<html><body>Test content with REMOVE_THIS text.</body></html>",
        ),
        ("style.css", b"body { color: REMOVE_THIS; }"),
    ])
}

/// Read every entry of the archive at `path` into a name -> bytes map.
pub fn read_zip(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).expect("open zip")).expect("parse zip");
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("entry");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read entry");
        entries.insert(entry.name().to_string(), content);
    }
    entries
}
