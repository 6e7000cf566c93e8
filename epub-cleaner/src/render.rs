//! HTML pages for the single `/` endpoint, rendered with tera.
//!
//! Templates are compiled into the binary and autoescaped (their names end in
//! `.html`), so client filenames and signed URLs are safe to interpolate.

use epub_cleaner_core::clean::CleanReport;
use serde::Serialize;
use tera::{Context, Tera};

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const UPLOAD_TEMPLATE: &str = include_str!("../templates/upload.html");
const RESULT_TEMPLATE: &str = include_str!("../templates/result.html");

#[derive(Serialize)]
struct ProcessedFile<'a> {
    name: &'a str,
    url: &'a str,
    skipped: usize,
}

fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("upload.html", UPLOAD_TEMPLATE),
        ("result.html", RESULT_TEMPLATE),
    ])?;
    Ok(tera)
}

/// The upload form, showing the configured size limit.
pub fn upload_page(max_upload_mb: u64) -> Result<String, tera::Error> {
    let mut ctx = Context::new();
    ctx.insert("max_file_size_mb", &max_upload_mb);
    templates()?.render("upload.html", &ctx)
}

/// Result listing: one download link per processed file.
pub fn result_page(report: &CleanReport, max_upload_mb: u64) -> Result<String, tera::Error> {
    let processed_files: Vec<ProcessedFile<'_>> = report
        .files
        .iter()
        .map(|file| ProcessedFile {
            name: &file.filename,
            url: &file.artifact.url,
            skipped: file.walk.skipped_undecodable.len(),
        })
        .collect();
    let expiry_minutes = report
        .files
        .first()
        .map(|f| f.artifact.expires_in.as_secs() / 60)
        .unwrap_or(60);

    let mut ctx = Context::new();
    ctx.insert("max_file_size_mb", &max_upload_mb);
    ctx.insert("processed_files", &processed_files);
    ctx.insert("expiry_minutes", &expiry_minutes);
    templates()?.render("result.html", &ctx)
}
