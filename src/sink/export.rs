// src/sink/export.rs
// =============================================================================
// Writes the finished ResultTable as one CSV file.
//
// One row per ListingRecord, with the capture timestamp as the leading
// "scraping_time" index column. Column names follow the dataset the portal
// scrapes have always produced, so downstream merges keep working.
// =============================================================================

use super::ResultTable;
use crate::model::ListingRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    scraping_time: String,
    object_id: u64,
    object_link: &'a str,
    object_title: &'a str,
    city: &'a str,
    company_name: &'a str,
    expiration_date: String,
    job_category: &'a str,
    job_description: &'a str,
    has_document: u8,
    type_of_contract: &'a str,
    views: u64,
}

impl<'a> From<&'a ListingRecord> for ExportRow<'a> {
    fn from(record: &'a ListingRecord) -> Self {
        let summary = &record.summary;
        let detail = &record.detail;
        Self {
            scraping_time: record.captured_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            object_id: summary.sequence_id.0,
            object_link: &summary.link,
            object_title: &summary.title,
            city: &summary.city,
            company_name: &detail.company_name,
            expiration_date: detail.expiration_date.format("%Y-%m-%d").to_string(),
            job_category: &detail.job_category,
            job_description: &detail.job_description,
            has_document: u8::from(detail.has_document),
            type_of_contract: &detail.contract_type,
            views: detail.view_count,
        }
    }
}

/// Writes `table` to `path`, creating parent directories as needed.
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating export directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("opening export file {}", path.display()))?;

    if table.is_empty() {
        // serialize() only emits headers with the first row
        writer.write_record([
            "scraping_time",
            "object_id",
            "object_link",
            "object_title",
            "city",
            "company_name",
            "expiration_date",
            "job_category",
            "job_description",
            "has_document",
            "type_of_contract",
            "views",
        ])?;
    }

    for record in table.rows() {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}
