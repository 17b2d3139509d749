//! Output formatting for the CLI.

use colored::*;
use stixforge_domain::{DocumentRecord, StixBundle};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a bundle summary: id, object count, and counts by type.
    pub fn format_bundle_summary(&self, bundle: &StixBundle) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} ({} objects)\n",
            bundle.id,
            bundle.object_count()
        ));

        let summary = bundle.type_summary();
        if summary.is_empty() {
            out.push_str(&self.colorize("No objects in bundle.", "yellow"));
            return out;
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Count"]);
        for (object_type, count) in &summary {
            builder.push_record([object_type.as_str(), &count.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        out.push_str(&table.to_string());
        out
    }

    /// Format document records as a table.
    pub fn format_documents(&self, records: &[DocumentRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No documents ingested yet.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "File", "Type", "Bundle"]);
        for record in records {
            let bundle = match &record.stix_bundle_url {
                Some(_) => "extracted",
                None => "-",
            };
            builder.push_record([
                &record.id[..8.min(record.id.len())],
                &record.file_name,
                &record.file_type,
                bundle,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "red" => text.red().to_string(),
            _ => text.to_string(),
        }
    }
}
