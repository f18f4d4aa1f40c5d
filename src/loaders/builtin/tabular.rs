//! Delimited text loader for `.csv` and `.tsv` files.

use crate::core::error::LoadError;
use crate::core::plugin::{extension_of, DataLoader};
use crate::core::value::{is_missing_token, Cell, Details, StructuredValue, Table};
use crate::loaders::registry::LoaderRegistry;
use std::path::Path;

/// Register the tabular loader.
pub fn register(registry: &mut LoaderRegistry) {
    registry.register(TabularLoader);
}

/// Loads delimited text with a header row into a [`Table`].
///
/// - The delimiter is `\t` for `.tsv` and `,` otherwise
/// - An empty or whitespace-only file is an empty table, not an error
/// - Rows shorter than the header are padded with missing cells; rows
///   longer than the header are malformed
/// - Cells equal to a missing-value token (`NA`, `NaN`, empty, ...) are
///   stored as missing
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularLoader;

impl TabularLoader {
    fn delimiter_for(path: &Path) -> u8 {
        match extension_of(path).as_deref() {
            Some("tsv") => b'\t',
            _ => b',',
        }
    }

    fn format_for(path: &Path) -> &'static str {
        match extension_of(path).as_deref() {
            Some("tsv") => "TSV",
            _ => "CSV",
        }
    }
}

impl DataLoader for TabularLoader {
    fn name(&self) -> &str {
        "tabular"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["csv", "tsv"]
    }

    fn load(&self, path: &Path) -> Result<StructuredValue, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = parse_delimited(&bytes, Self::delimiter_for(path)).map_err(|message| {
            LoadError::Malformed {
                path: path.to_path_buf(),
                format: Self::format_for(path),
                message,
            }
        })?;

        log::debug!("Loaded {} as table {:?}", path.display(), table.shape());
        Ok(StructuredValue::Tabular(table))
    }

    fn describe(&self, path: &Path) -> Result<Details, LoadError> {
        let value = self.load(path)?;
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let (rows, width) = value.shape().unwrap_or((0, 0));

        let mut details = Details::new();
        details.insert("loader".into(), self.name().into());
        details.insert("kind".into(), value.kind().into());
        details.insert("format".into(), Self::format_for(path).into());
        details.insert(
            "delimiter".into(),
            char::from(Self::delimiter_for(path)).to_string().into(),
        );
        details.insert("size_bytes".into(), size.into());
        details.insert("shape".into(), vec![rows, width].into());
        details.insert("columns".into(), value.columns().unwrap_or_default().into());
        Ok(details)
    }
}

/// Parse delimited bytes into a table.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Table, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(format!(
                "Expected {} fields in line {}, saw {}",
                width,
                line,
                record.len()
            ));
        }
        rows.push(
            record
                .iter()
                .map(|raw| {
                    if is_missing_token(raw) {
                        None
                    } else {
                        Some(raw.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Table::new(columns, rows))
}
