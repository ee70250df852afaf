//! CSV artifacts: the extraction template, per-language files and the
//! combined multi-language file.

use crate::error::TabularError;
use crate::i18n::{Language, LanguageRegistry};
use crate::store::{RecordStore, TranslationRecord};
use csv::{Reader, StringRecord, Writer};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const KEY: &str = "key";
const TRANSLATION: &str = "translation";
const CONTEXT: &str = "context";
const SCREEN: &str = "screen";

/// Template: `key, <canonical>, <targets…>, context, screen`, sorted by key.
pub fn write_template(
    store: &RecordStore,
    registry: &LanguageRegistry,
    path: &Path,
) -> Result<(), TabularError> {
    let languages = columns(registry);
    let mut header: Vec<&str> = vec![KEY];
    header.extend(languages.iter().map(|lang| lang.code()));
    header.extend([CONTEXT, SCREEN]);

    let mut writer = open_writer(path)?;
    write_row(&mut writer, path, &header)?;

    for record in store.sorted_by_key() {
        let mut row = vec![record.key()];
        row.extend(languages.iter().map(|lang| cell(record, lang)));
        row.extend([record.context(), record.origin_screen()]);
        write_row(&mut writer, path, &row)?;
    }

    finish(writer, path)?;
    info!("Wrote template with {} rows to {}", store.len(), path.display());
    Ok(())
}

/// One language: `key, translation` in insertion order. Untranslated rows are
/// written with an empty translation.
pub fn write_language(
    store: &RecordStore,
    language: &Language,
    path: &Path,
) -> Result<(), TabularError> {
    let mut writer = open_writer(path)?;
    write_row(&mut writer, path, &[KEY, TRANSLATION])?;

    let mut filled = 0;
    for record in store.in_insertion_order() {
        let value = cell(record, language);
        if !value.is_empty() {
            filled += 1;
        }
        write_row(&mut writer, path, &[record.key(), value])?;
    }

    finish(writer, path)?;
    info!(
        "Wrote {} ({}/{} rows filled) to {}",
        language,
        filled,
        store.len(),
        path.display()
    );
    Ok(())
}

/// Every language side by side: `key, <canonical>, <targets…>`.
pub fn write_combined(
    store: &RecordStore,
    registry: &LanguageRegistry,
    path: &Path,
) -> Result<(), TabularError> {
    let languages = columns(registry);
    let mut header: Vec<&str> = vec![KEY];
    header.extend(languages.iter().map(|lang| lang.code()));

    let mut writer = open_writer(path)?;
    write_row(&mut writer, path, &header)?;

    for record in store.in_insertion_order() {
        let mut row = vec![record.key()];
        row.extend(languages.iter().map(|lang| cell(record, lang)));
        write_row(&mut writer, path, &row)?;
    }

    finish(writer, path)?;
    info!("Wrote combined file with {} rows to {}", store.len(), path.display());
    Ok(())
}

/// Load a template or combined file back into a store.
///
/// Columns are matched by name and unknown ones ignored. Empty cells are
/// untranslated slots. Without a `context`/`screen` column those fields are
/// empty; the module always comes from the key prefix.
pub fn read_records(path: &Path, registry: &LanguageRegistry) -> Result<RecordStore, TabularError> {
    let mut reader = open_reader(path)?;
    let header = headers(&mut reader, path)?;

    let key_column = require(&header, KEY, path)?;
    let canonical = registry.canonical();
    let source_column =
        position(&header, canonical.code()).ok_or_else(|| TabularError::MissingColumn {
            path: path.to_path_buf(),
            column: "en",
        })?;
    let context_column = position(&header, CONTEXT);
    let screen_column = position(&header, SCREEN);
    let target_columns: Vec<(&str, usize)> = registry
        .targets()
        .into_iter()
        .filter_map(|lang| position(&header, lang.code()).map(|i| (lang.code(), i)))
        .collect();

    let mut store = RecordStore::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let field = |index: Option<usize>| index.and_then(|i| row.get(i)).unwrap_or_default();

        let key = field(Some(key_column)).trim();
        if key.is_empty() {
            continue;
        }
        let module = key.split('.').next().unwrap_or_default();

        let record = TranslationRecord::new(
            key,
            field(Some(source_column)),
            field(context_column),
            module,
            field(screen_column),
        );
        if !store.upsert_if_absent(record) {
            debug!("{}: duplicate key {} ignored", path.display(), key);
            continue;
        }

        for (code, index) in &target_columns {
            let value = field(Some(*index));
            if value.is_empty() {
                continue;
            }
            if let Err(e) = store.set_slot(key, code, value) {
                warn!("{}: {} slot of {} not loaded: {}", path.display(), code, key, e);
            }
        }
    }

    info!("Loaded {} records from {}", store.len(), path.display());
    Ok(store)
}

/// Load a `key, translation` file as ordered pairs.
pub fn read_language_file(path: &Path) -> Result<Vec<(String, String)>, TabularError> {
    let mut reader = open_reader(path)?;
    let header = headers(&mut reader, path)?;
    let key_column = require(&header, KEY, path)?;
    let translation_column = require(&header, TRANSLATION, path)?;

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let key = row.get(key_column).unwrap_or_default().trim();
        if key.is_empty() {
            continue;
        }
        let translation = row.get(translation_column).unwrap_or_default();
        rows.push((key.to_string(), translation.to_string()));
    }
    Ok(rows)
}

fn columns(registry: &LanguageRegistry) -> Vec<&Language> {
    let mut languages = vec![registry.canonical()];
    languages.extend(registry.targets());
    languages
}

fn cell<'a>(record: &'a TranslationRecord, language: &Language) -> &'a str {
    if language.is_canonical() {
        record.source_text()
    } else {
        record.slot(language.code()).unwrap_or_default()
    }
}

fn open_writer(path: &Path) -> Result<Writer<fs::File>, TabularError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TabularError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Writer::from_path(path).map_err(|source| csv_error(path, source))
}

fn write_row(writer: &mut Writer<fs::File>, path: &Path, row: &[&str]) -> Result<(), TabularError> {
    writer
        .write_record(row)
        .map_err(|source| csv_error(path, source))
}

fn finish(mut writer: Writer<fs::File>, path: &Path) -> Result<(), TabularError> {
    writer.flush().map_err(|source| TabularError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn open_reader(path: &Path) -> Result<Reader<fs::File>, TabularError> {
    Reader::from_path(path).map_err(|source| csv_error(path, source))
}

fn headers(reader: &mut Reader<fs::File>, path: &Path) -> Result<StringRecord, TabularError> {
    reader
        .headers()
        .cloned()
        .map_err(|source| csv_error(path, source))
}

fn position(header: &StringRecord, name: &str) -> Option<usize> {
    header.iter().position(|column| column.trim() == name)
}

fn require(header: &StringRecord, name: &'static str, path: &Path) -> Result<usize, TabularError> {
    position(header, name).ok_or_else(|| TabularError::MissingColumn {
        path: path.to_path_buf(),
        column: name,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> TabularError {
    TabularError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.upsert_if_absent(TranslationRecord::new(
            "invoices.export_report_to_pdf",
            "Export Report To PDF",
            "jsx_text",
            "invoices",
            "InvoiceList",
        ));
        store.upsert_if_absent(TranslationRecord::new(
            "common.save",
            "Save",
            "button",
            "common",
            "InvoiceList",
        ));
        store.upsert_if_absent(TranslationRecord::new(
            "reports.totals_by_region",
            "Totals, by \"region\"\nand month",
            "title_attr",
            "reports",
            "Reports",
        ));
        store.set_slot("common.save", "es", "Guardar").unwrap();
        store.set_slot("common.save", "fr", "Enregistrer").unwrap();
        store
            .set_slot("reports.totals_by_region", "fr", "Totaux, par \"région\"\net mois")
            .unwrap();
        store
    }

    #[test]
    fn test_template_is_sorted_with_provenance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("translations_template.csv");
        write_template(&sample_store(), &LanguageRegistry::default(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("key,en,es,fr,ar,context,screen"));
        assert_eq!(lines.next(), Some("common.save,Save,Guardar,Enregistrer,,button,InvoiceList"));
        assert!(lines
            .next()
            .unwrap()
            .starts_with("invoices.export_report_to_pdf,Export Report To PDF,"));
    }

    #[test]
    fn test_language_file_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let registry = LanguageRegistry::default();
        let store = sample_store();

        let es = dir.path().join("es.csv");
        write_language(&store, registry.get("es").unwrap(), &es).unwrap();
        let rows = read_language_file(&es).unwrap();
        assert_eq!(
            rows,
            vec![
                ("invoices.export_report_to_pdf".to_string(), String::new()),
                ("common.save".to_string(), "Guardar".to_string()),
                ("reports.totals_by_region".to_string(), String::new()),
            ]
        );

        let en = dir.path().join("en.csv");
        write_language(&store, registry.canonical(), &en).unwrap();
        let rows = read_language_file(&en).unwrap();
        assert_eq!(rows[0].1, "Export Report To PDF");
    }

    #[test]
    fn test_combined_round_trip_preserves_quoting() {
        let dir = TempDir::new().unwrap();
        let registry = LanguageRegistry::default();
        let store = sample_store();
        let path = dir.path().join("out").join("translations_complete_all.csv");

        write_combined(&store, &registry, &path).unwrap();
        let loaded = read_records(&path, &registry).unwrap();

        let snapshot = |store: &RecordStore| -> Vec<(String, String, BTreeMap<String, String>)> {
            store
                .in_insertion_order()
                .map(|r| (r.key().to_string(), r.source_text().to_string(), r.slots().clone()))
                .collect()
        };
        assert_eq!(snapshot(&store), snapshot(&loaded));

        let record = loaded.get("reports.totals_by_region").unwrap();
        assert_eq!(record.slot("fr"), Some("Totaux, par \"région\"\net mois"));
        assert_eq!(record.origin_module(), "reports");
    }

    #[test]
    fn test_read_template_restores_context_and_screen() {
        let dir = TempDir::new().unwrap();
        let registry = LanguageRegistry::default();
        let path = dir.path().join("template.csv");
        write_template(&sample_store(), &registry, &path).unwrap();

        let loaded = read_records(&path, &registry).unwrap();
        let keys: Vec<&str> = loaded.in_insertion_order().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec!["common.save", "invoices.export_report_to_pdf", "reports.totals_by_region"]
        );

        let record = loaded.get("invoices.export_report_to_pdf").unwrap();
        assert_eq!(record.context(), "jsx_text");
        assert_eq!(record.origin_screen(), "InvoiceList");
        assert!(!record.is_translated("es"));
    }

    #[test]
    fn test_read_ignores_unknown_columns_and_reordered_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manual.csv");
        fs::write(
            &path,
            "notes,fr,key,en\nreviewed,Annuler,common.cancel,Cancel\n,,,\n,Doublon,common.cancel,Cancel again\n",
        )
        .unwrap();

        let loaded = read_records(&path, &LanguageRegistry::default()).unwrap();
        assert_eq!(loaded.len(), 1);
        let record = loaded.get("common.cancel").unwrap();
        assert_eq!(record.source_text(), "Cancel");
        assert_eq!(record.slot("fr"), Some("Annuler"));
        assert_eq!(record.context(), "");
    }

    #[test]
    fn test_missing_source_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "key,es\ncommon.save,Guardar\n").unwrap();

        let err = read_records(&path, &LanguageRegistry::default()).unwrap_err();
        assert!(matches!(err, TabularError::MissingColumn { column: "en", .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_language_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, TabularError::Csv { .. }));
    }
}
