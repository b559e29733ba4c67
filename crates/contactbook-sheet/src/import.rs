//! Workbook -> contacts.
//!
//! Rows are processed top to bottom starting below the header. A bad row
//! is recorded in the report and never stops the import.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use contactbook_directory::{validate, ContactDirectory, DirectoryError};
use contactbook_types::{
    Contact, ContactDraft, ContactMethodType, ImportError, ImportReport, MethodDraft,
    FAVORITE_YES,
};
use tracing::{debug, info, warn};

use crate::cell::{self, CellError};
use crate::{col, Result};

const NO_WORKSHEET: &str = "workbook contains no worksheet";
const NO_DATA: &str = "workbook contains no data rows";
const EMPTY_NAME: &str = "name must not be empty";

/// Parsed contacts plus the per-row report.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub report: ImportReport,
    /// Contacts in order of first appearance.
    pub contacts: Vec<ContactDraft>,
}

/// Result of an import that was persisted through a directory.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub report: ImportReport,
    pub created: Vec<Contact>,
}

impl ImportOutcome {
    fn structural(message: &str) -> Self {
        Self {
            report: ImportReport::structural(message),
            contacts: Vec::new(),
        }
    }
}

/// Parse an `.xlsx` workbook into contact drafts.
///
/// Only the first worksheet is read. Unreadable bytes fail the whole call;
/// a missing worksheet or a sheet without data rows yields a report with a
/// single row-0 error.
pub fn import(bytes: &[u8]) -> Result<ImportOutcome> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        warn!("Import aborted: {}", NO_WORKSHEET);
        return Ok(ImportOutcome::structural(NO_WORKSHEET));
    };
    let range = workbook.worksheet_range(&sheet)?;
    let outcome = import_range(Some(&range));

    info!(
        "Workbook import finished: {} rows, {} imported, {} failed, {} contacts",
        outcome.report.total_count,
        outcome.report.success_count,
        outcome.report.error_count(),
        outcome.contacts.len()
    );
    Ok(outcome)
}

/// Parse a workbook and store the resulting contacts in one batch.
///
/// Rows that failed are reported and skipped; the remaining contacts are
/// created all or nothing.
pub fn import_into<D>(directory: &D, bytes: &[u8]) -> Result<ImportSummary>
where
    D: ContactDirectory + ?Sized,
{
    let ImportOutcome { report, contacts } = import(bytes)?;
    if contacts.is_empty() {
        return Ok(ImportSummary {
            report,
            created: Vec::new(),
        });
    }

    let created = directory.create_many(&contacts)?;
    info!("Stored {} imported contacts", created.len());
    Ok(ImportSummary { report, created })
}

/// Contacts under construction, keyed by trimmed name.
#[derive(Default)]
struct Groups {
    drafts: Vec<ContactDraft>,
    by_name: HashMap<String, usize>,
}

enum RowStatus {
    MissingName,
    Imported,
}

/// Why a row with a name was rejected.
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error(transparent)]
    Cell(#[from] CellError),

    #[error(transparent)]
    Invalid(#[from] DirectoryError),
}

pub(crate) fn import_range(range: Option<&Range<Data>>) -> ImportOutcome {
    let Some(range) = range else {
        return ImportOutcome::structural(NO_WORKSHEET);
    };

    // 1-based index of the last used row; 0 for an empty sheet.
    let last_row = range.end().map_or(0, |(row, _)| row + 1);
    if last_row <= 1 {
        warn!("Import aborted: {}", NO_DATA);
        return ImportOutcome::structural(NO_DATA);
    }

    let mut groups = Groups::default();
    let mut report = ImportReport::default();

    for row_number in 2..=last_row {
        let row = row_number - 1;
        match process_row(range, row, &mut groups) {
            Ok(RowStatus::Imported) => report.success_count += 1,
            Ok(RowStatus::MissingName) => report.errors.push(ImportError {
                row_number,
                contact_name: String::new(),
                error_message: EMPTY_NAME.to_string(),
            }),
            Err(e) => {
                debug!("Row {} failed: {}", row_number, e);
                report.errors.push(ImportError {
                    row_number,
                    contact_name: cell::text(range, row, col::NAME).unwrap_or_default(),
                    error_message: e.to_string(),
                });
            }
        }
    }
    report.total_count = last_row - 1;

    ImportOutcome {
        report,
        contacts: groups.drafts,
    }
}

/// Fold one data row into `groups`. All cells are read and checked against
/// the directory's field limits before anything is mutated, so a failing
/// row leaves no trace and the surviving drafts always persist.
fn process_row(
    range: &Range<Data>,
    row: u32,
    groups: &mut Groups,
) -> std::result::Result<RowStatus, RowError> {
    let name = cell::text(range, row, col::NAME)?.trim().to_string();
    if name.is_empty() {
        return Ok(RowStatus::MissingName);
    }

    let method = read_method(range, row)?;
    if let Some(method) = &method {
        validate::method(method)?;
    }

    let index = match groups.by_name.get(&name) {
        Some(&index) => index,
        None => {
            let draft = read_contact(range, row, &name)?;
            validate::contact_fields(&draft)?;
            groups.drafts.push(draft);
            groups.by_name.insert(name, groups.drafts.len() - 1);
            groups.drafts.len() - 1
        }
    };

    if let Some(method) = method {
        groups.drafts[index].methods.push(method);
    }
    Ok(RowStatus::Imported)
}

fn read_contact(
    range: &Range<Data>,
    row: u32,
    name: &str,
) -> std::result::Result<ContactDraft, CellError> {
    Ok(ContactDraft {
        name: name.to_string(),
        company: cell::optional(range, row, col::COMPANY)?,
        position: cell::optional(range, row, col::POSITION)?,
        notes: cell::optional(range, row, col::NOTES)?,
        is_favorite: cell::text(range, row, col::FAVORITE)?.trim() == FAVORITE_YES,
        photo_path: None,
        methods: Vec::new(),
    })
}

/// The row's contact method, `None` when the value cell is blank.
fn read_method(range: &Range<Data>, row: u32) -> std::result::Result<Option<MethodDraft>, CellError> {
    let kind = cell::text(range, row, col::METHOD_TYPE)?;
    let label = cell::optional(range, row, col::METHOD_LABEL)?;
    let Some(value) = cell::optional(range, row, col::METHOD_VALUE)? else {
        return Ok(None);
    };

    Ok(Some(MethodDraft {
        kind: ContactMethodType::from_display_label(&kind),
        label,
        value,
        is_primary: false,
    }))
}
