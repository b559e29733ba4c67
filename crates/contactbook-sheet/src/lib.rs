//! # contactbook-sheet
//!
//! Spreadsheet import/export of contacts.
//!
//! ## Layout
//!
//! One worksheet, eight columns, row 1 is the header:
//!
//! | Col | Header | Content |
//! |-----|--------|---------|
//! | 1 | 姓名 | name |
//! | 2 | 公司 | company |
//! | 3 | 职位 | position |
//! | 4 | 备注 | notes |
//! | 5 | 是否收藏 | favorite, `是` / `否` |
//! | 6 | 联系方式类型 | method type display label |
//! | 7 | 联系方式标签 | method label |
//! | 8 | 联系方式值 | method value |
//!
//! A contact occupies one row per contact method (one row if it has none),
//! with the contact columns repeated. Import groups rows back into contacts
//! by exact trimmed name.

mod cell;
pub mod export;
pub mod import;

pub use export::{export, export_template};
pub use import::{import, import_into, ImportOutcome, ImportSummary};

use contactbook_directory::DirectoryError;

/// Name of the exported worksheet.
pub const SHEET_NAME: &str = "联系人列表";

/// Header row, in column order.
pub const HEADERS: [&str; 8] = [
    "姓名",
    "公司",
    "职位",
    "备注",
    "是否收藏",
    "联系方式类型",
    "联系方式标签",
    "联系方式值",
];

/// Zero-based column indices.
pub(crate) mod col {
    pub const NAME: u16 = 0;
    pub const COMPANY: u16 = 1;
    pub const POSITION: u16 = 2;
    pub const NOTES: u16 = 3;
    pub const FAVORITE: u16 = 4;
    pub const METHOD_TYPE: u16 = 5;
    pub const METHOD_LABEL: u16 = 6;
    pub const METHOD_VALUE: u16 = 7;
}

/// Spreadsheet error types.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("unreadable workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
