//! Contacts -> workbook.

use contactbook_types::{Contact, ContactMethod, ContactMethodType, FAVORITE_NO, FAVORITE_YES};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet};
use tracing::info;

use crate::{col, Result, HEADERS, SHEET_NAME};

/// Header background (light blue).
const HEADER_FILL: u32 = 0xADD8E6;

/// Render contacts as an `.xlsx` workbook.
///
/// Rows follow the order of `contacts` and of each contact's methods; no
/// sorting or deduplication happens here.
pub fn export(contacts: &[Contact]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);
    for (column, title) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, column, title, &header)?;
    }

    let mut row = 1u32;
    for contact in contacts {
        if contact.methods.is_empty() {
            write_contact_columns(worksheet, row, contact)?;
            row += 1;
            continue;
        }
        for method in &contact.methods {
            write_contact_columns(worksheet, row, contact)?;
            write_method_columns(
                worksheet,
                row,
                method.kind,
                method.label.as_deref(),
                &method.value,
            )?;
            row += 1;
        }
    }

    worksheet.autofit();
    let bytes = workbook.save_to_buffer()?;

    info!("Exported {} contacts ({} rows) to workbook", contacts.len(), row - 1);
    Ok(bytes)
}

/// A workbook holding one sample contact, for users to fill in.
pub fn export_template() -> Result<Vec<u8>> {
    let sample_method = |kind: ContactMethodType, label: &str, value: &str| ContactMethod {
        id: 0,
        contact_id: 0,
        kind,
        label: Some(label.to_string()),
        value: value.to_string(),
        is_primary: false,
        created_at: 0,
    };
    let sample = Contact {
        id: 0,
        name: "张三".to_string(),
        company: Some("示例公司".to_string()),
        position: Some("经理".to_string()),
        notes: Some("这是一个示例联系人".to_string()),
        is_favorite: true,
        photo_path: None,
        created_at: 0,
        updated_at: 0,
        methods: vec![
            sample_method(ContactMethodType::Phone, "手机", "13800138000"),
            sample_method(ContactMethodType::Email, "工作邮箱", "zhangsan@example.com"),
        ],
    };
    export(std::slice::from_ref(&sample))
}

fn write_contact_columns(worksheet: &mut Worksheet, row: u32, contact: &Contact) -> Result<()> {
    worksheet.write_string(row, col::NAME, &contact.name)?;
    write_optional(worksheet, row, col::COMPANY, contact.company.as_deref())?;
    write_optional(worksheet, row, col::POSITION, contact.position.as_deref())?;
    write_optional(worksheet, row, col::NOTES, contact.notes.as_deref())?;
    let favorite = if contact.is_favorite { FAVORITE_YES } else { FAVORITE_NO };
    worksheet.write_string(row, col::FAVORITE, favorite)?;
    Ok(())
}

fn write_method_columns(
    worksheet: &mut Worksheet,
    row: u32,
    kind: ContactMethodType,
    label: Option<&str>,
    value: &str,
) -> Result<()> {
    worksheet.write_string(row, col::METHOD_TYPE, kind.display_label())?;
    write_optional(worksheet, row, col::METHOD_LABEL, label)?;
    worksheet.write_string(row, col::METHOD_VALUE, value)?;
    Ok(())
}

/// Absent values leave the cell blank.
fn write_optional(worksheet: &mut Worksheet, row: u32, column: u16, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        worksheet.write_string(row, column, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn contact(id: i64, name: &str, favorite: bool, methods: Vec<ContactMethod>) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            company: Some("Acme".to_string()),
            position: None,
            notes: None,
            is_favorite: favorite,
            photo_path: None,
            created_at: 0,
            updated_at: 0,
            methods,
        }
    }

    fn method(kind: ContactMethodType, label: Option<&str>, value: &str) -> ContactMethod {
        ContactMethod {
            id: 0,
            contact_id: 0,
            kind,
            label: label.map(str::to_string),
            value: value.to_string(),
            is_primary: false,
            created_at: 0,
        }
    }

    /// Read back every row as trimmed strings.
    fn read_rows(bytes: Vec<u8>) -> (Vec<String>, Vec<Vec<String>>) {
        let mut workbook = Xlsx::new(Cursor::new(bytes)).expect("open workbook");
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(&names[0]).expect("range");
        let rows = range
            .rows()
            .map(|row| {
                (0..8)
                    .map(|c| match row.get(c) {
                        Some(Data::String(s)) => s.clone(),
                        Some(Data::Empty) | None => String::new(),
                        Some(other) => other.to_string(),
                    })
                    .collect()
            })
            .collect();
        (names, rows)
    }

    #[test]
    fn test_header_and_sheet_name() {
        let (names, rows) = read_rows(export(&[]).expect("export"));
        assert_eq!(names, [SHEET_NAME]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], HEADERS);
    }

    #[test]
    fn test_one_row_per_method_with_repeated_contact_columns() {
        let contacts = vec![
            contact(
                1,
                "Alice",
                true,
                vec![
                    method(ContactMethodType::Phone, Some("work"), "123"),
                    method(ContactMethodType::WeChat, None, "alice_wx"),
                ],
            ),
            contact(2, "Bob", false, Vec::new()),
        ];

        let (_, rows) = read_rows(export(&contacts).expect("export"));
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[1], ["Alice", "Acme", "", "", "是", "手机", "work", "123"]);
        assert_eq!(rows[2], ["Alice", "Acme", "", "", "是", "微信", "", "alice_wx"]);
        assert_eq!(rows[3], ["Bob", "Acme", "", "", "否", "", "", ""]);
    }

    #[test]
    fn test_input_order_is_kept() {
        let contacts = vec![
            contact(1, "Zed", false, Vec::new()),
            contact(2, "Amy", false, Vec::new()),
        ];
        let (_, rows) = read_rows(export(&contacts).expect("export"));
        assert_eq!(rows[1][0], "Zed");
        assert_eq!(rows[2][0], "Amy");
    }

    #[test]
    fn test_every_type_renders_through_label_table() {
        let methods = ContactMethodType::ALL
            .iter()
            .map(|kind| method(*kind, None, "v"))
            .collect();
        let (_, rows) = read_rows(export(&[contact(1, "All", false, methods)]).expect("export"));
        let rendered: Vec<_> = rows[1..].iter().map(|r| r[5].clone()).collect();
        assert_eq!(rendered, ["手机", "电话", "邮箱", "微信", "QQ", "地址", "其他"]);
    }

    #[test]
    fn test_template_has_two_rows() {
        let (_, rows) = read_rows(export_template().expect("template"));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "张三");
        assert_eq!(rows[2][5], "邮箱");
    }
}
