//! Cell-to-text coercion.

use calamine::{Data, Range};

/// A cell that cannot be read as text.
#[derive(Debug, thiserror::Error)]
#[error("column {column} holds spreadsheet error value {value}")]
pub struct CellError {
    pub column: u16,
    pub value: String,
}

/// Text of the cell at 0-based (`row`, `column`), untrimmed.
///
/// Missing and empty cells read as "". Numbers print without a trailing
/// `.0`, so long phone numbers stored as numeric cells survive.
pub fn text(range: &Range<Data>, row: u32, column: u16) -> Result<String, CellError> {
    let Some(data) = range.get_value((row, u32::from(column))) else {
        return Ok(String::new());
    };

    let text = match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => {
            return Err(CellError {
                column: column + 1,
                value: format!("{e:?}"),
            })
        }
        other => other.to_string(),
    };
    Ok(text)
}

/// Trimmed text, `None` when blank.
pub fn optional(range: &Range<Data>, row: u32, column: u16) -> Result<Option<String>, CellError> {
    let value = text(range, row, column)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn range_with(data: Data) -> Range<Data> {
        let mut range = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), data);
        range
    }

    #[test]
    fn test_numbers_have_no_fraction() {
        let range = range_with(Data::Float(13800138000.0));
        assert_eq!(text(&range, 0, 0).expect("text"), "13800138000");

        let range = range_with(Data::Float(1.5));
        assert_eq!(text(&range, 0, 0).expect("text"), "1.5");

        let range = range_with(Data::Int(42));
        assert_eq!(text(&range, 0, 0).expect("text"), "42");
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let range = range_with(Data::String("x".to_string()));
        assert_eq!(text(&range, 0, 1).expect("empty cell"), "");
        assert_eq!(text(&range, 5, 7).expect("outside range"), "");
        assert_eq!(optional(&range, 5, 7).expect("outside range"), None);
    }

    #[test]
    fn test_optional_trims() {
        let range = range_with(Data::String("  Acme  ".to_string()));
        assert_eq!(optional(&range, 0, 0).expect("text"), Some("Acme".to_string()));

        let range = range_with(Data::String("   ".to_string()));
        assert_eq!(optional(&range, 0, 0).expect("text"), None);
    }

    #[test]
    fn test_error_cells_fail() {
        let range = range_with(Data::Error(CellErrorType::NA));
        let err = text(&range, 0, 0).expect_err("error cell");
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_bool_cells() {
        let range = range_with(Data::Bool(true));
        assert_eq!(text(&range, 0, 0).expect("text"), "TRUE");
    }
}
