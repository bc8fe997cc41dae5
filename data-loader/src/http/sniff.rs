//! Content sniffing for uploaded spreadsheets. The declared name and content type are ignored.

/// Detected file extension, or `None` when the content is not recognized.
///
/// Office Open XML packages are ZIP archives and legacy Office files share the OLE2 container,
/// so the spreadsheet matchers run before the generic lookup.
pub fn detect(bytes: &[u8]) -> Option<&'static str> {
    if infer::doc::is_xlsx(bytes) {
        return Some("xlsx");
    }
    if infer::doc::is_xls(bytes) {
        return Some("xls");
    }
    infer::get(bytes).map(|kind| kind.extension())
}

pub fn is_spreadsheet(extension: &str) -> bool {
    matches!(extension, "xls" | "xlsx")
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_detects_legacy_excel() {
        assert_eq!(detect(&xls()), Some("xls"));
    }

    #[test]
    fn test_word_compound_file_is_not_a_spreadsheet() {
        assert!(!detect(&doc()).is_some_and(is_spreadsheet));
    }

    #[test]
    fn test_zip_with_workbook_entry_is_xlsx() {
        let bytes = zip_with_entry("xl/workbook.xml", b"<workbook/>");
        assert_eq!(detect(&bytes), Some("xlsx"));
    }

    #[test]
    fn test_plain_zip_with_nested_xl_entry_is_not_a_spreadsheet() {
        let bytes = zip_with_entry("docs/xl/readme.txt", b"hello");
        assert_eq!(detect(&bytes), Some("zip"));
        assert!(!is_spreadsheet("zip"));
    }

    #[test]
    fn test_unknown_content() {
        assert_eq!(detect(b"col_a,col_b\n1,2\n"), None);
        assert_eq!(detect(b""), None);
    }
}
