#[cfg(test)]
mod tests {
    use crate::error::LoadError;
    use crate::parsing::csv_parser::{load_table, parse_table_reader, parse_table_str};
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "Company,Valuation,Date Joined,Industry,City,Country/Region,Continent,Year Founded,Funding,Select Investors";

    /// Helper to create a temp CSV file
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_load_basic_table() {
        let content = format!(
            "{}\nBytedance,$180B,2017-04-07,Artificial intelligence,Beijing,China,Asia,2012,$8B,\"Sequoia Capital China, SIG Asia Investments\"\n",
            HEADER
        );
        let temp_file = create_temp_csv(&content);

        let df = load_table(temp_file.path(), b',').unwrap();
        assert_eq!(df.shape(), (1, 10));
        let investors = df.column("Select Investors").unwrap().str().unwrap();
        assert_eq!(
            investors.get(0),
            Some("Sequoia Capital China, SIG Asia Investments")
        );
    }

    #[test]
    fn test_empty_fields_become_missing() {
        let content = format!(
            "{}\nHyperLedger,$1B,2021-06-01,Fintech,,Singapore,Asia,2018,$0.2B,\n",
            HEADER
        );
        let df = parse_table_str(&content, b',').unwrap();
        assert_eq!(df.column("City").unwrap().null_count(), 1);
        assert_eq!(df.column("Select Investors").unwrap().null_count(), 1);
        assert_eq!(df.column("Funding").unwrap().str().unwrap().get(0), Some("$0.2B"));
    }

    #[test]
    fn test_whitespace_only_field_is_missing() {
        let content = format!("{}\nA,$1B,2021-06-01,Fintech,   ,Singapore,Asia,2018,$1B,X\n", HEADER);
        let df = parse_table_str(&content, b',').unwrap();
        assert!(df.column("City").unwrap().str().unwrap().get(0).is_none());
    }

    #[test]
    fn test_row_order_is_preserved() {
        let content = format!(
            "{}\nA,$1B,2021-01-01,X,C1,US,NA,2010,$1B,I\nB,$2B,2021-01-01,X,C2,US,NA,2010,$1B,I\nC,$3B,2021-01-01,X,C3,US,NA,2010,$1B,I\n",
            HEADER
        );
        let df = parse_table_str(&content, b',').unwrap();
        let names: Vec<_> = df.column("Company").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(names, vec![Some("A"), Some("B"), Some("C")]);
    }

    #[test]
    fn test_custom_delimiter() {
        let content = HEADER.replace(',', ";")
            + "\nA;$1B;2021-01-01;X;Paris;France;Europe;2010;$1B;I\n";
        let df = parse_table_str(&content, b';').unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("City").unwrap().str().unwrap().get(0), Some("Paris"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = load_table(Path::new("/definitely/not/here.csv"), b',');
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_missing_required_columns_are_reported() {
        let content = "Company,Valuation\nA,$1B\n";
        match parse_table_str(content, b',') {
            Err(LoadError::MissingColumns(cols)) => {
                assert!(cols.contains(&"City".to_string()));
                assert!(cols.contains(&"Date Joined".to_string()));
                assert!(!cols.contains(&"Company".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let content = format!("{}\nA,$1B,2021-01-01\n", HEADER);
        let result = parse_table_str(&content, b',');
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_empty_input_has_empty_header() {
        let result = parse_table_reader("".as_bytes(), b',', None);
        assert!(matches!(result, Err(LoadError::EmptyHeader)));
    }

    #[test]
    fn test_duplicate_header_is_malformed() {
        let result = parse_table_reader("a,a\n1,2\n".as_bytes(), b',', None);
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let df = parse_table_str(HEADER, b',').unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 10);
    }
}
