use datawrapper_export::collector::{resolve_filename, ChartMetadata};
use datawrapper_export::numbering::{ChartNumbering, NumberLookup};
use datawrapper_export::output::write_metadata;
use tempfile::TempDir;

#[test]
fn test_numbering_file_drives_filenames() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("numbering.csv");
    std::fs::write(
        &path,
        "Chart number,Chart ID,Chart title,iframe code,Folder path\n\
         12,abc123,GDP growth,,Economy\n\
         ,def456,Inflation,,Economy\n",
    )
    .unwrap();

    let numbering = ChartNumbering::from_csv_path(&path).unwrap();
    assert_eq!(numbering.lookup("abc123"), NumberLookup::Found("12"));
    assert_eq!(numbering.lookup("def456"), NumberLookup::Blank);

    assert_eq!(
        resolve_filename("abc123", "GDP growth", Some(&numbering)),
        "12-GDP growth"
    );
    assert_eq!(
        resolve_filename("def456", "Inflation", Some(&numbering)),
        "def456-Inflation"
    );
    assert_eq!(
        resolve_filename("ghi789", "Wages: 2019/20", Some(&numbering)),
        "ghi789-Wages 201920"
    );
}

fn row(number: &str, chart_id: &str, title: &str) -> ChartMetadata {
    ChartMetadata {
        chart_number: number.to_string(),
        chart_id: chart_id.to_string(),
        title: title.to_string(),
        iframe_code: "<iframe>".to_string(),
        folder_path: "Economy".to_string(),
    }
}

#[test]
fn test_listed_workbook_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chart_numbering.xlsx");
    write_metadata(
        &path,
        &[
            row("12", "abc123", "GDP growth"),
            row("", "def456", "Inflation"),
            row("3.1", "00789", "Wages"),
        ],
    )
    .unwrap();

    let numbering = ChartNumbering::from_path(&path).unwrap();

    assert_eq!(numbering.len(), 3);
    assert_eq!(numbering.lookup("abc123"), NumberLookup::Found("12"));
    assert_eq!(numbering.lookup("def456"), NumberLookup::Blank);
    assert_eq!(numbering.lookup("00789"), NumberLookup::Found("3.1"));
    assert_eq!(
        resolve_filename("abc123", "GDP growth", Some(&numbering)),
        "12-GDP growth"
    );
}
