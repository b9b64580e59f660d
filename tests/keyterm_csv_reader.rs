use std::io::{self, Cursor, Read};

use storyproducer_core::model::keyterm::Keyterm;
use storyproducer_core::parsers::keyterm_csv::{self, KeytermCsvReader};
use storyproducer_core::CoreError;

const HEADER: &str = "term,otherForms,alternateRenderings,notes,relatedTerms\n";

const SPLIT_RESULT: &[&str] = &["thing", "something else", "completely different yet related thing"];
const TRIMMED_RESULT: &[&str] = &["thing", "something else"];

fn keyterm(
    term: &str,
    other_forms: &[&str],
    alternate_renderings: &[&str],
    notes: &str,
    related_terms: &[&str],
) -> Keyterm {
    Keyterm {
        term: term.to_string(),
        other_forms: owned(other_forms),
        alternate_renderings: owned(alternate_renderings),
        notes: notes.to_string(),
        related_terms: owned(related_terms),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read_rows(rows: &str) -> Vec<Keyterm> {
    keyterm_csv::parse(&format!("{HEADER}{rows}")).unwrap()
}

fn related_terms(field: &str) -> Vec<String> {
    let keyterms = read_rows(&format!("disciple,,,,\"{field}\"\n"));
    assert_eq!(keyterms.len(), 1);
    keyterms[0].related_terms.clone()
}

fn other_forms(field: &str) -> Vec<String> {
    let keyterms = read_rows(&format!("disciple,\"{field}\",,,\n"));
    assert_eq!(keyterms.len(), 1);
    keyterms[0].other_forms.clone()
}

#[test]
fn all_fields_filled() {
    let actual = read_rows("disciple,disciples,student,Some notes.,apostle\n");
    assert_eq!(
        actual,
        [keyterm("disciple", &["disciples"], &["student"], "Some notes.", &["apostle"])]
    );
}

#[test]
fn term_field_empty_drops_row() {
    assert!(read_rows(",disciples,student,Some notes.,apostle\n").is_empty());
}

#[test]
fn whitespace_only_term_drops_row() {
    assert!(read_rows("   ,disciples,student,Some notes.,apostle\n").is_empty());
}

#[test]
fn other_forms_field_empty() {
    let actual = read_rows("disciple,,student,Some notes.,apostle\n");
    assert_eq!(actual, [keyterm("disciple", &[], &["student"], "Some notes.", &["apostle"])]);
}

#[test]
fn alternate_renderings_field_empty() {
    let actual = read_rows("disciple,disciples,,Some notes.,apostle\n");
    assert_eq!(actual, [keyterm("disciple", &["disciples"], &[], "Some notes.", &["apostle"])]);
}

#[test]
fn notes_field_empty() {
    let actual = read_rows("disciple,disciples,student,,apostle\n");
    assert_eq!(actual, [keyterm("disciple", &["disciples"], &["student"], "", &["apostle"])]);
}

#[test]
fn related_terms_field_empty() {
    let actual = read_rows("disciple,disciples,student,Some notes.,\n");
    assert_eq!(actual, [keyterm("disciple", &["disciples"], &["student"], "Some notes.", &[])]);
}

#[test]
fn multiple_related_terms_split_on_commas() {
    assert_eq!(
        related_terms("thing, something else, completely different yet related thing"),
        SPLIT_RESULT
    );
}

#[test]
fn multiple_related_terms_trim_whitespace_around_items() {
    for field in [
        "thing,   something else",
        "thing   , something else",
        "   thing   ,   something else   ",
        "  thing, something else",
        "thing, something else  ",
        "  thing, something else  ",
    ] {
        assert_eq!(related_terms(field), TRIMMED_RESULT, "field: {field:?}");
    }
}

#[test]
fn multiple_related_terms_drop_empty_items() {
    for field in [
        ",thing, something else, completely different yet related thing",
        "thing, something else, completely different yet related thing,",
        ",thing, something else, completely different yet related thing,",
        ",,, thing, something else, completely different yet related thing",
        "thing, something else, completely different yet related thing,,,",
        ",,thing,, something else, completely different yet related thing , ,",
    ] {
        assert_eq!(related_terms(field), SPLIT_RESULT, "field: {field:?}");
    }
}

#[test]
fn multiple_other_forms_split_on_commas() {
    let actual = read_rows(
        "disciple,\"thing, something else, completely different yet related thing\",,,\n",
    );
    assert_eq!(actual, [keyterm("disciple", SPLIT_RESULT, &[], "", &[])]);
}

#[test]
fn multiple_other_forms_trim_whitespace_around_items() {
    for field in [
        "  thing, something else",
        "thing  , something else  ",
        "  thing  ,  something else  ",
    ] {
        assert_eq!(other_forms(field), TRIMMED_RESULT, "field: {field:?}");
    }
}

#[test]
fn multiple_other_forms_drop_empty_items() {
    for field in [
        ",thing, something else, completely different yet related thing",
        "thing, something else, completely different yet related thing,",
        ",,thing, something else, completely different yet related thing,,",
    ] {
        assert_eq!(other_forms(field), SPLIT_RESULT, "field: {field:?}");
    }
}

#[test]
fn notes_are_trimmed_but_not_split() {
    let actual = read_rows("disciple,,,\"  Follows a rabbi, learns from him.  \",\n");
    assert_eq!(actual[0].notes, "Follows a rabbi, learns from him.");
}

#[test]
fn header_row_is_never_data() {
    // Header cells that look like values still only name columns.
    let actual = read_rows("term,otherForms,alternateRenderings,notes,relatedTerms\n");
    assert_eq!(
        actual,
        [keyterm(
            "term",
            &["otherForms"],
            &["alternateRenderings"],
            "notes",
            &["relatedTerms"]
        )]
    );

    assert!(keyterm_csv::parse(HEADER).unwrap().is_empty());
}

#[test]
fn rows_keep_input_order() {
    let actual = read_rows(
        "disciple,disciples,,,\n\
         ,orphan,,,\n\
         apostle,apostles,,,\n\
         disciple,,,duplicate rows are kept,\n",
    );
    let terms: Vec<&str> = actual.iter().map(|k| k.term.as_str()).collect();
    assert_eq!(terms, ["disciple", "apostle", "disciple"]);
}

#[test]
fn human_readable_header_is_accepted() {
    let text = "Term,Other Forms,Alternate Renderings,Notes,Related Terms\n\
                disciple,disciples,student,Some notes.,apostle\n";
    let actual = keyterm_csv::parse(text).unwrap();
    assert_eq!(
        actual,
        [keyterm("disciple", &["disciples"], &["student"], "Some notes.", &["apostle"])]
    );
}

#[test]
fn columns_are_found_by_name() {
    let text = "relatedTerms,notes,term,alternateRenderings,otherForms\n\
                apostle,Some notes.,disciple,student,disciples\n";
    let actual = keyterm_csv::parse(text).unwrap();
    assert_eq!(
        actual,
        [keyterm("disciple", &["disciples"], &["student"], "Some notes.", &["apostle"])]
    );
}

#[test]
fn missing_column_fails_before_reading_rows() {
    let text = "term,otherForms,notes,relatedTerms\ndisciple,,,\n";
    let err = keyterm_csv::parse(text).unwrap_err();
    assert!(matches!(err, CoreError::MissingColumn("alternateRenderings")), "{err}");
}

#[test]
fn wrong_column_count_fails_with_line() {
    let text = format!(
        "{HEADER}disciple,disciples,student,Some notes.,apostle\napostle,apostles,messenger,notes\n"
    );
    let err = keyterm_csv::parse(&text).unwrap_err();
    assert!(
        matches!(
            err,
            CoreError::MalformedRecord {
                line: 3,
                expected: 5,
                found: 4
            }
        ),
        "{err}"
    );
}

#[test]
fn blank_lines_are_skipped() {
    let actual = read_rows("\ndisciple,disciples,,,\n   \n,,,,\n");
    assert_eq!(actual.len(), 1);
}

#[test]
fn empty_source_yields_nothing() {
    assert!(keyterm_csv::parse("").unwrap().is_empty());
}

#[test]
fn source_is_handed_back_unclosed() {
    let mut cursor = Cursor::new(format!("{HEADER}disciple,,,,\n").into_bytes());

    let mut reader = KeytermCsvReader::new(&mut cursor);
    assert_eq!(reader.read_all().unwrap().len(), 1);
    drop(reader);

    // Still usable by the caller.
    cursor.set_position(0);
    let mut first = [0u8; 4];
    cursor.read_exact(&mut first).unwrap();
    assert_eq!(&first, b"term");
}

struct FailingSource;

impl Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "source went away"))
    }
}

#[test]
fn read_failures_propagate_as_io_errors() {
    let err = KeytermCsvReader::new(FailingSource).read_all().unwrap_err();
    match err {
        CoreError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected I/O error, got {other}"),
    }
}
