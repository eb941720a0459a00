use alloc::string::ToString;

use rstest::rstest;

use crate::{Error, ErrorKind, ErrorPolicy, SourceLocation};

#[rstest]
#[case(101, Some(ErrorKind::Parse))]
#[case(199, Some(ErrorKind::Parse))]
#[case(204, Some(ErrorKind::InvalidIterator))]
#[case(302, Some(ErrorKind::Type))]
#[case(408, Some(ErrorKind::OutOfRange))]
#[case(501, Some(ErrorKind::Other))]
#[case(10_101, Some(ErrorKind::Parse))]
#[case(42, None)]
#[case(601, None)]
#[case(999, None)]
fn classifies_ids_by_category_digit(#[case] id: u16, #[case] expected: Option<ErrorKind>) {
    assert_eq!(ErrorKind::from_id(id), expected);
    assert_eq!(Error::from_id(id, "m", SourceLocation::default()).map(|e| e.kind()), expected);
}

#[rstest]
#[case(ErrorKind::Parse, "parse_error")]
#[case(ErrorKind::InvalidIterator, "invalid_iterator")]
#[case(ErrorKind::Type, "type_error")]
#[case(ErrorKind::OutOfRange, "out_of_range")]
#[case(ErrorKind::Other, "other_error")]
fn kind_names(#[case] kind: ErrorKind, #[case] name: &str) {
    assert_eq!(kind.to_string(), name);
}

#[test]
fn display_carries_kind_and_id() {
    let error = Error::parse_error(
        101,
        "syntax error while parsing value",
        SourceLocation::new(3, 0, 3),
    );
    assert_eq!(
        error.to_string(),
        "[json.exception.parse_error.101] syntax error while parsing value"
    );
    assert_eq!(error.location().byte_pos, 3);
}

#[test]
fn location_display() {
    assert_eq!(
        SourceLocation::new(10, 2, 4).to_string(),
        "byte: 10 line: 2 column: 4"
    );
}

#[test]
fn policies() {
    let error = Error::out_of_range(406, "number overflow", SourceLocation::default());
    assert_eq!(ErrorPolicy::Raise.apply(&error), Err(error.clone()));
    assert_eq!(ErrorPolicy::Record.apply(&error), Ok(false));
    assert_eq!(ErrorPolicy::default(), ErrorPolicy::Raise);
}
