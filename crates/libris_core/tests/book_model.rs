use libris_core::{Book, BookStateError, DecodeError, Entity};

#[test]
fn new_book_is_available() {
    let book = Book::new(1, "Alpha", "Orwell", 1949);

    assert_eq!(book.id(), 1);
    assert_eq!(book.title(), "Alpha");
    assert_eq!(book.author(), "Orwell");
    assert_eq!(book.year(), 1949);
    assert!(book.is_available());
    assert!(!book.is_checked_out());
}

#[test]
fn check_out_scenario_encodes_flag_and_rejects_repeat() {
    let mut book = Book::new(1, "Alpha", "Orwell", 1949);
    assert_eq!(book.encode(), "1|Alpha|Orwell|1949|0");

    book.check_out().unwrap();
    assert_eq!(book.encode(), "1|Alpha|Orwell|1949|1");

    let err = book.check_out().unwrap_err();
    assert_eq!(err, BookStateError::AlreadyCheckedOut(1));
    assert!(book.is_checked_out());
    assert_eq!(book.encode(), "1|Alpha|Orwell|1949|1");
}

#[test]
fn return_then_check_out_again() {
    let mut book = Book::new(5, "Beta", "Huxley", 1932);
    book.check_out().unwrap();
    book.return_back().unwrap();
    assert!(book.is_available());
    assert_eq!(book.return_back(), Err(BookStateError::NotCheckedOut(5)));
    book.check_out().unwrap();
}

#[test]
fn decode_reproduces_encoded_book() {
    let samples = [
        Book::new(1, "Alpha", "Orwell", 1949),
        Book::new(u64::MAX, "", "Anonymous", -300),
        Book::new(77, "War and Peace", "Tolstoy, Leo", 1869),
    ];

    for mut book in samples {
        assert_eq!(Book::decode(&book.encode()).unwrap(), book);
        book.check_out().unwrap();
        assert_eq!(Book::decode(&book.encode()).unwrap(), book);
    }
}

#[test]
fn delimiter_in_text_is_escaped_lossily() {
    let book = Book::new(2, "Either|Or", "Kierkegaard", 1843);
    let decoded = Book::decode(&book.encode()).unwrap();

    assert_eq!(decoded.title(), "Either/Or");
    assert_eq!(decoded.author(), "Kierkegaard");
    assert_eq!(decoded.year(), 1843);
}

#[test]
fn decode_rejects_missing_fields() {
    let err = Book::decode("3|Gamma|Someone|2001").unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingFields {
            expected: 5,
            found: 4
        }
    );
}

#[test]
fn decode_rejects_non_numeric_id() {
    let err = Book::decode("x|Gamma|Someone|2001|0").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidNumber { field: "id", .. }));
}

#[test]
fn json_uses_expected_wire_fields() {
    let mut book = Book::new(9, "Dune", "Herbert", 1965);
    book.check_out().unwrap();

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], 9);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["author"], "Herbert");
    assert_eq!(json["year"], 1965);
    assert_eq!(json["checked_out"], true);

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
}
