use libris_core::{Book, Entity, LoadReport, Store, StoreError};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

fn sample_store() -> Store<Book> {
    let store = Store::new();
    store.insert(Book::new(1, "Alpha", "Orwell", 1949));
    store.insert(Book::new(2, "Beta", "Huxley", 1932));
    store.insert(Book::new(3, "Gamma", "Orwell", 1945));
    store
}

#[test]
fn insert_returns_handle_to_stored_entity() {
    let store = Store::new();
    let handle = store.insert(Book::new(1, "Alpha", "Orwell", 1949));

    handle.update(|book| book.check_out()).unwrap();

    let found = store.find_by_id(1).unwrap();
    assert!(found.ptr_eq(&handle));
    assert!(found.read(|book| book.is_checked_out()));
}

#[test]
fn find_where_keeps_insertion_order() {
    let store = sample_store();

    let orwell: Vec<u64> = store
        .find_where(|book| book.author() == "Orwell")
        .iter()
        .map(|handle| handle.id())
        .collect();
    assert_eq!(orwell, vec![1, 3]);

    let all: Vec<u64> = store.all().iter().map(|handle| handle.id()).collect();
    assert_eq!(all, vec![1, 2, 3]);
}

#[test]
fn find_by_id_missing_returns_none() {
    let store = sample_store();
    assert!(store.find_by_id(42).is_none());
}

#[test]
fn remove_where_removes_exactly_matches() {
    let store = sample_store();

    let removed = store.remove_where(|book| book.author() == "Orwell");

    assert_eq!(removed, 2);
    assert_eq!(store.len(), 1);
    assert!(store.find_by_id(1).is_none());
    assert!(store.find_by_id(3).is_none());
    assert!(store.find_by_id(2).is_some());
    assert_eq!(store.remove_where(|book| book.year() > 3000), 0);
}

#[test]
fn handle_outlives_removal() {
    let store = sample_store();
    let handle = store.find_by_id(2).unwrap();

    store.remove_where(|book| book.id() == 2);

    assert_eq!(handle.read(|book| book.title().to_string()), "Beta");
    handle.update(|book| book.check_out()).unwrap();
    assert!(store.find_by_id(2).is_none());
}

#[test]
fn all_is_a_snapshot() {
    let store = sample_store();
    let snapshot = store.all();

    store.insert(Book::new(4, "Delta", "Le Guin", 1969));

    assert_eq!(snapshot.len(), 3);
    assert_eq!(store.len(), 4);
}

#[test]
fn concurrent_inserts_are_all_kept() {
    let store: Arc<Store<Book>> = Arc::new(Store::new());
    let threads = 8;
    let per_thread = 50;

    let workers: Vec<_> = (0..threads)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for offset in 0..per_thread {
                    let id = (worker * per_thread + offset + 1) as u64;
                    store.insert(Book::new(id, format!("Book {id}"), "Author", 2000));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let total = threads * per_thread;
    assert_eq!(store.len(), total);
    let ids: HashSet<u64> = store.ids().into_iter().collect();
    assert_eq!(ids.len(), total);
    assert!((1..=total as u64).all(|id| ids.contains(&id)));
}

#[test]
fn save_writes_one_line_per_entity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    let store = sample_store();
    store
        .find_by_id(2)
        .unwrap()
        .update(|book| book.check_out())
        .unwrap();

    let written = store.save(&path).unwrap();

    assert_eq!(written, 3);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1|Alpha|Orwell|1949|0\n2|Beta|Huxley|1932|1\n3|Gamma|Orwell|1945|0\n"
    );
}

#[test]
fn save_truncates_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    fs::write(&path, "old|junk\nmore|junk\nand|more|junk\n").unwrap();

    let store = Store::new();
    store.insert(Book::new(1, "Alpha", "Orwell", 1949));
    store.save(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1|Alpha|Orwell|1949|0\n");
}

#[test]
fn save_into_missing_directory_fails_with_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("books.txt");

    let err = sample_store().save(&path).unwrap_err();

    assert!(matches!(err, StoreError::Io { path: ref failed, .. } if *failed == path));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    let original = sample_store();
    original
        .find_by_id(3)
        .unwrap()
        .update(|book| book.check_out())
        .unwrap();
    original.save(&path).unwrap();

    let restored: Store<Book> = Store::new();
    let report = restored.load(&path).unwrap();

    assert_eq!(
        report,
        LoadReport {
            file_found: true,
            loaded: 3,
            skipped: 0
        }
    );
    let before: Vec<Book> = original.all().iter().map(|h| h.snapshot()).collect();
    let after: Vec<Book> = restored.all().iter().map(|h| h.snapshot()).collect();
    assert_eq!(before, after);
}

#[test]
fn load_skips_malformed_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    fs::write(
        &path,
        "1|Alpha|Orwell|1949|0\n\n   \n2|Beta|Huxley|1932\n3|Gamma|Orwell|year|0\n",
    )
    .unwrap();

    let store: Store<Book> = Store::new();
    let report = store.load(&path).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(store.ids(), vec![1]);
    assert_eq!(store.find_by_id(1).unwrap().read(Book::encode), "1|Alpha|Orwell|1949|0");
}

#[test]
fn load_replaces_existing_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    fs::write(&path, "10|Kappa|Someone|1990|1\r\n").unwrap();

    let store = sample_store();
    store.load(&path).unwrap();

    assert_eq!(store.ids(), vec![10]);
    assert!(store.find_by_id(10).unwrap().read(|book| book.is_checked_out()));
}

#[test]
fn load_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let store: Store<Book> = Store::new();
    let report = store.load(&path).unwrap();

    assert_eq!(report, LoadReport::default());
    assert!(store.is_empty());
}

#[test]
fn line_breaks_in_text_stay_on_one_record_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    let store = Store::new();
    store.insert(Book::new(1, "Line one\nLine two", "Orwell\r\n", 1949));
    store.save(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1|Line one Line two|Orwell  |1949|0\n"
    );

    let restored: Store<Book> = Store::new();
    let report = restored.load(&path).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 0);
    let book = restored.find_by_id(1).unwrap().snapshot();
    assert_eq!(book.title(), "Line one Line two");
    assert_eq!(book.author(), "Orwell  ");
}

#[test]
fn handle_updates_interleave_with_saves_and_removals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.txt");
    let store: Arc<Store<Book>> = Arc::new(Store::new());
    let handles: Vec<_> = (1..=20)
        .map(|id| store.insert(Book::new(id, format!("Book {id}"), "Author", 2000)))
        .collect();

    let saver = {
        let store = Arc::clone(&store);
        let path = path.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                store.save(&path).unwrap();
            }
        })
    };

    for handle in &handles {
        handle.update(|book| book.check_out()).unwrap();
        store.remove_where(|book| book.id() == handle.id() && book.id() % 2 == 0);
    }
    saver.join().unwrap();

    assert_eq!(store.len(), 10);
    assert!(store.all().iter().all(|handle| handle.read(Book::is_checked_out)));
}
