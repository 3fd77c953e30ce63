use super::table::{ParseFailure, parse_table};
use super::*;
use std::fs;
use tempfile::tempdir;

fn rec(name: &str, artist: &str, rating: u8, play_count: u32) -> LibraryRecord {
    LibraryRecord {
        name: name.into(),
        artist: artist.into(),
        rating,
        play_count,
    }
}

fn sample() -> Entries {
    vec![
        ("01".into(), rec("Another Brick in the Wall", "Pink Floyd", 4, 2)),
        ("02".into(), rec("Shape of You", "Ed Sheeran", 3, 0)),
        ("03".into(), rec("Someone Like You", "Adele", 0, 7)),
    ]
}

fn malformed_lines(input: &str) -> Vec<u64> {
    match parse_table(input.as_bytes()) {
        Err(ParseFailure::Malformed(rows)) => rows.rows().iter().map(|r| r.line).collect(),
        other => panic!("expected malformed rows, got {other:?}"),
    }
}

#[test]
fn info_and_stars_render_rating() {
    let item = LibraryRecord::new("Shape of You", "Ed Sheeran", 3);
    assert_eq!(item.play_count, 0);
    assert_eq!(item.stars(), "***");
    assert_eq!(item.info(), "Shape of You - Ed Sheeran ***");

    assert_eq!(LibraryRecord::new("Another Brick in the Wall", "Pink Floyd", 5).stars(), "*****");
    assert_eq!(LibraryRecord::new("Track Without Stars", "Unknown Artist", 0).stars(), "");
    for r in 0..=MAX_RATING {
        assert_eq!(stars(r).len(), r as usize);
    }
}

#[test]
fn parse_rating_rejects_non_numeric_and_out_of_range() {
    assert_eq!(parse_rating(" 4 ").unwrap(), 4);
    assert!(matches!(parse_rating("four"), Err(LibraryError::Validation(_))));
    assert!(matches!(parse_rating("6"), Err(LibraryError::Validation(_))));
    assert!(matches!(parse_rating("-1"), Err(LibraryError::Validation(_))));
}

#[test]
fn set_rating_accepts_zero_through_five() {
    let mut store = LibraryStore::in_memory(sample());
    for r in 0..=5 {
        store.set_rating("02", r).unwrap();
        assert_eq!(store.get("02").unwrap().rating, r as u8);
    }
}

#[test]
fn set_rating_out_of_range_leaves_record_unchanged() {
    let mut store = LibraryStore::in_memory(sample());
    for bad in [6, -1, 100] {
        assert!(matches!(store.set_rating("01", bad), Err(LibraryError::Validation(_))));
        assert_eq!(store.get("01").unwrap().rating, 4);
    }
    assert!(matches!(store.set_rating("99", 3), Err(LibraryError::Validation(_))));
}

#[test]
fn increment_play_count_counts_and_ignores_unknown_ids() {
    let mut store = LibraryStore::in_memory(sample());
    for _ in 0..5 {
        store.increment_play_count("02").unwrap();
    }
    assert_eq!(store.get("02").unwrap().play_count, 5);

    store.increment_play_count("42").unwrap();
    assert!(store.get("42").is_none());
    assert_eq!(store.len(), 3);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.csv");

    let mut entries = sample();
    entries.push(("intro".into(), rec("Hello, \"World\"", "Some, Band", 1, 3)));

    LibraryStore::save(&path, &entries, false).unwrap();
    assert_eq!(LibraryStore::load(&path).unwrap(), entries);

    LibraryStore::save(&path, &entries, true).unwrap();
    assert_eq!(LibraryStore::load(&path).unwrap(), entries);
    assert!(!dir.path().join("library.csv.tmp").exists());
}

#[test]
fn padded_text_columns_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.csv");
    let entries = vec![(" 07".to_string(), rec(" Intro ", "Band ", 1, 0))];

    LibraryStore::save(&path, &entries, true).unwrap();
    assert_eq!(LibraryStore::load(&path).unwrap(), entries);
}

#[test]
fn numeric_columns_tolerate_padding() {
    let input = "id, name, artist, rating, play_count\n01,Song,Artist, 2 , 5\n";
    let entries = parse_table(input.as_bytes()).unwrap();
    assert_eq!(entries, vec![("01".to_string(), rec("Song", "Artist", 2, 5))]);
    assert_eq!(malformed_lines("01,  ,Artist,1,0\n"), vec![1]);
}

#[test]
fn load_skips_header_row() {
    let input = "id,name,artist,rating,play_count\n01,Song,Artist,2,5\n";
    let entries = parse_table(input.as_bytes()).unwrap();
    assert_eq!(entries, vec![("01".to_string(), rec("Song", "Artist", 2, 5))]);
}

#[test]
fn load_reports_every_malformed_row() {
    let input = "\
01,Good,Artist,3,0
02,Bad Rating,Artist,9,0
03,Missing Columns,Artist
04,Good Too,Artist,1,2
05,Negative Count,Artist,1,-4
";
    assert_eq!(malformed_lines(input), vec![2, 3, 5]);
}

#[test]
fn load_rejects_duplicate_ids_and_empty_fields() {
    assert_eq!(malformed_lines("01,A,B,1,0\n01,C,D,2,0\n"), vec![2]);
    assert_eq!(malformed_lines(",A,B,1,0\n02,,B,1,0\n03,A,,1,0\n"), vec![1, 2, 3]);
}

#[test]
fn malformed_file_fails_open_without_partial_library() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.csv");
    fs::write(&path, "01,Good,Artist,3,0\n02,Bad,Artist,x,0\n").unwrap();

    let err = LibraryStore::open(&path, false).unwrap_err();
    match err {
        LibraryError::Malformed(rows) => {
            assert_eq!(rows.rows().len(), 1);
            assert_eq!(rows.rows()[0].line, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn failed_save_keeps_previous_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.csv");
    LibraryStore::save(&path, &sample(), false).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // A directory where the temp file should go makes the write fail.
    fs::create_dir(dir.path().join("library.csv.tmp")).unwrap();
    let err = LibraryStore::save(&path, &sample()[..1], false).unwrap_err();
    assert!(matches!(err, LibraryError::Io { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

fn store_with_blocked_save(dir: &std::path::Path) -> LibraryStore {
    let path = dir.join("library.csv");
    let mut store = LibraryStore::open(&path, false).unwrap();
    for (id, record) in sample() {
        store.insert(&id, record).unwrap();
    }
    // A directory where the temp file should go makes every later save fail.
    fs::create_dir(dir.join("library.csv.tmp")).unwrap();
    store
}

#[test]
fn failed_save_undoes_rating_and_play_count() {
    let dir = tempdir().unwrap();
    let mut store = store_with_blocked_save(dir.path());

    assert!(matches!(store.set_rating("02", 5), Err(LibraryError::Io { .. })));
    assert_eq!(store.get("02").unwrap().rating, 3);

    assert!(matches!(store.increment_play_count("03"), Err(LibraryError::Io { .. })));
    assert_eq!(store.get("03").unwrap().play_count, 7);

    let on_disk = LibraryStore::load(&dir.path().join("library.csv")).unwrap();
    assert_eq!(on_disk, store.entries());
}

#[test]
fn failed_save_keeps_removed_track_in_place() {
    let dir = tempdir().unwrap();
    let files = TrackFiles::new(dir.path().join("tracks"), "mp3");
    fs::create_dir(files.dir()).unwrap();
    fs::write(files.path_for("02"), b"audio").unwrap();
    let mut store = store_with_blocked_save(dir.path());

    assert!(matches!(
        remove_track(&mut store, &files, "02"),
        Err(LibraryError::Io { .. })
    ));
    assert_eq!(store.entries(), sample().as_slice());
    assert!(files.exists("02"));
}

#[test]
fn mutations_are_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("library.csv");

    let mut store = LibraryStore::open(&path, true).unwrap();
    assert!(store.is_empty());
    store.insert("01", LibraryRecord::new("Song", "Artist", 0)).unwrap();
    store.set_rating("01", 5).unwrap();
    store.increment_play_count("01").unwrap();

    let reopened = LibraryStore::open(&path, true).unwrap();
    assert_eq!(reopened.get("01"), Some(&rec("Song", "Artist", 5, 1)));
}

#[test]
fn insert_rejects_duplicates_and_blank_fields() {
    let mut store = LibraryStore::in_memory(sample());
    assert!(matches!(
        store.insert("01", LibraryRecord::new("X", "Y", 0)),
        Err(LibraryError::Validation(_))
    ));
    assert!(matches!(
        store.insert("09", LibraryRecord::new("  ", "Y", 0)),
        Err(LibraryError::Validation(_))
    ));
    assert_eq!(store.len(), 3);
}

#[test]
fn next_track_id_ignores_non_numeric_keys() {
    assert_eq!(LibraryStore::default().next_track_id().unwrap(), "01");

    let only_named = LibraryStore::in_memory(vec![("intro".into(), rec("A", "B", 0, 0))]);
    assert_eq!(only_named.next_track_id().unwrap(), "01");

    let mut entries = sample();
    entries.push(("bonus".into(), rec("A", "B", 0, 0)));
    assert_eq!(LibraryStore::in_memory(entries).next_track_id().unwrap(), "04");

    let nine = LibraryStore::in_memory(vec![("09".into(), rec("A", "B", 0, 0))]);
    assert_eq!(nine.next_track_id().unwrap(), "10");
    let big = LibraryStore::in_memory(vec![("99".into(), rec("A", "B", 0, 0))]);
    assert_eq!(big.next_track_id().unwrap(), "100");
}

#[test]
fn next_track_id_fails_after_the_largest_number() {
    let full = LibraryStore::in_memory(vec![("18446744073709551615".into(), rec("A", "B", 0, 0))]);
    assert!(matches!(full.next_track_id(), Err(LibraryError::Validation(_))));
}

#[test]
fn list_all_uses_store_order() {
    let store = LibraryStore::in_memory(sample());
    assert_eq!(
        store.list_all(),
        "01 Another Brick in the Wall - Pink Floyd ****\n\
         02 Shape of You - Ed Sheeran ***\n\
         03 Someone Like You - Adele \n"
    );
}

#[test]
fn details_lists_all_fields() {
    let store = LibraryStore::in_memory(sample());
    assert_eq!(
        store.details("03").unwrap(),
        "Track: Someone Like You\nArtist: Adele\nRating: 0\nPlay Count: 7"
    );
    assert!(store.details("04").is_none());
}

#[test]
fn remove_unknown_track_is_not_found() {
    let dir = tempdir().unwrap();
    let files = TrackFiles::new(dir.path(), "mp3");
    let mut store = LibraryStore::in_memory(sample());
    assert!(matches!(
        remove_track(&mut store, &files, "77"),
        Err(LibraryError::NotFound(id)) if id == "77"
    ));
    assert_eq!(store.len(), 3);
}

#[test]
fn remove_reports_file_outcome_separately() {
    let dir = tempdir().unwrap();
    let files = TrackFiles::new(dir.path(), ".mp3");
    fs::write(files.path_for("01"), b"audio").unwrap();

    let mut store = LibraryStore::in_memory(sample());

    let removed = remove_track(&mut store, &files, "01").unwrap();
    assert!(matches!(removed.file, FileRemoval::Removed));
    assert!(!removed.diverged());
    assert!(!files.exists("01"));
    assert!(!store.list_all().contains("Pink Floyd"));

    let absent = remove_track(&mut store, &files, "02").unwrap();
    assert!(matches!(absent.file, FileRemoval::Absent));
    assert!(store.get("02").is_none());
}

#[test]
fn remove_keeps_metadata_removal_when_file_delete_fails() {
    let dir = tempdir().unwrap();
    let files = TrackFiles::new(dir.path(), "mp3");
    // A directory in place of the audio file cannot be unlinked as a file.
    fs::create_dir(files.path_for("03")).unwrap();

    let mut store = LibraryStore::in_memory(sample());
    let report = remove_track(&mut store, &files, "03").unwrap();
    assert!(report.diverged());
    assert_eq!(report.record.name, "Someone Like You");
    assert!(store.get("03").is_none());
}
