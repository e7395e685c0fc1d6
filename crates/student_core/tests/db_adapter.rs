use rusqlite::params;
use student_core::db::open_db_in_memory;
use student_core::{
    DbStudentRepository, RepoError, SqliteStudentStore, StudentRecord, StudentRepository,
    StudentStore,
};

fn record(first_name: &str, last_name: &str, patronymic: Option<&str>) -> StudentRecord {
    StudentRecord {
        student_id: 0,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        patronymic: patronymic.map(str::to_string),
        address: "Обл. Тверская, с. Луговое, улица Мира, дом 12".to_string(),
        phone: "+79035550101".to_string(),
        min_required_facultative_hours: 0,
    }
}

fn new_repo() -> DbStudentRepository<SqliteStudentStore> {
    let store = SqliteStudentStore::new(open_db_in_memory().unwrap());
    DbStudentRepository::new(store).unwrap()
}

#[test]
fn create_round_trips_through_store() {
    let mut repo = new_repo();

    let created = repo
        .create(record("Ivan", "Petrov", Some("Ivanovich")))
        .unwrap();
    assert_eq!(created.id(), 1);

    let loaded = repo.get_by_id(created.id()).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn cache_is_refreshed_after_every_mutation() {
    let mut repo = new_repo();
    assert!(repo.cached().is_empty());

    repo.create(record("Ivan", "Petrov", None)).unwrap();
    repo.create(record("Anna", "Orlova", None)).unwrap();
    assert_eq!(repo.cached().len(), 2);

    repo.update(2, record("Anna", "Sokolova", None)).unwrap();
    assert_eq!(repo.cached()[1].last_name(), "Sokolova");

    assert!(repo.delete(1).unwrap());
    assert_eq!(repo.cached().len(), 1);
    assert_eq!(repo.cached()[0].id(), 2);
}

#[test]
fn ids_follow_max_plus_one() {
    let mut repo = new_repo();
    for name in ["Ivan", "Petr", "Oleg"] {
        repo.create(record(name, "Petrov", None)).unwrap();
    }
    assert!(repo.delete(2).unwrap());
    assert_eq!(repo.create(record("Anna", "Petrova", None)).unwrap().id(), 4);
}

#[test]
fn update_preserves_id_and_reports_missing() {
    let mut repo = new_repo();
    let created = repo.create(record("Ivan", "Petrov", None)).unwrap();

    let updated = repo
        .update(
            created.id(),
            StudentRecord {
                student_id: 500,
                ..record("Petr", "Petrov", None)
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.first_name(), "Petr");

    assert!(repo
        .update(9, record("Oleg", "Petrov", None))
        .unwrap()
        .is_none());

    let err = repo
        .update(
            created.id(),
            StudentRecord {
                phone: "89035550101".to_string(),
                ..record("Petr", "Petrov", None)
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_by_id(created.id()).unwrap().unwrap(), updated);
}

#[test]
fn delete_missing_id_returns_false() {
    let mut repo = new_repo();
    repo.create(record("Ivan", "Petrov", None)).unwrap();

    assert!(!repo.delete(3).unwrap());
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn get_page_slices_full_listing() {
    let mut repo = new_repo();
    for (first, last) in [("Ivan", "Aa"), ("Petr", "Bb"), ("Oleg", "Cc")] {
        repo.create(record(first, last, None)).unwrap();
    }

    assert_eq!(repo.get_page(2, 2).unwrap(), vec!["Cc Oleg"]);
    assert!(repo.get_page(2, 5).unwrap().is_empty());
    assert_eq!(repo.students().unwrap().len(), 3);
}

#[test]
fn sort_by_name_orders_by_last_first_patronymic() {
    let mut repo = new_repo();
    repo.create(record("Ivan", "Petrov", Some("Sergeevich")))
        .unwrap();
    repo.create(record("Anna", "Orlova", None)).unwrap();
    repo.create(record("Ivan", "Petrov", None)).unwrap();

    let sorted = repo.sort_by_name().unwrap();
    let ids: Vec<u32> = sorted.iter().map(|student| student.id()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(repo.cached(), sorted.as_slice());
}

#[test]
fn save_is_a_no_op() {
    let mut repo = new_repo();
    repo.create(record("Ivan", "Petrov", None)).unwrap();
    repo.save().unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn invalid_persisted_row_is_reported() {
    let repo = new_repo();
    repo.store()
        .connection()
        .execute(
            "INSERT INTO students (student_id, first_name, last_name, address, phone)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![7, "Ivan", "Petrov", "Москва", "+79035550101"],
        )
        .unwrap();

    let err = repo.get_by_id(7).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn store_pages_are_ordered_by_id() {
    let store = SqliteStudentStore::open_in_memory().unwrap();
    for name in ["Ivan", "Petr", "Oleg"] {
        store.create(&record(name, "Petrov", None)).unwrap();
    }

    let page: Vec<u32> = store
        .get_page(2, 2)
        .unwrap()
        .iter()
        .map(|student| student.id())
        .collect();
    assert_eq!(page, vec![3]);
    assert!(store.get_page(0, 1).unwrap().is_empty());
    assert_eq!(store.get_count().unwrap(), 3);
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");

    {
        let mut repo = DbStudentRepository::new(SqliteStudentStore::open(&path).unwrap()).unwrap();
        repo.create(record("Ivan", "Petrov", None)).unwrap();
    }

    let repo = DbStudentRepository::new(SqliteStudentStore::open(&path).unwrap()).unwrap();
    assert_eq!(repo.cached().len(), 1);
    assert_eq!(repo.get_page(10, 1).unwrap(), vec!["Petrov Ivan"]);
}

#[test]
fn committed_write_succeeds_even_when_refresh_hits_invalid_row() {
    let mut repo = new_repo();
    repo.create(record("Ivan", "Petrov", None)).unwrap();
    repo.store()
        .connection()
        .execute(
            "INSERT INTO students (student_id, first_name, last_name, address, phone)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![7, "Petr", "Petrov", "Москва", "+79035550101"],
        )
        .unwrap();

    let created = repo.create(record("Anna", "Orlova", None)).unwrap();
    assert_eq!(created.id(), 8);
    assert_eq!(repo.store().get_by_id(8).unwrap().unwrap(), created);
    assert_eq!(repo.count().unwrap(), 3);
    assert_eq!(repo.cached().len(), 1);

    assert!(repo.update(1, record("Oleg", "Petrov", None)).unwrap().is_some());
    assert!(repo.delete(8).unwrap());
    assert_eq!(repo.cached()[0].first_name(), "Ivan");

    assert!(matches!(
        repo.get_page(10, 1).unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn sort_by_name_does_not_reorder_pages() {
    let mut repo = new_repo();
    repo.create(record("Ivan", "Petrov", None)).unwrap();
    repo.create(record("Anna", "Orlova", None)).unwrap();

    repo.sort_by_name().unwrap();
    assert_eq!(repo.cached()[0].last_name(), "Orlova");
    assert_eq!(repo.get_page(2, 1).unwrap(), vec!["Petrov Ivan", "Orlova Anna"]);
}
