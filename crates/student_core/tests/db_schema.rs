use rusqlite::Connection;
use student_core::db::{open_db, open_db_in_memory};

#[test]
fn open_db_in_memory_creates_students_table() {
    let conn = open_db_in_memory().unwrap();

    assert_table_exists(&conn, "students");
    assert_eq!(student_rows(&conn), 0);
}

#[test]
fn reopening_file_database_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO students (student_id, first_name, last_name, address, phone)
             VALUES (1, 'Ivan', 'Petrov', 'addr', '+79161234567');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_table_exists(&second, "students");
    assert_eq!(student_rows(&second), 1);
}

#[test]
fn schema_rejects_non_positive_ids_and_negative_hours() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO students (
            student_id, first_name, last_name, address, phone, min_required_facultative_hours
        ) VALUES (?1, 'Ivan', 'Petrov', 'addr', '+79161234567', ?2);";

    assert!(conn.execute(insert, [0, 1]).is_err());
    assert!(conn.execute(insert, [1, -1]).is_err());
    assert!(conn.execute(insert, [1, 0]).is_ok());
}

#[test]
fn missing_hours_default_to_zero() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO students (student_id, first_name, last_name, address, phone)
         VALUES (3, 'Anna', 'Orlova', 'addr', '+79161234567');",
        [],
    )
    .unwrap();

    let hours: i64 = conn
        .query_row(
            "SELECT min_required_facultative_hours FROM students WHERE student_id = 3;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(hours, 0);
}

fn student_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
