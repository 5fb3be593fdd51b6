//! Statement building for derived record types.

use chrono::{DateTime, NaiveDate, Utc};
use rowsql::prelude::*;
use rowsql::{BindValue, columns, primary_keys, registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Record definitions ──────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "members")]
struct Member {
    #[orm(pk = "member_id")]
    member_id: i64,
    #[orm(column = "first_name")]
    first_name: String,
    #[orm(column = "email")]
    email: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "members")]
struct FullMember {
    #[orm(column = "member_id", pk = "member_id")]
    member_id: i64,
    #[orm(column = "first_name")]
    first_name: String,
    #[orm(column = "last_name")]
    last_name: String,
    #[orm(column = "email")]
    email: String,
    #[orm(column = "password_hash")]
    password_hash: String,
    #[orm(column = "date_of_birth")]
    date_of_birth: NaiveDate,
    #[orm(column = "join_date")]
    join_date: DateTime<Utc>,
    #[orm(column = "membership_type")]
    membership_type: String,
    #[orm(column = "status")]
    status: String,
    #[orm(column = "created_at")]
    created_at: DateTime<Utc>,
    #[orm(column = "updated_at")]
    updated_at: DateTime<Utc>,
    #[serde(default)]
    session_note: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "enrollments")]
struct Enrollment {
    #[orm(column = "member_id", pk = "member_id")]
    member_id: i64,
    #[orm(column = "course_id", pk = "course_id")]
    course_id: i64,
    #[orm(column = "grade")]
    grade: f64,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "tags")]
struct Tag {
    #[orm(column = "label")]
    label: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
struct AuditNote {
    #[orm(pk = "note_id")]
    note_id: i64,
    #[orm(column = "body")]
    body: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "accounts")]
struct Account {
    #[orm(column = "id", pk = "account_id")]
    id: i64,
    #[orm(column = "email")]
    email: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Record)]
#[serde(default)]
#[orm(table = "profiles")]
struct Profile {
    #[orm(pk = "profile_id")]
    profile_id: i64,
    #[orm(column = "display_name")]
    display_name: String,
    #[orm(column = "visits")]
    visits: i64,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[orm(table = "plans")]
struct Plan {
    #[orm(pk = "plan_id")]
    plan_id: i64,
    #[serde(rename = "type")]
    #[orm(column = "plan_type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
struct Untagged {
    value: String,
}

const FULL_MEMBER_JSON: &str = r#"{
    "member_id": 12,
    "first_name": "Ada",
    "last_name": "Lovelace",
    "email": "ada@example.com",
    "password_hash": "x1y2",
    "date_of_birth": "1815-12-10",
    "join_date": "2024-01-15T09:30:00Z",
    "membership_type": "gold",
    "status": "active",
    "created_at": "2024-01-15T09:30:00Z",
    "updated_at": "2024-02-01T12:00:00Z"
}"#;

fn builder(skip: &str) -> StatementBuilder {
    StatementBuilder::new(BuilderConfig::with_skip_columns(skip))
}

/// Columns listed between the first pair of parentheses of an INSERT.
fn insert_columns(sql: &str) -> BTreeSet<String> {
    let start = sql.find('(').expect("column list");
    let end = sql.find(')').expect("column list end");
    sql[start + 1..end]
        .split(", ")
        .map(str::to_string)
        .collect()
}

/// Column names of a `SET a = x, b = y WHERE` clause.
fn set_columns(sql: &str) -> BTreeSet<String> {
    let start = sql.find(" SET ").expect("SET") + 5;
    let end = sql.find(" WHERE ").expect("WHERE");
    sql[start..end]
        .split(", ")
        .map(|a| a.split(" = ").next().unwrap_or_default().to_string())
        .collect()
}

// ── Schema introspection ────────────────────────────────────────────────────

#[test]
fn columns_match_tags() {
    for _ in 0..3 {
        let cols = columns::<Member>();
        assert_eq!(cols.data_columns, ["first_name", "email"]);
        assert_eq!(cols.primary_key, "member_id");
    }
    assert_eq!(primary_keys::<Member>(), ["member_id"]);
}

#[test]
fn untagged_fields_are_ignored() {
    let cols = columns::<FullMember>();
    assert_eq!(cols.data_columns.len(), 11);
    assert!(!cols.data_columns.iter().any(|c| c == "session_note"));
}

#[test]
fn composite_keys_differ_between_views() {
    assert_eq!(columns::<Enrollment>().primary_key, "course_id");
    assert_eq!(primary_keys::<Enrollment>(), ["member_id", "course_id"]);
}

#[test]
fn table_constant_and_default_name() {
    assert_eq!(Member::TABLE, "members");
    assert_eq!(AuditNote::TABLE, "audit_note");
    assert_eq!(Member::schema().type_name, "Member");
}

#[test]
fn derived_records_are_registered() {
    let schema = registry::find_by_type("Enrollment").unwrap();
    assert_eq!(schema.table, "enrollments");
    assert!(registry::find_by_table("tags").is_some());
}

// ── SELECT / DELETE ─────────────────────────────────────────────────────────

#[test]
fn select_without_ids() {
    let sql = builder("").build_select::<Member>("members", &[]).unwrap();
    assert_eq!(sql, "SELECT first_name, email FROM members");
    assert_eq!(builder("").select_all::<Member>().unwrap(), sql);
}

#[test]
fn select_with_ids() {
    let sql = builder("")
        .build_select::<Member>("members", &[3, 7])
        .unwrap();
    assert_eq!(
        sql,
        "SELECT first_name, email FROM members WHERE member_id IN (3,7)"
    );
}

#[test]
fn select_composite_uses_last_key() {
    let sql = builder("")
        .build_select::<Enrollment>("enrollments", &[1])
        .unwrap();
    assert_eq!(
        sql,
        "SELECT member_id, course_id, grade FROM enrollments WHERE course_id IN (1)"
    );
}

#[test]
fn delete_by_id() {
    let sql = builder("").build_delete::<Member>("members", 5).unwrap();
    assert_eq!(sql, "DELETE FROM members WHERE member_id = 5");
}

#[test]
fn untagged_type_is_schema_error() {
    let err = builder("")
        .build_select::<Untagged>("untagged", &[])
        .unwrap_err();
    assert!(err.is_schema());
}

#[test]
fn keyless_type_cannot_filter_by_id() {
    let err = builder("").build_select::<Tag>("tags", &[1]).unwrap_err();
    assert!(err.is_missing_primary_key());
    let err = builder("").build_delete::<Tag>("tags", 1).unwrap_err();
    assert!(err.is_missing_primary_key());
}

// ── INSERT / UPDATE ─────────────────────────────────────────────────────────

#[test]
fn insert_member() {
    let sql = builder("created_at, updated_at")
        .build_mutation::<Member>(
            "members",
            r#"{"member_id": 1, "first_name": "Ada", "email": "ada@example.com"}"#,
            MutationMode::Insert,
        )
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO members (first_name, email) VALUES ('Ada', 'ada@example.com')"
    );
}

#[test]
fn update_member() {
    let sql = builder("")
        .build_mutation::<Member>(
            "members",
            r#"{"email": "ada@example.com", "first_name": "Ada", "member_id": 4}"#,
            MutationMode::Update,
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE members SET first_name = 'Ada', email = 'ada@example.com' WHERE member_id = 4"
    );
}

#[test]
fn insert_never_lists_pk_or_skipped_columns() {
    let data = columns::<FullMember>().data_columns;
    for skip in ["", "created_at", "created_at, updated_at", "status,email", "nope"] {
        let b = builder(skip);
        let sql = b
            .build_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Insert)
            .unwrap();
        let listed = insert_columns(&sql);

        let expected: BTreeSet<String> = data
            .iter()
            .filter(|c| *c != "member_id" && !b.config().skip_columns.is_skipped(c))
            .cloned()
            .collect();
        assert_eq!(listed, expected, "skip = {skip:?}");
    }
}

#[test]
fn update_filters_on_every_pk_and_never_sets_skipped() {
    let sql = builder("grade")
        .build_mutation::<Enrollment>(
            "enrollments",
            r#"{"member_id": 3, "course_id": 8, "grade": 3.5}"#,
            MutationMode::Update,
        );
    // Only key columns remain besides the skipped one.
    assert!(matches!(sql, Err(RowsqlError::Validation(_))));

    let sql = builder("created_at, updated_at")
        .build_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Update)
        .unwrap();
    assert!(sql.ends_with(" WHERE member_id = 12"));
    let set = set_columns(&sql);
    assert!(!set.contains("created_at"));
    assert!(!set.contains("updated_at"));
    assert!(!set.contains("member_id"));
    assert!(set.contains("join_date"));

    let b = StatementBuilder::default();
    let sql = b
        .build_mutation::<Enrollment>(
            "enrollments",
            r#"{"course_id": 8, "grade": 3.5, "member_id": 3}"#,
            MutationMode::Update,
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE enrollments SET grade = 3.5 WHERE member_id = 3 and course_id = 8"
    );
}

#[test]
fn insert_columns_ignore_json_key_order() {
    let b = builder("updated_at");
    let reordered = r#"{
        "updated_at": "2024-02-01T12:00:00Z",
        "status": "active",
        "membership_type": "gold",
        "join_date": "2024-01-15T09:30:00Z",
        "date_of_birth": "1815-12-10",
        "password_hash": "x1y2",
        "email": "ada@example.com",
        "last_name": "Lovelace",
        "first_name": "Ada",
        "created_at": "2024-01-15T09:30:00Z",
        "member_id": 12
    }"#;
    let a = b
        .build_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Insert)
        .unwrap();
    let c = b
        .build_mutation::<FullMember>("members", reordered, MutationMode::Insert)
        .unwrap();

    let expected: BTreeSet<String> = columns::<FullMember>()
        .data_columns
        .into_iter()
        .filter(|c| c != "member_id" && c != "updated_at")
        .collect();
    assert_eq!(insert_columns(&a), expected);
    assert_eq!(insert_columns(&c), expected);
    // Columns follow declaration order, so both renderings are identical.
    assert_eq!(a, c);
}

#[test]
fn dates_render_quoted() {
    let sql = builder("created_at, updated_at")
        .build_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Insert)
        .unwrap();
    assert!(sql.contains("'1815-12-10'"));
    assert!(sql.contains("'2024-01-15T09:30:00Z'"));
}

#[test]
fn unsupported_mode_token_returns_empty() {
    let b = builder("");
    let json = r#"{"member_id": 1, "first_name": "Ada", "email": "a@b.c"}"#;
    assert_eq!(
        b.build_mutation_token::<Member>("members", json, "upsert").unwrap(),
        ""
    );
    assert!(
        b.build_mutation_token::<Member>("members", json, "insert")
            .unwrap()
            .starts_with("INSERT INTO members")
    );
}

#[test]
fn decode_failure_is_reported() {
    let b = builder("");
    let err = b
        .build_mutation::<Member>("members", r#"{"member_id": "one"}"#, MutationMode::Insert)
        .unwrap_err();
    assert!(err.is_decode());

    let err = b
        .build_mutation::<Member>("members", "not json", MutationMode::Update)
        .unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn json_keys_match_fields_ignoring_case() {
    let sql = builder("")
        .build_mutation::<Member>(
            "members",
            r#"{"Member_Id": 1, "First_Name": "Ada", "EMAIL": "a@b.c"}"#,
            MutationMode::Insert,
        )
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO members (first_name, email) VALUES ('Ada', 'a@b.c')"
    );

    let sql = builder("")
        .build_mutation::<Member>(
            "members",
            r#"{"MEMBER_ID": 4, "first_NAME": "Ada", "Email": "a@b.c"}"#,
            MutationMode::Update,
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE members SET first_name = 'Ada', email = 'a@b.c' WHERE member_id = 4"
    );
}

#[test]
fn renamed_fields_match_their_serde_key() {
    let sql = builder("")
        .build_mutation::<Plan>(
            "plans",
            r#"{"plan_id": 2, "Type": "gold"}"#,
            MutationMode::Update,
        )
        .unwrap();
    assert_eq!(sql, "UPDATE plans SET plan_type = 'gold' WHERE plan_id = 2");
}

#[test]
fn missing_fields_fail_without_serde_defaults() {
    let err = builder("")
        .build_mutation::<Member>(
            "members",
            r#"{"Member_Id": 1, "First_Name": "Ada"}"#,
            MutationMode::Insert,
        )
        .unwrap_err();
    assert!(err.is_decode());
    assert!(err.to_string().contains("email"));
}

#[test]
fn missing_fields_take_serde_defaults() {
    let sql = builder("")
        .build_mutation::<Profile>(
            "profiles",
            r#"{"Profile_ID": 7, "display_name": "ada"}"#,
            MutationMode::Update,
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE profiles SET display_name = 'ada', visits = 0 WHERE profile_id = 7"
    );
}

#[test]
fn pk_tag_differing_from_column_tag() {
    assert_eq!(columns::<Account>().primary_key, "account_id");
    let b = builder("");
    let json = r#"{"id": 3, "email": "x"}"#;

    assert_eq!(
        b.build_mutation::<Account>("accounts", json, MutationMode::Update)
            .unwrap(),
        "UPDATE accounts SET email = 'x' WHERE account_id = 3"
    );
    assert_eq!(
        b.build_mutation::<Account>("accounts", json, MutationMode::Insert)
            .unwrap(),
        "INSERT INTO accounts (email) VALUES ('x')"
    );
    assert_eq!(
        b.build_delete::<Account>("accounts", 3).unwrap(),
        "DELETE FROM accounts WHERE account_id = 3"
    );

    let stmt = b
        .prepare_mutation::<Account>("accounts", json, MutationMode::Update)
        .unwrap();
    assert_eq!(stmt.sql(), "UPDATE accounts SET email = $1 WHERE account_id = $2");
}

#[test]
fn update_of_keyless_type_fails() {
    let err = builder("")
        .build_mutation::<Tag>("tags", r#"{"label": "rust"}"#, MutationMode::Update)
        .unwrap_err();
    assert!(err.is_missing_primary_key());
}

#[test]
fn inline_literals_are_not_escaped() {
    let sql = builder("")
        .build_mutation::<Member>(
            "members",
            r#"{"member_id": 1, "first_name": "O'Brien", "email": "o@b.ie"}"#,
            MutationMode::Insert,
        )
        .unwrap();
    assert!(sql.contains("'O'Brien'"));
}

// ── Parameterized statements ────────────────────────────────────────────────

#[test]
fn prepared_select_and_delete() {
    let b = builder("");
    let stmt = b.prepare_select::<Member>("members", &[3, 7]).unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT first_name, email FROM members WHERE member_id IN ($1,$2)"
    );
    assert_eq!(stmt.params(), &[BindValue::Int(3), BindValue::Int(7)]);

    let stmt = b.prepare_delete::<Member>("members", 5).unwrap();
    assert_eq!(stmt.sql(), "DELETE FROM members WHERE member_id = $1");
    assert_eq!(stmt.params(), &[BindValue::Int(5)]);
}

#[test]
fn prepared_mutation_binds_values() {
    let json = r#"{"member_id": 1, "first_name": "O'Brien", "email": "o@b.ie"}"#;
    let b = builder("");

    let stmt = b
        .prepare_mutation::<Member>("members", json, MutationMode::Insert)
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO members (first_name, email) VALUES ($1, $2)"
    );
    assert_eq!(
        stmt.params(),
        &[
            BindValue::Text("O'Brien".into()),
            BindValue::Text("o@b.ie".into()),
        ]
    );

    let stmt = b
        .prepare_mutation::<Member>("members", json, MutationMode::Update)
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE members SET first_name = $1, email = $2 WHERE member_id = $3"
    );
    assert_eq!(stmt.params()[2], BindValue::Int(1));
}

#[test]
fn prepared_shape_matches_inline_shape() {
    let b = builder("created_at");
    let inline = b
        .build_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Update)
        .unwrap();
    let prepared = b
        .prepare_mutation::<FullMember>("members", FULL_MEMBER_JSON, MutationMode::Update)
        .unwrap();
    assert_eq!(set_columns(&inline), set_columns(prepared.sql()));
    assert!(prepared.sql().ends_with(" WHERE member_id = $10"));
}

#[test]
fn prepared_statements_reject_bad_identifiers() {
    let b = builder("");
    let err = b
        .prepare_select::<Member>("members; DROP TABLE members", &[])
        .unwrap_err();
    assert!(matches!(err, RowsqlError::Validation(_)));
}
