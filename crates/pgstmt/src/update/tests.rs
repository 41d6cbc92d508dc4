//! Scenario tests for UPDATE assembly.

use super::*;
use crate::bindings::PlaceholderStyle;
use crate::config::OperatorPolicy;
use std::sync::Mutex;

fn builder() -> UpdateStatementBuilder {
    UpdateStatementBuilder::with_config(
        UpdateConfig::new().update_without_where(DangerousDmlPolicy::Allow),
    )
}

fn columns_and_values(bindings: &BindingsCollector) -> Vec<(&str, &BindValue)> {
    bindings.iter().map(|b| (b.column.as_str(), &b.value)).collect()
}

#[test]
fn test_update_without_where() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("name", "Alice").set("age", 30);
    let sql = builder().to_sql("users", payload, &[], &mut bindings).unwrap();

    assert_eq!(sql, r#"UPDATE "users" SET name = $1, age = $2;"#);
    assert_eq!(
        columns_and_values(&bindings),
        vec![("name", &BindValue::from("Alice")), ("age", &BindValue::Int(30))]
    );
}

#[test]
fn test_update_with_where() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("status", "active");
    let wheres = [FilterPredicate::eq("id", 5)];
    let sql = builder().to_sql("t", payload, &wheres, &mut bindings).unwrap();

    assert_eq!(sql, r#"UPDATE "t" SET status = $1 WHERE id = $2;"#);
    assert_eq!(
        columns_and_values(&bindings),
        vec![("status", &BindValue::from("active")), ("id", &BindValue::Int(5))]
    );
}

#[test]
fn test_multiple_predicates_joined_with_and() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("status", "active");
    let wheres = [FilterPredicate::eq("id", 5), FilterPredicate::eq("status", "x")];
    let sql = builder().to_sql("t", payload, &wheres, &mut bindings).unwrap();

    assert_eq!(
        sql,
        r#"UPDATE "t" SET status = $1 WHERE id = $2 AND status = $3;"#
    );
    assert_eq!(bindings.len(), 3);
}

#[test]
fn test_conjunction_is_configurable() {
    let b = UpdateStatementBuilder::with_config(UpdateConfig::new().conjunction(Conjunction::Or));
    let mut bindings = BindingsCollector::new();
    let wheres = [FilterPredicate::eq("a", 1), FilterPredicate::lt("b", 2)];
    let sql = b.where_clause(&wheres, &mut bindings).unwrap();
    assert_eq!(sql, "WHERE a = $1 OR b < $2");

    let mut bindings = BindingsCollector::new();
    let sql = b.where_clause_with(&wheres, Conjunction::And, &mut bindings).unwrap();
    assert_eq!(sql, "WHERE a = $1 AND b < $2");
}

#[test]
fn test_batch_shares_collector() {
    let mut bindings = BindingsCollector::new();
    let payloads = vec![
        UpdatePayload::new().set("name", "A"),
        UpdatePayload::new().set("name", "B").set("age", 2),
    ];
    let wheres = [FilterPredicate::eq("org_id", 9)];
    let sql = builder().to_sql("users", payloads, &wheres, &mut bindings).unwrap();

    assert_eq!(
        sql,
        concat!(
            r#"UPDATE "users" SET name = $1 WHERE org_id = $2;"#,
            r#"UPDATE "users" SET name = $3, age = $4 WHERE org_id = $5;"#
        )
    );
    // 3 assignments + 2 predicate values
    assert_eq!(bindings.len(), 5);
    let cols: Vec<&str> = bindings.iter().map(|b| b.column.as_str()).collect();
    assert_eq!(cols, ["name", "org_id", "name", "age", "org_id"]);
}

#[test]
fn test_set_clause_alone() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("a", 1).set("b", BindValue::Null);
    let sql = builder().set(&payload, &mut bindings).unwrap();
    assert_eq!(sql, "SET a = $1, b = $2");
    assert_eq!(bindings.last_binding().map(|b| &b.value), Some(&BindValue::Null));
}

#[test]
fn test_empty_where_is_empty_string() {
    let mut bindings = BindingsCollector::new();
    assert_eq!(builder().where_clause(&[], &mut bindings).unwrap(), "");
    assert!(bindings.is_empty());
}

#[test]
fn test_create_update_sql_single() {
    let mut bindings = BindingsCollector::new().with_offset(1);
    let payload = UpdatePayload::new().set("title", "x");
    let sql = builder()
        .create_update_sql("app.posts", &payload, &[FilterPredicate::gt("id", 10)], &mut bindings)
        .unwrap();
    assert_eq!(sql, r#"UPDATE "app"."posts" SET title = $2 WHERE id > $3;"#);
}

#[test]
fn test_quoted_columns_are_kept() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set(r#""DisplayName""#, "Al");
    let sql = builder().to_sql("users", payload, &[], &mut bindings).unwrap();
    assert_eq!(sql, r#"UPDATE "users" SET "DisplayName" = $1;"#);
}

#[test]
fn test_operator_embedded_verbatim() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("a", 1);
    let wheres = [FilterPredicate::new("tags", "@>", serde_json::json!(["x"]))];
    let sql = builder().to_sql("t", payload, &wheres, &mut bindings).unwrap();
    assert_eq!(sql, r#"UPDATE "t" SET a = $1 WHERE tags @> $2;"#);
}

#[test]
fn test_allowlist_rejects_unknown_operator() {
    let b = UpdateStatementBuilder::with_config(
        UpdateConfig::new().operator_policy(OperatorPolicy::Allowlist),
    );
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("a", 1);
    let wheres = [FilterPredicate::new("id", "= 1 OR 1 =", 1)];
    let err = b.to_sql("t", payload, &wheres, &mut bindings).unwrap_err();
    assert!(matches!(err, StmtError::UnsupportedOperator(_)));
    assert!(bindings.is_empty());
}

#[test]
fn test_empty_payload_is_malformed() {
    let mut bindings = BindingsCollector::new();
    let err = builder()
        .to_sql("t", UpdatePayload::new(), &[], &mut bindings)
        .unwrap_err();
    assert_eq!(err.malformed_field(), Some("update"));
    assert!(bindings.is_empty());
}

#[test]
fn test_empty_batch_is_malformed() {
    let mut bindings = BindingsCollector::new();
    let err = builder()
        .to_sql("t", Vec::<UpdatePayload>::new(), &[], &mut bindings)
        .unwrap_err();
    assert_eq!(err.malformed_field(), Some("updates"));
}

#[test]
fn test_empty_column_is_malformed() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("ok", 1).set("", 2);
    let err = builder().to_sql("t", payload, &[], &mut bindings).unwrap_err();
    assert_eq!(err.malformed_field(), Some("column"));
    // Validation runs before any registration.
    assert!(bindings.is_empty());
}

#[test]
fn test_empty_predicate_column_is_malformed() {
    let mut bindings = BindingsCollector::new();
    let payload = UpdatePayload::new().set("a", 1);
    let err = builder()
        .to_sql("t", payload, &[FilterPredicate::eq(" ", 1)], &mut bindings)
        .unwrap_err();
    assert_eq!(err.malformed_field(), Some("column"));
    assert!(bindings.is_empty());
}

#[test]
fn test_invalid_later_payload_registers_nothing() {
    let mut bindings = BindingsCollector::new();
    let payloads = vec![
        UpdatePayload::new().set("a", 1),
        UpdatePayload::new().set("b; DROP TABLE t", 2),
    ];
    let err = builder().to_sql("t", payloads, &[], &mut bindings).unwrap_err();
    assert!(matches!(err, StmtError::InvalidIdentifier(_)));
    assert!(bindings.is_empty());
}

#[test]
fn test_empty_table_is_malformed() {
    let mut bindings = BindingsCollector::new();
    let err = builder()
        .to_sql("", UpdatePayload::new().set("a", 1), &[], &mut bindings)
        .unwrap_err();
    assert_eq!(err.malformed_field(), Some("table"));
}

#[test]
fn test_unconditional_update_policy() {
    let payload = UpdatePayload::new().set("a", 1);

    let warn = UpdateStatementBuilder::new();
    let stmt = warn.build("t", payload.clone(), &[]).unwrap();
    assert_eq!(stmt.sql(), r#"UPDATE "t" SET a = $1;"#);

    let strict = UpdateStatementBuilder::with_config(UpdateConfig::new().strict());
    let err = strict.build("t", payload.clone(), &[]).unwrap_err();
    assert!(matches!(err, StmtError::UnconditionalUpdate { .. }));

    let ok = strict.build("t", payload, &[FilterPredicate::eq("id", 1)]).unwrap();
    assert_eq!(ok.bindings().len(), 2);
}

#[test]
fn test_build_uses_configured_style() {
    let b = UpdateStatementBuilder::with_config(
        UpdateConfig::new().placeholder_style(PlaceholderStyle::NumberedQuestion),
    );
    let stmt = b
        .build("t", UpdatePayload::new().set("a", 1), &[FilterPredicate::eq("id", 2)])
        .unwrap();
    assert_eq!(stmt.sql(), r#"UPDATE "t" SET a = ?1 WHERE id = ?2;"#);
    assert_eq!(stmt.statement_count(), 1);
}

#[test]
fn test_anonymous_placeholders() {
    let b = UpdateStatementBuilder::with_config(
        UpdateConfig::new().placeholder_style(PlaceholderStyle::Question),
    );
    let stmt = b
        .build("t", UpdatePayload::new().set("a", 1).set("b", 2), &[FilterPredicate::eq("id", 3)])
        .unwrap();
    assert_eq!(stmt.sql(), r#"UPDATE "t" SET a = ?, b = ? WHERE id = ?;"#);
    assert_eq!(stmt.render_inline(), r#"UPDATE "t" SET a = 1, b = 2 WHERE id = 3;"#);
}

#[test]
fn test_render_inline_round_trip() {
    let stmt = build_update(
        "users",
        UpdatePayload::new().set("name", "O'Brien").set("active", false),
        &[FilterPredicate::eq("id", 7)],
    )
    .unwrap();
    assert_eq!(
        stmt.render_inline(),
        r#"UPDATE "users" SET name = 'O''Brien', active = FALSE WHERE id = 7;"#
    );
}

#[test]
fn test_build_is_idempotent() {
    let payload = UpdatePayload::new().set("a", 1).set("b", "x");
    let wheres = [FilterPredicate::eq("id", 1)];
    let first = build_update("t", payload.clone(), &wheres).unwrap();
    let second = build_update("t", payload, &wheres).unwrap();
    assert_eq!(first.sql(), second.sql());
    assert_eq!(first.values(), second.values());
}

#[derive(Default)]
struct RecordingHook {
    seen: Mutex<Vec<(String, usize)>>,
}

impl StatementHook for Arc<RecordingHook> {
    fn on_statement(&self, stmt: &Statement) {
        self.seen
            .lock()
            .unwrap()
            .push((stmt.sql().to_string(), stmt.bindings().len()));
    }
}

#[test]
fn test_hook_sees_built_statement() {
    let recorder = Arc::new(RecordingHook::default());
    let b = UpdateStatementBuilder::new().with_hook(recorder.clone());
    b.build("t", UpdatePayload::new().set("a", 1), &[FilterPredicate::eq("id", 1)])
        .unwrap();

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (r#"UPDATE "t" SET a = $1 WHERE id = $2;"#.to_string(), 2));
}

#[test]
fn test_hook_not_called_on_error() {
    let recorder = Arc::new(RecordingHook::default());
    let b = UpdateStatementBuilder::new().with_hook(recorder.clone());
    assert!(b.build("t", UpdatePayload::new(), &[]).is_err());
    assert!(recorder.seen.lock().unwrap().is_empty());
}

#[test]
fn test_payload_from_json_object() {
    let payload = UpdatePayload::from_json(serde_json::json!({
        "name": "Alice",
        "age": 30,
        "meta": {"k": 1}
    }))
    .unwrap();
    let stmt = build_update("users", payload, &[FilterPredicate::eq("id", 1)]).unwrap();
    assert_eq!(
        stmt.sql(),
        r#"UPDATE "users" SET name = $1, age = $2, meta = $3 WHERE id = $4;"#
    );
    assert_eq!(stmt.values()[2], &BindValue::Json(serde_json::json!({"k": 1})));
}
