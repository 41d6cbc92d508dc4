//! Example demonstrating UPDATE statement assembly.
//!
//! Run with:
//!   cargo run --example update_statement -p pgstmt

use pgstmt::rules::{BooleanRule, RequiredRule, RuleSet};
use pgstmt::{
    BindingsCollector, Conjunction, DangerousDmlPolicy, FilterPredicate, PlaceholderStyle,
    StmtResult, UpdateConfig, UpdatePayload, UpdateStatementBuilder,
};

fn main() -> StmtResult<()> {
    let builder = UpdateStatementBuilder::new();

    // Single statement into a caller-owned collector.
    let mut bindings = BindingsCollector::new();
    let sql = builder.create_update_sql(
        "users",
        &UpdatePayload::new().set("name", "Alice").set("age", 30),
        &[FilterPredicate::eq("id", 5), FilterPredicate::eq("org_id", 2)],
        &mut bindings,
    )?;
    println!("{sql}");
    for b in &bindings {
        println!("  {} {} = {:?}", b.placeholder_sql, b.column, b.value);
    }

    // Batch: one UPDATE per payload, sharing the collector.
    let stmt = builder.build(
        "public.users",
        vec![
            UpdatePayload::new().set("status", "active"),
            UpdatePayload::new().set("status", "archived").set("archived_at", None::<i64>),
        ],
        &[FilterPredicate::lt("last_login", 1_700_000_000)],
    )?;
    println!("\n{}", stmt.sql());
    println!("-- {} statements, {} params", stmt.statement_count(), stmt.bindings().len());
    println!("{}", stmt.render_inline());

    // Payload from JSON, validated before building.
    let payload = UpdatePayload::from_json(serde_json::json!({ "active": true, "name": "Bob" }))?;
    RuleSet::new()
        .rule("active", BooleanRule)
        .rule("name", RequiredRule)
        .validate(&payload)?;

    let strict = UpdateStatementBuilder::with_config(
        UpdateConfig::new()
            .placeholder_style(PlaceholderStyle::Question)
            .conjunction(Conjunction::Or),
    );
    let stmt = strict.build(
        "accounts",
        payload,
        &[FilterPredicate::eq("id", 1), FilterPredicate::eq("id", 2)],
    )?;
    println!("\n{}", stmt.sql());

    // Unconditional updates can be rejected outright.
    let guarded = UpdateStatementBuilder::with_config(
        UpdateConfig::new().update_without_where(DangerousDmlPolicy::Error),
    );
    match guarded.build("accounts", UpdatePayload::new().set("locked", true), &[]) {
        Ok(stmt) => println!("\nunexpected: {}", stmt.sql()),
        Err(e) => println!("\nrejected: {e}"),
    }

    Ok(())
}
