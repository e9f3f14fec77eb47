use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use contract_engine::unknown_tokens;

/// Clause library shipped with the binary, loaded on first start.
const DEFAULT_CLAUSES: &str = include_str!("../assets/default_clauses.json");

#[derive(Debug, Deserialize)]
struct SeedClause {
    title: String,
    content: String,
    article_number: Option<u32>,
    #[serde(default)]
    is_annex: bool,
    order_index: i32,
}

/// Inserts the default clause library when the clause table is empty.
///
/// Unknown `{{...}}` tokens are left verbatim at render time, so this is
/// the one place clause text gets linted and typos get surfaced in the log.
pub async fn seed_default_clauses(db: &SqlitePool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clauses")
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let clauses: Vec<SeedClause> = serde_json::from_str(DEFAULT_CLAUSES)?;

    for clause in &clauses {
        let unknown = unknown_tokens(&clause.content);
        if !unknown.is_empty() {
            tracing::warn!(
                "Clause '{}' references unsupported placeholders: {:?}",
                clause.title,
                unknown
            );
        }

        sqlx::query(
            "INSERT INTO clauses (id, title, content, article_number, is_annex, order_index) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&clause.title)
        .bind(&clause.content)
        .bind(clause.article_number)
        .bind(clause.is_annex)
        .bind(clause.order_index)
        .execute(db)
        .await?;
    }

    tracing::info!("Seeded {} default clauses", clauses.len());
    Ok(())
}

/// Inserts a demonstration landlord, tenant and lease when no lease exists
/// yet. Returns the lease id so it can be printed for quick manual testing.
pub async fn seed_demo_data(db: &SqlitePool) -> anyhow::Result<String> {
    if let Some(existing) = sqlx::query_scalar::<_, String>("SELECT id FROM leases LIMIT 1")
        .fetch_optional(db)
        .await?
    {
        return Ok(existing);
    }

    let landlord_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM landlord_profiles")
        .fetch_one(db)
        .await?;
    if landlord_count == 0 {
        sqlx::query(
            "INSERT INTO landlord_profiles \
             (id, full_name, nationality, passport_number, address, bank_name, bank_account) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind("Claire Martin")
        .bind("Française")
        .bind("19FV73214")
        .bind("12 rue de la République, 69001 Lyon")
        .bind("Crédit Agricole")
        .bind("FR76 1027 8060 4100 0204 2640 145")
        .execute(db)
        .await?;
    }

    let tenant_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO tenants (id, first_name, last_name, email, phone) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&tenant_id)
    .bind("Jean")
    .bind("Dupont")
    .bind("jean.dupont@example.fr")
    .bind("+33 6 12 34 56 78")
    .execute(db)
    .await?;

    let lease_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO leases \
         (id, tenant_id, unit_number, bedrooms, bathrooms, start_date, end_date, rent_amount, deposit_amount) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL)",
    )
    .bind(&lease_id)
    .bind(&tenant_id)
    .bind("A3")
    .bind(2)
    .bind(1)
    .bind("2026-09-01")
    .bind("2027-08-31")
    .bind(700.0)
    .execute(db)
    .await?;

    tracing::info!("Seeded demo lease {} (tenant Jean Dupont, unit A3)", lease_id);
    Ok(lease_id)
}
