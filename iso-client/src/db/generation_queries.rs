use anyhow::Result;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::domain::GenerationDatum;

/// Insert a batch of generation rows, skipping identities that already exist.
///
/// Returns the number of rows actually written. Callers are expected to keep
/// batches small enough for the bind-parameter limit (six binds per row).
pub async fn insert_generation_batch(
    conn: &mut PgConnection,
    batch: &[GenerationDatum],
) -> Result<u64> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO generation (authority_code, timestamp, fuel_name, gen_mw, frequency, market) ",
    );

    builder.push_values(batch, |mut b, g| {
        b.push_bind(&g.authority_code)
            .push_bind(g.timestamp)
            .push_bind(&g.fuel_name)
            .push_bind(g.gen_mw)
            .push_bind(&g.frequency)
            .push_bind(&g.market);
    });
    builder.push(" ON CONFLICT (authority_code, timestamp, fuel_name) DO NOTHING");

    let res = builder.build().execute(&mut *conn).await?;
    Ok(res.rows_affected())
}

/// Fetch every stored generation row for an authority with
/// `start <= timestamp <= end`, ordered by time then fuel.
pub async fn generation_between(
    pool: &PgPool,
    authority_code: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<GenerationDatum>> {
    let rows = sqlx::query_as::<_, GenerationDatum>(
        r#"
        SELECT
            authority_code,
            timestamp,
            fuel_name,
            gen_mw,
            frequency,
            market
        FROM generation
        WHERE authority_code = $1
          AND timestamp >= $2
          AND timestamp <= $3
        ORDER BY timestamp, fuel_name
        "#,
    )
    .bind(authority_code)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
