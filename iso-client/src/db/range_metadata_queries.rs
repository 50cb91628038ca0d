use anyhow::Result;
use sqlx::{PgConnection, PgPool};

use crate::domain::{DataType, RangeMetadata};

pub async fn fetch_range_metadata(
    pool: &PgPool,
    authority_code: &str,
    data_type: DataType,
) -> Result<Option<RangeMetadata>> {
    let row = sqlx::query_as::<_, RangeMetadata>(
        r#"
        SELECT authority_code, data_type, least_recent, most_recent
        FROM authority_metadata
        WHERE authority_code = $1
          AND data_type = $2
        "#,
    )
    .bind(authority_code)
    .bind(data_type.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Create or widen the metadata row for `meta`'s series.
///
/// An existing interval is only ever extended (LEAST/GREATEST), so a writer
/// holding a stale view cannot shrink what another writer recorded.
pub async fn upsert_range_metadata(
    conn: &mut PgConnection,
    meta: &RangeMetadata,
) -> Result<RangeMetadata> {
    let row = sqlx::query_as::<_, RangeMetadata>(
        r#"
        INSERT INTO authority_metadata (authority_code, data_type, least_recent, most_recent)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (authority_code, data_type) DO UPDATE SET
            least_recent = LEAST(authority_metadata.least_recent, EXCLUDED.least_recent),
            most_recent  = GREATEST(authority_metadata.most_recent, EXCLUDED.most_recent)
        RETURNING authority_code, data_type, least_recent, most_recent
        "#,
    )
    .bind(&meta.authority_code)
    .bind(&meta.data_type)
    .bind(meta.least_recent)
    .bind(meta.most_recent)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}
