use crate::error::Result;
use crate::models::BlogUser;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert or refresh the local shadow of an identity-provider account
///
/// First login inserts the row; later logins refresh email and role,
/// which are authoritative at the provider.
pub async fn upsert_external_user(
    pool: &PgPool,
    external_id: i64,
    email: &str,
    username: &str,
    role: &str,
) -> Result<BlogUser> {
    let user = sqlx::query_as::<_, BlogUser>(
        r#"
        INSERT INTO blog_users (id, external_id, email, username, role, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, CURRENT_TIMESTAMP)
        ON CONFLICT (external_id)
        DO UPDATE SET email = EXCLUDED.email, role = EXCLUDED.role
        RETURNING id, external_id, email, username, role, created_at
        "#,
    )
    .bind(external_id)
    .bind(email)
    .bind(username)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get a local user by ID
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<BlogUser>> {
    let user = sqlx::query_as::<_, BlogUser>(
        r#"
        SELECT id, external_id, email, username, role, created_at
        FROM blog_users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
