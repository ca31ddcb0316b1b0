use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::*;

/// Page size used by the server listing.
pub const SERVERS_PER_PAGE: i64 = 50;

#[tracing::instrument(name = "Get a page of servers", skip(pool))]
pub async fn list_servers(pool: &PgPool, page: i64) -> Result<Vec<ServerModel>, sqlx::Error> {
    sqlx::query_as::<_, ServerModel>(
        r#"
        SELECT *
        FROM servers
        ORDER BY created_at ASC, id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(SERVERS_PER_PAGE)
    .bind((page - 1) * SERVERS_PER_PAGE)
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "Count all servers", skip(pool))]
pub async fn count_servers(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM servers")
        .fetch_one(pool)
        .await
}

#[tracing::instrument(name = "Get server with id", skip(pool, server_id))]
pub async fn get_server_with_id(
    pool: &PgPool,
    server_id: Uuid,
) -> Result<Option<ServerModel>, sqlx::Error> {
    sqlx::query_as::<_, ServerModel>(
        r#"
        SELECT *
        FROM servers
        WHERE servers.id = $1
        "#,
    )
    .bind(server_id)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(name = "Find server with name", skip(pool, name))]
pub async fn find_server_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<ServerModel>, sqlx::Error> {
    sqlx::query_as::<_, ServerModel>(
        r#"
        SELECT *
        FROM servers
        WHERE servers.name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(
    name = "Saving a new server to the database",
    skip(transaction, new_server)
)]
pub async fn insert_server(
    transaction: &mut Transaction<'_, Postgres>,
    new_server: &NewServer,
) -> Result<ServerModel, sqlx::Error> {
    sqlx::query_as::<_, ServerModel>(
        r#"
        INSERT INTO servers (id, name, memory, disk, cpu)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_server.name.as_ref())
    .bind(new_server.memory)
    .bind(new_server.disk)
    .bind(new_server.cpu)
    .fetch_one(transaction)
    .await
}

#[tracing::instrument(
    name = "Updating the suspension state of a server",
    skip(transaction, server_id)
)]
pub async fn set_server_suspension(
    transaction: &mut Transaction<'_, Postgres>,
    server_id: Uuid,
    suspended: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE servers
        SET suspended = $2, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(server_id)
    .bind(suspended)
    .execute(transaction)
    .await?;

    Ok(())
}

#[tracing::instrument(
    name = "Deleting an existing server from the database",
    skip(transaction, server_id)
)]
pub async fn delete_server(
    transaction: &mut Transaction<'_, Postgres>,
    server_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM servers WHERE id = $1")
        .bind(server_id)
        .execute(transaction)
        .await?;

    Ok(())
}
