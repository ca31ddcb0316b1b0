use actix_http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;

use crate::{
    error_chain_fmt,
    servers::{
        models::ServerResponse,
        queries::{count_servers, list_servers, SERVERS_PER_PAGE},
    },
};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
}

#[derive(serde::Serialize)]
pub struct Pagination {
    pub total: i64,
    pub count: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(serde::Serialize)]
pub struct PaginationMeta {
    pub pagination: Pagination,
}

#[derive(serde::Serialize)]
pub struct ServerListResponse {
    pub data: Vec<ServerResponse>,
    pub meta: PaginationMeta,
}

///
/// Possible errors that can occur on this route.
///
#[derive(thiserror::Error)]
pub enum ListError {
    /// An unexpected error has occured while processing the request.
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ListError {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            ListError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(name = "List servers", skip(pool, query), fields(page = ?query.page))]
pub async fn list(
    query: web::Query<ListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ListError> {
    let page = query.page.unwrap_or(1).max(1);

    let servers = list_servers(&pool, page)
        .await
        .context("Failed to fetch a page of servers from the database.")?;

    let total = count_servers(&pool)
        .await
        .context("Failed to count the servers in the database.")?;

    let data: Vec<ServerResponse> = servers.into_iter().map(Into::into).collect();
    let total_pages = (total + SERVERS_PER_PAGE - 1) / SERVERS_PER_PAGE;

    Ok(HttpResponse::Ok().json(ServerListResponse {
        meta: PaginationMeta {
            pagination: Pagination {
                total,
                count: data.len() as i64,
                per_page: SERVERS_PER_PAGE,
                current_page: page,
                total_pages,
            },
        },
        data,
    }))
}
