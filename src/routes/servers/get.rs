use actix_http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error_chain_fmt,
    servers::{
        models::{parse_field_projection, ServerResponse},
        queries::get_server_with_id,
    },
};

#[derive(serde::Deserialize)]
pub struct GetQuery {
    pub fields: Option<String>,
}

///
/// Possible errors that can occur on this route.
///
#[derive(thiserror::Error)]
pub enum GetError {
    /// No server with the requested id exists.
    #[error("No server by that ID was found.")]
    NotFoundError,
    /// An unknown column name was passed in the `fields` projection.
    #[error("{0}")]
    BadFieldError(String),
    /// An unexpected error has occured while processing the request.
    #[error("There was an issue while fetching this server from the system.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for GetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GetError {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            GetError::NotFoundError => StatusCode::NOT_FOUND,
            GetError::BadFieldError(_) => StatusCode::BAD_REQUEST,
            GetError::UnexpectedError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[tracing::instrument(name = "Get server", skip(pool, query), fields(fields = ?query.fields))]
pub async fn get(
    server_id: web::Path<Uuid>,
    query: web::Query<GetQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, GetError> {
    let server = get_server_with_id(&pool, *server_id)
        .await
        .context("Failed to fetch the server from the database.")?
        .ok_or(GetError::NotFoundError)?;

    let response = ServerResponse::from(server);

    if let Some(fields) = query.fields.as_deref() {
        let selected = parse_field_projection(fields).map_err(GetError::BadFieldError)?;

        if selected.is_empty() == false {
            let full = serde_json::to_value(&response)
                .context("Failed to serialize the server record.")?;

            let mut record = serde_json::Map::new();

            if let serde_json::Value::Object(full) = full {
                for field in selected {
                    if let Some(value) = full.get(field) {
                        record.insert(field.to_string(), value.clone());
                    }
                }
            }

            return Ok(HttpResponse::Ok().json(record));
        }
    }

    Ok(HttpResponse::Ok().json(response))
}
