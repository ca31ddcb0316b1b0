use actix_http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use uuid::Uuid;

use crate::{
    error_chain_fmt,
    repository::{RepositoryError, ServerRepository},
};

///
/// Possible errors that can occur on this route.
///
#[derive(thiserror::Error)]
pub enum DeleteError {
    /// The optional trailing path segment was not the literal `force`.
    #[error("{0}")]
    ValidationError(String),
    /// No server with the requested id exists.
    #[error("No server by that ID was found.")]
    NotFoundError,
    /// A lifecycle rule was violated; the message is safe to display.
    #[error("{0}")]
    DomainError(String),
    /// The daemon could not process the request.
    #[error("An error occured while attempting to delete this server.")]
    ServiceUnavailableError(#[source] anyhow::Error),
}

impl std::fmt::Debug for DeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RepositoryError> for DeleteError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFoundError => Self::NotFoundError,
            RepositoryError::DisplayError(message) => Self::DomainError(message),
            other => Self::ServiceUnavailableError(anyhow::Error::new(other)),
        }
    }
}

impl ResponseError for DeleteError {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            DeleteError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DeleteError::NotFoundError => StatusCode::NOT_FOUND,
            DeleteError::DomainError(_) => StatusCode::BAD_REQUEST,
            DeleteError::ServiceUnavailableError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[tracing::instrument(name = "Delete server", skip(repository))]
pub async fn delete(
    server_id: web::Path<Uuid>,
    repository: web::Data<ServerRepository>,
) -> Result<HttpResponse, DeleteError> {
    remove_server(*server_id, false, &repository).await
}

#[tracing::instrument(name = "Force delete server", skip(repository))]
pub async fn delete_force(
    path: web::Path<(Uuid, String)>,
    repository: web::Data<ServerRepository>,
) -> Result<HttpResponse, DeleteError> {
    let (server_id, modifier) = path.into_inner();

    if modifier != "force" {
        return Err(DeleteError::ValidationError(format!(
            "{} is not a valid delete modifier!",
            modifier
        )));
    }

    remove_server(server_id, true, &repository).await
}

async fn remove_server(
    server_id: Uuid,
    force: bool,
    repository: &ServerRepository,
) -> Result<HttpResponse, DeleteError> {
    repository.delete_server(server_id, force).await?;

    Ok(HttpResponse::NoContent().finish())
}
