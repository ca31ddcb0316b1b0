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
pub enum UnsuspendError {
    /// No server with the requested id exists.
    #[error("No server by that ID was found.")]
    NotFoundError,
    /// A lifecycle rule was violated; the message is safe to display.
    #[error("{0}")]
    DomainError(String),
    /// The daemon could not process the request.
    #[error("An error occured while attempting to unsuspend this server instance.")]
    ServiceUnavailableError(#[source] anyhow::Error),
}

impl std::fmt::Debug for UnsuspendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RepositoryError> for UnsuspendError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFoundError => Self::NotFoundError,
            RepositoryError::DisplayError(message) => Self::DomainError(message),
            other => Self::ServiceUnavailableError(anyhow::Error::new(other)),
        }
    }
}

impl ResponseError for UnsuspendError {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            UnsuspendError::NotFoundError => StatusCode::NOT_FOUND,
            UnsuspendError::DomainError(_) => StatusCode::BAD_REQUEST,
            UnsuspendError::ServiceUnavailableError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[tracing::instrument(name = "Unsuspend server", skip(repository))]
pub async fn unsuspend(
    server_id: web::Path<Uuid>,
    repository: web::Data<ServerRepository>,
) -> Result<HttpResponse, UnsuspendError> {
    repository.unsuspend(*server_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
