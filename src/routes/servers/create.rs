use actix_http::StatusCode;
use actix_web::{http::header, web, HttpResponse, ResponseError};
use validator::ValidationErrors;

use crate::{
    application::ApplicationBaseUrl,
    error_chain_fmt,
    repository::{RepositoryError, ServerRepository},
    servers::models::{CreateServerPayload, ServerResponse},
};

///
/// Possible errors that can occur on this route.
///
#[derive(thiserror::Error)]
pub enum CreateError {
    /// Invalid data was supplied in the request; carries per-field errors.
    #[error("A validation error occured.")]
    ValidationError(ValidationErrors),
    /// A lifecycle rule was violated; the message is safe to display.
    #[error("{0}")]
    DomainError(String),
    /// An unexpected error has occured while processing the request.
    #[error("There was an error while attempting to add this server to the system.")]
    UnexpectedError(#[source] anyhow::Error),
}

impl std::fmt::Debug for CreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RepositoryError> for CreateError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ValidationError(errors) => Self::ValidationError(errors),
            RepositoryError::DisplayError(message) => Self::DomainError(message),
            other => Self::UnexpectedError(anyhow::Error::new(other)),
        }
    }
}

impl ResponseError for CreateError {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            CreateError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CreateError::DomainError(_) => StatusCode::BAD_REQUEST,
            CreateError::UnexpectedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CreateError::ValidationError(errors) => HttpResponse::build(self.status_code()).json(
                serde_json::json!({ "message": self.to_string(), "errors": errors }),
            ),
            _ => HttpResponse::build(self.status_code())
                .json(serde_json::json!({ "message": self.to_string() })),
        }
    }
}

#[tracing::instrument(name = "Create a new server", skip(body, repository, base_url), fields(server_name = %body.name))]
pub async fn create(
    body: web::Json<CreateServerPayload>,
    repository: web::Data<ServerRepository>,
    base_url: web::Data<ApplicationBaseUrl>,
) -> Result<HttpResponse, CreateError> {
    let server = repository.create(body.into_inner()).await?;

    let location = format!("{}/servers/{}", base_url.0, server.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(ServerResponse::from(server)))
}
