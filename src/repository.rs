use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    daemon::{BuildLimits, CreateServerRequest, DaemonClient, DaemonError},
    error_chain_fmt,
    servers::{
        models::{CreateServerPayload, NewServer, ServerModel},
        queries,
    },
};

///
/// Possible errors that can occur on server lifecycle operations.
///
#[derive(thiserror::Error)]
pub enum RepositoryError {
    /// Invalid data was supplied in the creation payload.
    #[error("A validation error occured.")]
    ValidationError(ValidationErrors),
    /// No server with the requested id exists.
    #[error("No server by that ID was found.")]
    NotFoundError,
    /// A lifecycle rule was violated; the message is safe to display.
    #[error("{0}")]
    DisplayError(String),
    /// The daemon rejected the request or could not be reached.
    #[error("The daemon could not process the request.")]
    DaemonError(#[from] DaemonError),
    /// An unexpected error has occured while processing the request.
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

///
/// Coordinates the database state of servers with the remote daemon.
///
/// Mutations stage their database changes in a transaction, ask the daemon
/// to perform the matching process-level action and only then commit.
///
#[derive(Clone)]
pub struct ServerRepository {
    pool: PgPool,
    daemon: DaemonClient,
}

impl ServerRepository {
    pub fn new(pool: PgPool, daemon: DaemonClient) -> Self {
        Self { pool, daemon }
    }

    #[tracing::instrument(name = "Create a new server", skip(self, payload), fields(server_name = %payload.name))]
    pub async fn create(&self, payload: CreateServerPayload) -> Result<ServerModel, RepositoryError> {
        let new_server: NewServer = payload
            .try_into()
            .map_err(RepositoryError::ValidationError)?;

        let existing = queries::find_server_by_name(&self.pool, new_server.name.as_ref())
            .await
            .context("Failed to check for an existing server name.")?;

        if existing.is_some() {
            return Err(RepositoryError::DisplayError(format!(
                "A server with the name {} already exists.",
                new_server.name
            )));
        }

        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to acquire a postgres connection from the pool.")?;

        let server = queries::insert_server(&mut transaction, &new_server)
            .await
            .context("Failed to insert new server in the database.")?;

        self.daemon
            .create_server(&CreateServerRequest {
                id: server.id,
                name: &server.name,
                build: BuildLimits {
                    memory: server.memory,
                    disk: server.disk,
                    cpu: server.cpu,
                },
            })
            .await?;

        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to store a new server.")?;

        Ok(server)
    }

    #[tracing::instrument(name = "Suspend server", skip(self))]
    pub async fn suspend(&self, server_id: Uuid) -> Result<(), RepositoryError> {
        let server = self.get_existing(server_id).await?;

        if server.suspended {
            return Err(RepositoryError::DisplayError(
                "Server is already suspended.".to_string(),
            ));
        }

        self.set_suspension(server_id, true).await
    }

    #[tracing::instrument(name = "Unsuspend server", skip(self))]
    pub async fn unsuspend(&self, server_id: Uuid) -> Result<(), RepositoryError> {
        let server = self.get_existing(server_id).await?;

        if server.suspended == false {
            return Err(RepositoryError::DisplayError(
                "Server is not suspended.".to_string(),
            ));
        }

        self.set_suspension(server_id, false).await
    }

    #[tracing::instrument(name = "Delete server", skip(self))]
    pub async fn delete_server(&self, server_id: Uuid, force: bool) -> Result<(), RepositoryError> {
        self.get_existing(server_id).await?;

        // A force delete removes the record no matter what the daemon says.
        if let Err(error) = self.daemon.delete_server(server_id).await {
            if force == false {
                return Err(error.into());
            }

            tracing::warn!(
                "Removing server {} despite a daemon failure: {:?}",
                server_id,
                error
            );
        }

        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to acquire a postgres connection from the pool.")?;

        queries::delete_server(&mut transaction, server_id)
            .await
            .context("Failed to delete existing server from the database.")?;

        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to delete a server.")?;

        Ok(())
    }

    async fn set_suspension(&self, server_id: Uuid, suspended: bool) -> Result<(), RepositoryError> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to acquire a postgres connection from the pool.")?;

        queries::set_server_suspension(&mut transaction, server_id, suspended)
            .await
            .context("Failed to update the suspension state of the server.")?;

        if suspended {
            self.daemon.suspend_server(server_id).await?;
        } else {
            self.daemon.unsuspend_server(server_id).await?;
        }

        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to update a server.")?;

        Ok(())
    }

    async fn get_existing(&self, server_id: Uuid) -> Result<ServerModel, RepositoryError> {
        queries::get_server_with_id(&self.pool, server_id)
            .await
            .context("Failed to fetch the server from the database.")?
            .ok_or(RepositoryError::NotFoundError)
    }
}
