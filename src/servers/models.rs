use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

///
/// Contains validated data to create a new server.
///
#[derive(Debug)]
pub struct NewServer {
    pub name: ServerName,
    pub memory: i64,
    pub disk: i64,
    pub cpu: i64,
}

///
/// Raw creation payload as supplied by the client.
///
/// Resource limits follow the daemon conventions: memory and disk are in
/// MiB, cpu is a percentage where 0 means unlimited and 100 equals one core.
///
#[derive(Debug, serde::Deserialize, Validate)]
pub struct CreateServerPayload {
    #[validate(length(min = 1, max = 191, message = "Server name must be between 1 and 191 characters."))]
    pub name: String,
    #[validate(range(min = 64, message = "Memory must be at least 64 MiB."))]
    pub memory: i64,
    #[validate(range(min = 128, message = "Disk must be at least 128 MiB."))]
    pub disk: i64,
    #[validate(range(min = 0, max = 10000, message = "CPU limit must be between 0 and 10000."))]
    pub cpu: i64,
}

impl TryFrom<CreateServerPayload> for NewServer {
    type Error = validator::ValidationErrors;

    fn try_from(value: CreateServerPayload) -> Result<Self, Self::Error> {
        value.validate()?;

        let name = ServerName::parse(value.name).map_err(|message| {
            let mut errors = validator::ValidationErrors::new();
            let mut error = validator::ValidationError::new("name");
            error.message = Some(message.into());
            errors.add("name", error);

            errors
        })?;

        Ok(Self {
            name,
            memory: value.memory,
            disk: value.disk,
            cpu: value.cpu,
        })
    }
}

///
/// Model to fetch a server from the database with.
///
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct ServerModel {
    pub id: Uuid,
    pub name: String,
    pub memory: i64,
    pub disk: i64,
    pub cpu: i64,
    pub suspended: bool,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServerResponse {
    pub id: Uuid,
    pub name: String,
    pub memory: i64,
    pub disk: i64,
    pub cpu: i64,
    pub suspended: bool,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<ServerModel> for ServerResponse {
    fn from(val: ServerModel) -> Self {
        Self {
            id: val.id,
            name: val.name,
            memory: val.memory,
            disk: val.disk,
            cpu: val.cpu,
            suspended: val.suspended,
            updated_at: val.updated_at,
            created_at: val.created_at,
        }
    }
}

///
/// Provides a validated server name.
///
#[derive(Debug)]
pub struct ServerName(String);

impl ServerName {
    ///
    /// Parse a [`ServerName`] from a [`String`].
    ///
    /// This ensures that it is fully validated and trimmed.
    ///
    pub fn parse(value: String) -> Result<ServerName, String> {
        let value = value.trim();

        if validator::validate_length(value, Some(1), Some(191), None) {
            Ok(Self(value.to_string()))
        } else {
            Err(format!("{} is not a valid server name!", value))
        }
    }
}

impl AsRef<str> for ServerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Columns that clients may select through the `fields` query parameter.
pub const PROJECTABLE_FIELDS: [&str; 8] = [
    "id",
    "name",
    "memory",
    "disk",
    "cpu",
    "suspended",
    "updated_at",
    "created_at",
];

///
/// Parse a comma separated `fields` projection into the list of selected
/// column names. Empty entries are skipped, unknown names are rejected.
///
pub fn parse_field_projection(fields: &str) -> Result<Vec<&str>, String> {
    let mut selected = Vec::new();

    for field in fields.split(',') {
        let field = field.trim();

        if field.is_empty() {
            continue;
        }

        if PROJECTABLE_FIELDS.contains(&field) == false {
            return Err(format!("{} is not a valid server field!", field));
        }

        selected.push(field);
    }

    Ok(selected)
}
