use delegation_probe_sdk::ConnectionDescriptor;
use serde::{Deserialize, Serialize};

/// Backend family, which decides the introspection query text.
///
/// Every query returns exactly four text columns in the same order:
/// server version, current effective user, original login, server login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrospectionDialect {
    SqlServer,
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    Sqlite,
}

impl IntrospectionDialect {
    #[must_use]
    pub const fn query(self) -> &'static str {
        match self {
            Self::SqlServer => "SELECT @@VERSION, CURRENT_USER, ORIGINAL_LOGIN(), SUSER_SNAME()",
            Self::Postgres => {
                "SELECT version(), current_user::text, session_user::text, \
                 current_setting('session_authorization')"
            }
            Self::MySql => "SELECT VERSION(), CURRENT_USER(), USER(), SESSION_USER()",
            // No identity model; fixed placeholders keep the row shape.
            Self::Sqlite => "SELECT 'SQLite ' || sqlite_version(), 'main', 'local', 'local'",
        }
    }

    /// Infer the dialect from a descriptor. `key=value;` strings are ADO-style
    /// SQL Server connection strings.
    #[must_use]
    pub fn detect(descriptor: &ConnectionDescriptor) -> Option<Self> {
        if descriptor.is_key_value() {
            return Some(Self::SqlServer);
        }
        match descriptor.scheme()? {
            "mssql" | "sqlserver" => Some(Self::SqlServer),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}
