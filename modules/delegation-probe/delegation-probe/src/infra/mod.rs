//! Backend drivers.

pub mod sqlx_connector;

pub use sqlx_connector::SqlxConnector;
