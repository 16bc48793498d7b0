//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use rusqlite::Error as SqlError;

use crate::models::{MemberId, Role};

/// Parse a role from its stored text form
pub fn parse_role(s: &str) -> Result<Role, SqlError> {
    Role::parse(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("Invalid role: {s}").into(),
        )
    })
}

/// Parse a member id, rejecting blank values
pub fn parse_member_id(s: String) -> Result<MemberId, SqlError> {
    let id = MemberId::from(s);
    if id.is_empty() {
        return Err(SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            "Blank identity id".into(),
        ));
    }
    Ok(id)
}
