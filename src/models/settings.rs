//! Application settings
//!
//! Small key/value state that outlives a session, such as whether onboarding
//! has been completed.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

const ONBOARDING_COMPLETED: &str = "onboarding_completed";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub onboarding_completed: bool,
}

impl AppSettings {
    pub fn load(conn: &Connection) -> DbResult<Self> {
        Ok(Self {
            onboarding_completed: get_flag(conn, ONBOARDING_COMPLETED)?,
        })
    }

    pub fn set_onboarding_completed(conn: &Connection, completed: bool) -> DbResult<()> {
        set_flag(conn, ONBOARDING_COMPLETED, completed)
    }
}

fn get_flag(conn: &Connection, key: &str) -> DbResult<bool> {
    let value: Option<String> = conn
        .query_row("SELECT value FROM app_settings WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;
    Ok(value.as_deref() == Some("true"))
}

fn set_flag(conn: &Connection, key: &str, value: bool) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO app_settings (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
        params![key, if value { "true" } else { "false" }],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    #[test]
    fn test_onboarding_flag_round_trip() {
        let conn = test_conn();
        assert!(!AppSettings::load(&conn).unwrap().onboarding_completed);

        AppSettings::set_onboarding_completed(&conn, true).unwrap();
        assert!(AppSettings::load(&conn).unwrap().onboarding_completed);

        AppSettings::set_onboarding_completed(&conn, false).unwrap();
        assert!(!AppSettings::load(&conn).unwrap().onboarding_completed);
    }
}
