//! Classification of database errors the write stage reacts to.

/// SQLSTATE raised by PostgreSQL for a character the database encoding
/// cannot represent (`character_not_in_repertoire`).
pub const SQLSTATE_CHARACTER_NOT_IN_REPERTOIRE: &str = "22021";

/// Whether `err` is PostgreSQL rejecting a NUL character inside a text value.
///
/// The server reports this as
/// `invalid byte sequence for encoding "UTF8": 0x00` with SQLSTATE 22021.
pub fn is_null_byte_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => is_null_byte_error(
            db_err.code().as_deref(),
            db_err.message(),
        ),
        _ => false,
    }
}

fn is_null_byte_error(code: Option<&str>, message: &str) -> bool {
    code == Some(SQLSTATE_CHARACTER_NOT_IN_REPERTOIRE) && message.contains("0x00")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_byte_message_with_matching_code() {
        assert!(is_null_byte_error(
            Some("22021"),
            "invalid byte sequence for encoding \"UTF8\": 0x00"
        ));
    }

    #[test]
    fn other_invalid_byte_is_not_a_null_byte() {
        assert!(!is_null_byte_error(
            Some("22021"),
            "invalid byte sequence for encoding \"UTF8\": 0xc3 0x28"
        ));
    }

    #[test]
    fn other_sqlstate_is_not_a_null_byte() {
        assert!(!is_null_byte_error(Some("23505"), "0x00"));
        assert!(!is_null_byte_error(None, "0x00"));
    }

    #[test]
    fn non_database_errors_are_not_classified() {
        assert!(!is_null_byte_violation(&sqlx::Error::RowNotFound));
        assert!(!is_null_byte_violation(&sqlx::Error::PoolTimedOut));
    }
}
