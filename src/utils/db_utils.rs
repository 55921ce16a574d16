use sea_orm::{DbErr, SqlErr};

/// Storage-level unique constraints are the authoritative duplicate check;
/// callers translate a violation into the domain "already exists" conflict.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
