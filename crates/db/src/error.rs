//! Conversion of database errors into application errors.

use cashbook_shared::{AppError, AppResult};
use sea_orm::DbErr;

/// Maps a `Result<_, DbErr>` into an `AppResult`, surfacing database
/// failures as `AppError::Database`.
pub(crate) trait DbResultExt<T> {
    /// Converts the database error, if any, into `AppError::Database`.
    fn map_db(self) -> AppResult<T>;
}

impl<T> DbResultExt<T> for Result<T, DbErr> {
    fn map_db(self) -> AppResult<T> {
        self.map_err(|err| AppError::Database(err.to_string()))
    }
}
