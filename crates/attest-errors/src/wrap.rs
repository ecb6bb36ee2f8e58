#[cfg(any(feature = "wrap-reqwest", feature = "wrap-sqlx"))]
use crate::model::{ErrorBuilder, ErrorObj};

#[cfg(any(feature = "wrap-reqwest", feature = "wrap-sqlx"))]
use crate::code::codes;

#[cfg(feature = "wrap-reqwest")]
impl From<reqwest::Error> for ErrorObj {
    fn from(e: reqwest::Error) -> Self {
        ErrorBuilder::new(codes::JWKS_UNAVAILABLE)
            .user_msg("The signing key service is unavailable. Please retry later.")
            .dev_msg(format!("reqwest: {e}"))
            .build()
    }
}

#[cfg(feature = "wrap-sqlx")]
impl From<sqlx::Error> for ErrorObj {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::Error::*;

        let (code, user_msg) = match e {
            RowNotFound => (codes::NOT_FOUND, "Resource not found."),
            _ => (
                codes::STORAGE_UNAVAILABLE,
                "Storage backend is unavailable. Please retry later.",
            ),
        };

        ErrorBuilder::new(code)
            .user_msg(user_msg)
            .dev_msg(format!("sqlx: {e}"))
            .build()
    }
}
