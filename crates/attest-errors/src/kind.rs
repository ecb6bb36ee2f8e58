#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    Config,
    Schema,
    Auth,
    Token,
    Jwks,
    Lease,
    Quorum,
    Storage,
    Conflict,
    NotFound,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "Config",
            ErrorKind::Schema => "Schema",
            ErrorKind::Auth => "Auth",
            ErrorKind::Token => "Token",
            ErrorKind::Jwks => "Jwks",
            ErrorKind::Lease => "Lease",
            ErrorKind::Quorum => "Quorum",
            ErrorKind::Storage => "Storage",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unknown => "Unknown",
        }
    }
}
