use crate::{kind::ErrorKind, retry::RetryClass, severity::Severity};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ErrorCode(Box::leak(s.into_boxed_str())))
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub grpc_status: Option<i32>,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    pub const CONFIG_MISSING: ErrorCode = ErrorCode("CONFIG_MISSING");
    pub const MALFORMED: ErrorCode = ErrorCode("MALFORMED");
    pub const ALG_UNSUPPORTED: ErrorCode = ErrorCode("ALG_UNSUPPORTED");
    pub const BAD_SIGNATURE: ErrorCode = ErrorCode("BAD_SIGNATURE");
    pub const TOKEN_EXPIRED: ErrorCode = ErrorCode("TOKEN_EXPIRED");
    pub const TOKEN_NOT_YET_VALID: ErrorCode = ErrorCode("TOKEN_NOT_YET_VALID");
    pub const TOKEN_REVOKED: ErrorCode = ErrorCode("TOKEN_REVOKED");
    pub const AUDIENCE_MISMATCH: ErrorCode = ErrorCode("AUDIENCE_MISMATCH");
    pub const ISSUER_MISMATCH: ErrorCode = ErrorCode("ISSUER_MISMATCH");
    pub const KID_UNKNOWN: ErrorCode = ErrorCode("KID_UNKNOWN");
    pub const KID_MISSING: ErrorCode = ErrorCode("KID_MISSING");
    pub const JWKS_UNAVAILABLE: ErrorCode = ErrorCode("JWKS_UNAVAILABLE");
    pub const JWKS_MALFORMED: ErrorCode = ErrorCode("JWKS_MALFORMED");
    pub const LEASE_INVALID: ErrorCode = ErrorCode("LEASE_INVALID");
    pub const SCOPE_INSUFFICIENT: ErrorCode = ErrorCode("SCOPE_INSUFFICIENT");
    pub const QUORUM_INSUFFICIENT: ErrorCode = ErrorCode("QUORUM_INSUFFICIENT");
    pub const STORAGE_UNAVAILABLE: ErrorCode = ErrorCode("STORAGE_UNAVAILABLE");
    pub const NOT_FOUND: ErrorCode = ErrorCode("NOT_FOUND");
    pub const INTERNAL: ErrorCode = ErrorCode("INTERNAL");
}

const fn grpc(code: i32) -> Option<i32> {
    Some(code)
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: CONFIG_MISSING,
        kind: ErrorKind::Config,
        http_status: 500,
        grpc_status: grpc(13),
        retryable: RetryClass::None,
        severity: Severity::Critical,
        default_user_msg: "Service is misconfigured.",
    });

    add(CodeSpec {
        code: MALFORMED,
        kind: ErrorKind::Schema,
        http_status: 400,
        grpc_status: grpc(3),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token is malformed.",
    });

    add(CodeSpec {
        code: ALG_UNSUPPORTED,
        kind: ErrorKind::Schema,
        http_status: 400,
        grpc_status: grpc(3),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token algorithm is not supported.",
    });

    add(CodeSpec {
        code: BAD_SIGNATURE,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Signature verification failed.",
    });

    add(CodeSpec {
        code: TOKEN_EXPIRED,
        kind: ErrorKind::Token,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "The token has expired.",
    });

    add(CodeSpec {
        code: TOKEN_NOT_YET_VALID,
        kind: ErrorKind::Token,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "The token is not yet valid.",
    });

    add(CodeSpec {
        code: TOKEN_REVOKED,
        kind: ErrorKind::Token,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token has been revoked.",
    });

    add(CodeSpec {
        code: AUDIENCE_MISMATCH,
        kind: ErrorKind::Token,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token audience does not match.",
    });

    add(CodeSpec {
        code: ISSUER_MISMATCH,
        kind: ErrorKind::Token,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token issuer does not match.",
    });

    add(CodeSpec {
        code: KID_UNKNOWN,
        kind: ErrorKind::Jwks,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The signing key is unknown.",
    });

    add(CodeSpec {
        code: KID_MISSING,
        kind: ErrorKind::Jwks,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The token is missing a key id.",
    });

    add(CodeSpec {
        code: JWKS_UNAVAILABLE,
        kind: ErrorKind::Jwks,
        http_status: 502,
        grpc_status: grpc(14),
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "The signing key service is unavailable. Please retry later.",
    });

    add(CodeSpec {
        code: JWKS_MALFORMED,
        kind: ErrorKind::Jwks,
        http_status: 502,
        grpc_status: grpc(14),
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "The signing key service returned malformed data.",
    });

    add(CodeSpec {
        code: LEASE_INVALID,
        kind: ErrorKind::Lease,
        http_status: 403,
        grpc_status: grpc(7),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The capability lease is invalid.",
    });

    add(CodeSpec {
        code: SCOPE_INSUFFICIENT,
        kind: ErrorKind::Lease,
        http_status: 403,
        grpc_status: grpc(7),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "The lease does not cover the requested scope.",
    });

    add(CodeSpec {
        code: QUORUM_INSUFFICIENT,
        kind: ErrorKind::Quorum,
        http_status: 403,
        grpc_status: grpc(7),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "This operation requires at least three distinct approvers.",
    });

    add(CodeSpec {
        code: STORAGE_UNAVAILABLE,
        kind: ErrorKind::Storage,
        http_status: 503,
        grpc_status: grpc(14),
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Storage backend is unavailable. Please retry later.",
    });

    add(CodeSpec {
        code: NOT_FOUND,
        kind: ErrorKind::NotFound,
        http_status: 404,
        grpc_status: grpc(5),
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Resource not found.",
    });

    add(CodeSpec {
        code: INTERNAL,
        kind: ErrorKind::Unknown,
        http_status: 500,
        grpc_status: grpc(2),
        retryable: RetryClass::Transient,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).expect("unregistered ErrorCode")
}
