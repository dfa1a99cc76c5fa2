//! # canteen-token
//!
//! Issues and verifies the HMAC-SHA256 signed liveness token that binds a
//! passed liveness session to the payment that consumes it (§4.3, §6).
//!
//! Token format mirrors compact JWT: `base64url(header).base64url(payload).base64url(signature)`,
//! header fixed to `{"alg":"HS256","typ":"JWT"}`, signature computed over
//! `base64url(header).base64url(payload)` with the configured shared secret.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use canteen_types::{CanteenError, EmployeeId, LivenessSessionId, TerminalId, error::Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Header<'a> {
    alg: &'a str,
    typ: &'a str,
}

const HEADER: Header<'static> = Header { alg: "HS256", typ: "JWT" };

/// The decoded claim set of a liveness token (§4.3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: EmployeeId,
    pub sid: LivenessSessionId,
    pub tid: TerminalId,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies liveness tokens under one shared HMAC secret.
///
/// The secret is immutable after construction (§9: "Global configuration
/// ... immutable after init"); a `TokenService` is cheap to clone and safe
/// to share across concurrent request handlers.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    /// Mints a token bound to `(employee, session, terminal)`, expiring
    /// `ttl_sec` seconds after `now` (§4.3: default 60 s).
    pub fn issue(
        &self,
        employee_id: EmployeeId,
        session_id: LivenessSessionId,
        terminal_id: TerminalId,
        now: chrono::DateTime<chrono::Utc>,
        ttl_sec: i64,
    ) -> Result<String> {
        let claims = Claims {
            sub: employee_id,
            sid: session_id,
            tid: terminal_id,
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_sec,
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String> {
        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&HEADER).map_err(|e| CanteenError::Serialization(e.to_string()))?,
        );
        let payload_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims).map_err(|e| CanteenError::Serialization(e.to_string()))?,
        );
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = self.sign(signing_input.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok(format!("{signing_input}.{signature_b64}"))
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    /// Verifies signature, algorithm, and expiry, returning the claim set
    /// on success (§4.3, §8 property 7).
    pub fn verify(&self, token: &str, now: chrono::DateTime<chrono::Utc>) -> Result<Claims> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CanteenError::LivenessTokenInvalid);
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| CanteenError::LivenessTokenInvalid)?;
        let header: Header<'_> =
            serde_json::from_slice(&header_bytes).map_err(|_| CanteenError::LivenessTokenInvalid)?;
        if header.alg != canteen_types::constants::JWT_ALG {
            return Err(CanteenError::LivenessTokenInvalid);
        }

        let signing_input = format!("{header_b64}.{payload_b64}");
        let expected_signature = self.sign(signing_input.as_bytes());
        let given_signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CanteenError::LivenessTokenInvalid)?;
        if !constant_time_eq(&expected_signature, &given_signature) {
            return Err(CanteenError::LivenessTokenInvalid);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CanteenError::LivenessTokenInvalid)?;
        let claims: Claims =
            serde_json::from_slice(&payload_bytes).map_err(|_| CanteenError::LivenessTokenInvalid)?;

        if now.timestamp() >= claims.exp {
            return Err(CanteenError::LivenessTokenExpired);
        }

        Ok(claims)
    }
}

/// Compares two byte slices without short-circuiting on the first
/// mismatch, to avoid leaking signature bytes through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
