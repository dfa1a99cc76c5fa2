//! System-wide constants for the canteen authorization system.
//!
//! Every constant here has a matching environment-variable override in
//! [`crate::config::CanteenConfig::from_env`]; the values below are the
//! defaults applied when the variable is absent.

/// Daily state subsidy ceiling, in cents (100 rubles).
pub const SUBSIDY_DAILY_CENTS: i64 = 10_000;

/// Maximum single meal charge, in cents.
pub const MAX_MEAL_CENTS: i64 = 100_000;

/// Maximum single receipt charge, in cents.
pub const MAX_RECEIPT_CENTS: i64 = 50_000;

/// Euclidean-distance threshold for face-template matching.
pub const FACE_DIST_THRESHOLD: f64 = 0.52;

/// Liveness session time-to-live, in seconds.
pub const LIVENESS_SESSION_TTL_SEC: i64 = 25;

/// Liveness token time-to-live, in seconds.
pub const LIVENESS_TOKEN_TTL_SEC: i64 = 60;

/// Minimum yaw deviation (degrees) from the anchor pose to satisfy `TURN_LEFT`/`TURN_RIGHT`.
pub const TURN_THRESHOLD_DEG: f64 = 15.0;

/// Minimum roll deviation (degrees) from the anchor pose to satisfy `TILT`.
pub const TILT_THRESHOLD_DEG: f64 = 12.0;

/// Dimensionality of a face embedding vector.
pub const FACE_EMBEDDING_DIM: usize = 128;

/// Default timezone applied to calendar-oracle date arithmetic.
pub const DEFAULT_APP_TZ: &str = "Europe/Moscow";

/// Fixed JWT algorithm identifier. The system never negotiates an alternative.
pub const JWT_ALG: &str = "HS256";

/// Bounded timeout for outbound notification calls, in seconds.
pub const NOTIFICATION_TIMEOUT_SEC: u64 = 3;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// System name, used in log context and token issuer fields.
pub const SYSTEM_NAME: &str = "canteen-auth";
