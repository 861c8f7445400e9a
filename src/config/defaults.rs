pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://activity_finder.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 1;
pub const DEV_SESSION_SECRET: &str = "dev-session-secret-change-me";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 14;
pub const DEFAULT_ACTIVITY_URL: &str = "https://bored-api.appbrewery.com/filter";
pub const DEFAULT_IMAGE_URL: &str = "https://api.unsplash.com/photos/random";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
