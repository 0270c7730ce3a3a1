/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against a
/// telemetry API on localhost. Override via environment variables in
/// production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Whole-request HTTP timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upstream fetch budget shared by all targets of one query request
    /// (default: `10`).
    pub query_deadline_secs: u64,
    /// Number of back-dated annotation events to seed at startup
    /// (default: `10`).
    pub seed_events: u32,
    /// Seconds between generated annotation events (default: `60`).
    pub generator_period_secs: u64,
    /// Upstream telemetry API settings.
    pub upstream: UpstreamConfig,
}

/// Connection settings for the upstream telemetry API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the telemetry API.
    pub base_url: String,
    /// Credential token sent with every upstream call.
    pub api_key: String,
    /// User the telemetry queries are scoped to.
    pub user_id: String,
    /// Per-call upstream timeout in seconds (default: `10`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8000`                   |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `QUERY_DEADLINE_SECS`   | `10`                     |
    /// | `SEED_EVENTS`           | `10`                     |
    /// | `GENERATOR_PERIOD_SECS` | `60`                     |
    /// | `UPSTREAM_BASE_URL`     | `http://127.0.0.1:8080/` |
    /// | `UPSTREAM_API_KEY`      | `debug_token`            |
    /// | `UPSTREAM_USER_ID`      | `kim`                    |
    /// | `UPSTREAM_TIMEOUT_SECS` | `10`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let query_deadline_secs: u64 = std::env::var("QUERY_DEADLINE_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("QUERY_DEADLINE_SECS must be a valid u64");

        let seed_events: u32 = std::env::var("SEED_EVENTS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SEED_EVENTS must be a valid u32");

        let generator_period_secs: u64 = std::env::var("GENERATOR_PERIOD_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GENERATOR_PERIOD_SECS must be a valid u64");

        let upstream = UpstreamConfig {
            base_url: std::env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080/".into()),
            api_key: std::env::var("UPSTREAM_API_KEY").unwrap_or_else(|_| "debug_token".into()),
            user_id: std::env::var("UPSTREAM_USER_ID").unwrap_or_else(|_| "kim".into()),
            timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64"),
        };

        Self {
            host,
            port,
            request_timeout_secs,
            query_deadline_secs,
            seed_events,
            generator_period_secs,
            upstream,
        }
    }
}
