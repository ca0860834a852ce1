pub mod env {
    pub const ENVIRONMENT_ENV_VAR: &str = "PORTCULLIS_ENV";
    pub const ENV_PREFIX: &str = "PORTCULLIS";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_DIR: &str = "config";
pub const BASE_CONFIG_FILE: &str = "base";
pub const DEFAULT_ENVIRONMENT: &str = "local";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
