//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Teletask".to_string()
}

pub fn default_data_dir() -> String {
    "~/.teletask".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_deny_message() -> String {
    "Access denied. You are not authorized to use this bot.".to_string()
}

pub fn default_db_path() -> String {
    "~/.teletask/data/tasks.db".to_string()
}

pub fn default_poll_timeout() -> u64 {
    30
}
