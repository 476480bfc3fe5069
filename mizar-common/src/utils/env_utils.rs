use std::env;

use crate::prelude::*;

pub struct EnvUtils;

impl EnvUtils {
    pub fn is_environment_variable(test: &str) -> bool {
        env::vars().find(|(k, _)| k.eq(test)).is_some()
    }

    pub fn get_env_str(key: &str) -> Option<InlineStr> {
        if let Ok(v) = env::var(key) {
            Some(v.into())
        } else {
            None
        }
    }

    pub fn get_env_i64(key: &str) -> Option<i64> {
        Self::get_env_str(key).and_then(|v| v.parse::<i64>().ok())
    }

    pub fn get_env_bool(key: &str) -> Option<bool> {
        Self::get_env_str(key).and_then(|v| match v.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
    }
}
