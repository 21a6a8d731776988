pub fn default_version() -> u32 {
    1
}

pub fn default_true() -> bool {
    true
}

pub fn default_config_path() -> &'static str {
    "pre-commit.yaml"
}
