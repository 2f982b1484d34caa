use std::path::PathBuf;

pub fn default_web_root() -> PathBuf {
    PathBuf::from("wwwroot")
}

pub fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("bundles")
}

pub fn default_extensions() -> Vec<String> {
    vec!["js".to_string(), "scss".to_string(), "css".to_string()]
}

pub fn default_ignore_prefixes() -> Vec<String> {
    vec!["-".to_string(), "~".to_string()]
}

pub fn default_ignore_suffixes() -> Vec<String> {
    vec![".tmp".to_string(), "~".to_string()]
}

pub fn default_debounce_ms() -> u64 {
    500
}

pub fn default_poll_interval_ms() -> u64 {
    250
}

pub fn default_sse_path() -> String {
    "/sse".to_string()
}

pub fn default_port() -> u16 {
    5000
}

pub fn default_build_on_start() -> bool {
    true
}

pub fn default_client_buffer() -> usize {
    64
}

pub fn default_bundler_program() -> String {
    "node".to_string()
}

pub fn default_debug_args() -> Vec<String> {
    vec!["build.debug.js".to_string()]
}

pub fn default_release_args() -> Vec<String> {
    vec!["build.prod.js".to_string()]
}

pub fn default_error_marker() -> String {
    "[ERROR]".to_string()
}
