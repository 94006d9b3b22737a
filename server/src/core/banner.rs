//! Startup banner

use super::config::{AppConfig, is_all_interfaces};
use super::constants::APP_NAME;

/// Print the startup banner with endpoint URLs and the active filter policy
pub fn print_banner(config: &AppConfig) {
    let host = &config.server.host;
    let port = config.server.port;
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host.as_str()
    };
    let base = format!("http://{}:{}/api", display_host, port);

    const W: usize = 10;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/v1/filters/translate",
        "Translate:", base
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/openapi.json",
        "OpenAPI:", base
    );

    let filters = &config.filters;
    let keys = match &filters.allowed_keys {
        Some(keys) => keys.join(", "),
        None => "any".to_string(),
    };
    println!(
        "  \x1b[90m➜  {:<W$} on_error={} strict={} max={} keys={}\x1b[0m",
        "Filters:", filters.on_error, filters.strict_operators, filters.max_filters, keys
    );
    println!();
}
