use crate::config::HttpConfig;

/// Builds the blocking agent shared by the catalog client and the scrapers
pub fn agent(config: &HttpConfig) -> ureq::Agent {
    let timeout = config.timeout();
    ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .timeout_write(timeout)
        .user_agent(concat!("radioplaylist/", env!("CARGO_PKG_VERSION")))
        .build()
}
