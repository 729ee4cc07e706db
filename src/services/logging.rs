// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tracing setup and sensitive data anonymization.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "movie_master_api=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Mask an email for log lines, keeping the first letter and the domain:
/// `alice@example.com` becomes `a***@example.com`. Anything that does not
/// look like an address is masked entirely.
pub fn anonymize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) if !domain.is_empty() => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("***@{domain}"),
        },
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_email_keeps_initial_and_domain() {
        assert_eq!(anonymize_email("moviefan@mail.com"), "m***@mail.com");
        assert_eq!(anonymize_email(" Ed@cinema.org "), "E***@cinema.org");
    }

    #[test]
    fn test_anonymize_email_masks_malformed_input() {
        assert_eq!(anonymize_email("@mail.com"), "***@mail.com");
        assert_eq!(anonymize_email("moviefan@"), "***");
        assert_eq!(anonymize_email("no-address"), "***");
    }
}
