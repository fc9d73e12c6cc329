//! Local vs. remote classification of model backends.
//!
//! URLs are only inspected structurally; nothing here connects anywhere.

use std::net::IpAddr;

use url::Url;

use crate::command::is_blank_command;
use crate::config::ModelEntry;

/// Whether `proxy` points at this host: `localhost`, 127.0.0.0/8, or `::1`.
/// Unparseable or host-less URLs are not loopback.
pub fn is_loopback_proxy(proxy: &str) -> bool {
    let Ok(url) = Url::parse(proxy) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ipv4)) => ipv4.is_loopback(),
        Ok(IpAddr::V6(ipv6)) => ipv6.is_loopback(),
        Err(_) => false,
    }
}

impl ModelEntry {
    /// Whether `cmd` holds anything besides whitespace and comment lines.
    pub fn has_cmd(&self) -> bool {
        !is_blank_command(&self.cmd)
    }

    /// A model with a launch command is always local. Without one it is
    /// remote unless its proxy target is a loopback address.
    pub fn is_remote_model(&self) -> bool {
        if self.has_cmd() {
            return false;
        }
        !is_loopback_proxy(&self.proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cmd: &str, proxy: &str) -> ModelEntry {
        ModelEntry {
            cmd: cmd.into(),
            proxy: proxy.into(),
            ..Default::default()
        }
    }

    #[test]
    fn remote_classification_table() {
        let cases = [
            // local: has cmd
            ("local model with cmd", "python server.py", "http://localhost:8080", false),
            ("local model with cmd and remote proxy", "python server.py", "http://example.com:8080", false),
            // remote: no cmd, non-loopback proxy
            ("remote model", "", "http://example.com:8080", true),
            ("remote model https", "", "https://api.openai.com/v1", true),
            ("private range is still remote", "", "http://192.168.1.100:8080", true),
            ("remote model ipv6", "", "http://[2001:db8::1]:8080", true),
            // loopback: not remote
            ("localhost", "", "http://localhost:8080", false),
            ("localhost no port", "", "http://localhost", false),
            ("localhost mixed case", "", "http://LocalHost:9000", false),
            ("127.0.0.1", "", "http://127.0.0.1:8080", false),
            ("127.0.0.2 (loopback range)", "", "http://127.0.0.2:8080", false),
            ("127.255.255.255 (loopback range)", "", "http://127.255.255.255:8080", false),
            ("ipv6 loopback", "", "http://[::1]:8080", false),
            // edge cases
            ("invalid url", "", "not-a-url", true),
            ("empty proxy", "", "", true),
            ("whitespace cmd is no cmd", "   ", "http://example.com", true),
            ("comment-only cmd is no cmd", "# disabled", "http://example.com", true),
            ("comment-only cmd with loopback proxy", "# disabled", "http://localhost:8080", false),
        ];
        for (name, cmd, proxy, expected) in cases {
            assert_eq!(entry(cmd, proxy).is_remote_model(), expected, "case: {name}");
        }
    }

    #[test]
    fn loopback_detection_with_other_schemes() {
        assert!(is_loopback_proxy("tcp://127.0.0.1:9000"));
        assert!(!is_loopback_proxy("file:///tmp/socket"));
    }
}
