//! Port discovery: find the first bindable port in a small range.

use std::net::TcpListener;

use super::ServerError;

/// Probe `attempts` ports from `start` on `host` and return the first that binds.
///
/// Each probe socket is closed before the next attempt, so the returned port is free
/// for the real listener.
pub fn find_available_port(host: &str, start: u16, attempts: u16) -> Result<u16, ServerError> {
    let end = start.saturating_add(attempts.saturating_sub(1));
    for port in (start..=u16::MAX).take(attempts as usize) {
        match TcpListener::bind((host, port)) {
            Ok(probe) => {
                drop(probe);
                log::debug!("Port {} is available on {}", port, host);
                return Ok(port);
            }
            Err(e) => log::debug!("Port {} unavailable on {}: {}", port, host, e),
        }
    }
    Err(ServerError::NoAvailablePort { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "127.0.0.1";

    /// Base of `len` consecutive ports that are currently free.
    fn free_run(len: u16) -> u16 {
        (20_000u16..60_000)
            .step_by(97)
            .find(|base| (*base..*base + len).all(|p| TcpListener::bind((HOST, p)).is_ok()))
            .expect("no free port range")
    }

    #[test]
    fn returns_start_when_free() {
        let base = free_run(10);
        assert_eq!(find_available_port(HOST, base, 10).unwrap(), base);
    }

    #[test]
    fn skips_occupied_start() {
        let base = free_run(10);
        let _held = TcpListener::bind((HOST, base)).unwrap();
        assert_eq!(find_available_port(HOST, base, 10).unwrap(), base + 1);
    }

    #[test]
    fn fails_when_whole_range_is_occupied() {
        let base = free_run(10);
        let _held: Vec<TcpListener> = (base..base + 10)
            .map(|p| TcpListener::bind((HOST, p)).unwrap())
            .collect();
        match find_available_port(HOST, base, 10) {
            Err(ServerError::NoAvailablePort { start, end }) => {
                assert_eq!(start, base);
                assert_eq!(end, base + 9);
            }
            other => panic!("expected NoAvailablePort, got {:?}", other),
        }
    }

    #[test]
    fn discovery_socket_is_released() {
        let base = free_run(10);
        let port = find_available_port(HOST, base, 10).unwrap();
        assert!(TcpListener::bind((HOST, port)).is_ok());
    }
}
