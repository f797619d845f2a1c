//! Blocking passage query client.

use std::time::Duration;

use ureq::Agent;
use versetex_core::{FetchError, PassageSource};

use crate::consts::{DEFAULT_TIMEOUT, ERROR_MARKER, QUERY_PARAMS};

/// Default API key (anonymous, rate limited per IP address).
const DEFAULT_API_KEY: &str = "IP";

/// Create HTTP agent with the specified timeout.
///
/// Status codes are not turned into errors so the client can report the code
/// itself.
pub(crate) fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Client for the ESV passage query service.
pub struct EsvClient {
    /// Passage query endpoint.
    url: String,
    /// Value of the `key` query parameter.
    key: String,
    /// HTTP agent (reused across passages).
    agent: Agent,
}

impl EsvClient {
    /// Create a client for the given endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: DEFAULT_API_KEY.to_owned(),
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set HTTP timeout for passage requests.
    ///
    /// Default is 30 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    fn transport_error(passage: &str, error: &ureq::Error) -> FetchError {
        FetchError::Transport {
            passage: passage.to_owned(),
            message: error.to_string(),
        }
    }
}

impl PassageSource for EsvClient {
    fn fetch(&self, passage: &str) -> Result<String, FetchError> {
        tracing::debug!(passage, url = %self.url, "Requesting passage");

        let response = self
            .agent
            .get(self.url.as_str())
            .query("key", &self.key)
            .query("passage", passage)
            .query_pairs(QUERY_PARAMS.iter().copied())
            .call()
            .map_err(|e| Self::transport_error(passage, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| Self::transport_error(passage, &e))?;

        check_body(passage, body)
    }
}

/// Reject bodies carrying the service's error marker.
fn check_body(passage: &str, body: String) -> Result<String, FetchError> {
    if body.starts_with(ERROR_MARKER) {
        return Err(FetchError::InvalidPassage {
            passage: passage.to_owned(),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve exactly one HTTP response on a local port.
    ///
    /// Returns the endpoint URL and a handle yielding the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v2/rest/passageQuery", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request_line
        });

        (url, handle)
    }

    #[test]
    fn test_check_body_ok() {
        let body = "John 3:16\n[16] For God so loved the world".to_owned();
        assert_eq!(check_body("John3:16", body.clone()).unwrap(), body);
    }

    #[test]
    fn test_check_body_error_marker() {
        let err = check_body("XYZ1", "ERROR: XYZ1 is not a passage".to_owned()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPassage { ref passage } if passage == "XYZ1"));
        assert_eq!(err.to_string(), "Invalid passage argument: XYZ1");
    }

    #[test]
    fn test_check_body_marker_only_at_start() {
        let body = "Jude 3\nNo ERROR here".to_owned();
        assert!(check_body("Jude3", body).is_ok());
    }

    #[test]
    fn test_fetch_success_sends_fixed_query() {
        let (url, server) = serve_once("200 OK", "Isaiah 3:1\n[1] For behold");
        let client = EsvClient::new(url).api_key("TESTKEY");

        let body = client.fetch("ISA3:1").unwrap();
        let request_line = server.join().unwrap();

        assert_eq!(body, "Isaiah 3:1\n[1] For behold");
        assert!(request_line.starts_with("GET /v2/rest/passageQuery?"), "{request_line}");
        assert!(request_line.contains("key=TESTKEY"), "{request_line}");
        assert!(request_line.contains("passage=ISA3"), "{request_line}");
        assert!(request_line.contains("output-format=plain-text"), "{request_line}");
        assert!(request_line.contains("include-verse-numbers=true"), "{request_line}");
        assert!(request_line.contains("include-footnotes=false"), "{request_line}");
        assert!(request_line.contains("line-length=0"), "{request_line}");
    }

    #[test]
    fn test_fetch_non_success_status() {
        let (url, server) = serve_once("503 Service Unavailable", "down");
        let client = EsvClient::new(url);

        let err = client.fetch("ISA3:1").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, FetchError::Status { status: 503 }));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_fetch_error_marker() {
        let (url, server) = serve_once("200 OK", "ERROR: Passage not found");
        let client = EsvClient::new(url);

        let err = client.fetch("NOPE1").unwrap_err();
        server.join().unwrap();

        assert_eq!(err.to_string(), "Invalid passage argument: NOPE1");
    }

    #[test]
    fn test_fetch_connection_refused() {
        // Bind then drop to get a port with no listener.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = EsvClient::new(format!("http://{addr}/")).timeout(Duration::from_secs(5));

        let err = client.fetch("ISA3:1").unwrap_err();

        assert!(matches!(err, FetchError::Transport { ref passage, .. } if passage == "ISA3:1"));
    }
}
