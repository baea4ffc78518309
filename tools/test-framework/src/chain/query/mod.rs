/*!
   Typed queries against the REST API of a Cosmos SDK node.

   The [`RestClient`] is constructed explicitly for each node and passed
   to the query functions. Every query kind decodes into its own response
   type, so that a response with an unexpected shape surfaces as a
   [`QueryDecode`](crate::error::ErrorDetail::QueryDecode) error rather
   than as a failure further down the test.
*/

pub mod bank;
pub mod block;
pub mod gov;
pub mod tx;
pub mod wasm_storage;

use core::time::Duration;
use http::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::Error;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/**
   A client for the REST endpoint of a single node.
*/
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::query_request(base_url.to_string(), e))?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /**
       Fetch the raw body at `path`.

       Any status other than 200 is an error, and the body of such a
       response is never returned.
    */
    pub fn http_get(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, Error> {
        let url = format!("{}{}", self.base_url, path);

        trace!("querying {} with parameters {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| Error::query_request(url.clone(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::query_status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .map_err(|e| Error::query_request(url.clone(), e))?;

        Ok(body.to_vec())
    }

    /**
       Fetch the body at `path` and decode it as JSON into `T`.
    */
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let body = self.http_get(path, query)?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::query_decode(format!("{}{}", self.base_url, path), e))
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use reqwest::blocking::Client;

    use super::RestClient;

    /**
       Serve a single canned HTTP response on a random local port and
       return a client pointing at it.
    */
    pub fn serve_once(status_line: &'static str, body: &'static str) -> RestClient {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).is_ok() {
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    line.clear();
                }

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        let client = Client::builder().no_proxy().build().unwrap();
        RestClient::with_client(&format!("http://{address}"), client)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::test_server::serve_once;
    use crate::error::ErrorDetail;

    #[derive(Debug, Deserialize)]
    struct Dummy {
        #[allow(dead_code)]
        value: u64,
    }

    #[test]
    fn non_200_status_is_an_error() {
        let client = serve_once("404 Not Found", r#"{"value": 1}"#);

        let err = client.get_json::<Dummy>("/dummy", &[]).unwrap_err();

        match err.detail() {
            ErrorDetail::QueryStatus(e) => assert_eq!(e.status, 404),
            other => panic!("expected query status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let client = serve_once("200 OK", r#"{"unexpected": true}"#);

        let err = client.get_json::<Dummy>("/dummy", &[]).unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::QueryDecode(_)));
    }

    #[test]
    fn ok_body_is_decoded() {
        let client = serve_once("200 OK", r#"{"value": 42}"#);

        let body = client.http_get("/dummy", &[]).unwrap();

        assert_eq!(body, br#"{"value": 42}"#.to_vec());
    }
}
