use crate::{Error, Result};
use eo_maxar::FromJson;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;

/// A thin wrapper around one reusable HTTP connection pool.
///
/// Every response is checked: a non-success status becomes
/// [Error::Remote], a body that doesn't match the expected record becomes
/// [Error::Validation]. Requests are never retried, and reqwest's default
/// timeouts apply.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    /// Creates a new transport.
    pub fn new() -> Result<Transport> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        Ok(Transport { client })
    }

    /// GETs a url and decodes the response.
    ///
    /// `query` is appended to the url. Pass an empty slice to request the url
    /// verbatim, e.g. when following a `next` link.
    pub fn get<T: FromJson>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!("GET {url} {query:?}");
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request)
    }

    /// POSTs a JSON body to a url and decodes the response.
    pub fn post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: FromJson,
    {
        tracing::debug!("POST {url}");
        self.send(self.client.post(url).json(body))
    }

    /// Releases the connection pool.
    pub fn close(self) {
        tracing::debug!("closing http transport");
        drop(self.client);
    }

    fn send<T: FromJson>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(Error::Remote { status, url });
        }
        let bytes = response.bytes()?;
        T::from_json_slice(&bytes).map_err(|source| Error::Validation { url, source })
    }
}

/// Returns a string suitable for use as a HTTP user agent.
pub fn user_agent() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::Transport;
    use crate::Error;
    use eo_maxar::{ErrorKind, MosaicRegisterResponse};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn get_with_query() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/searches/abc")
            .match_query(Matcher::UrlEncoded("assets".into(), "visual".into()))
            .match_header("user-agent", super::user_agent())
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "abc"}"#)
            .create();
        let transport = Transport::new().unwrap();
        let response: MosaicRegisterResponse = transport
            .get(
                &format!("{}/searches/abc", server.url()),
                &[("assets", "visual".to_string())],
            )
            .unwrap();
        assert_eq!(response.id, "abc");
        mock.assert();
    }

    #[test]
    fn post_json() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/searches/register")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"a": 1})))
            .with_body(r#"{"id": "abc"}"#)
            .create();
        let transport = Transport::new().unwrap();
        let response: MosaicRegisterResponse = transport
            .post(
                &format!("{}/searches/register", server.url()),
                &json!({"a": 1}),
            )
            .unwrap();
        assert_eq!(response.id, "abc");
        mock.assert();
    }

    #[test]
    fn non_success_is_a_remote_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/collections/missing")
            .with_status(404)
            .with_body(r#"{"code": "NotFoundError", "description": "no collection"}"#)
            .create();
        let transport = Transport::new().unwrap();
        let url = format!("{}/collections/missing", server.url());
        let error = transport
            .get::<MosaicRegisterResponse>(&url, &[])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Remote);
        assert_eq!(error.status().unwrap().as_u16(), 404);
        assert!(matches!(error, Error::Remote { url: u, .. } if u == url));
    }

    #[test]
    fn malformed_body_is_a_validation_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/searches/abc")
            .with_body(r#"{"searchid": "abc"}"#)
            .create();
        let transport = Transport::new().unwrap();
        let error = transport
            .get::<MosaicRegisterResponse>(&format!("{}/searches/abc", server.url()), &[])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(matches!(
            error,
            Error::Validation {
                source: eo_maxar::Error::SerdeJson(_),
                ..
            }
        ));
    }

    #[test]
    fn connection_failure_is_a_transport_error() {
        let transport = Transport::new().unwrap();
        let error = transport
            .get::<MosaicRegisterResponse>("http://127.0.0.1:1/collections", &[])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Transport);
    }
}
