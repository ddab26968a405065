//! Contract between a cursor client and a record source.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use async_trait::async_trait;
use page_cursor_config::parameters::actual;
use page_cursor_data_model::prelude::*;
use page_cursor_logger::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Failure;

/// Record source reachable by a cursor client.
///
/// Both operations are fallible and asynchronous. Implementations do not retry;
/// the calling client serializes its own requests.
#[async_trait]
pub trait CursorTransport: Send + Sync {
    /// Page shape returned by this record source.
    type Page: Send;

    /// Start a new scan and return its first page.
    ///
    /// Calling it again abandons the previous cursor.
    async fn init(&self) -> Result<Self::Page, Failure>;

    /// Fetch the page addressed by `request` within the scan of `cursor`.
    async fn get_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<Self::Page, Failure>;
}

#[async_trait]
impl<T: CursorTransport + ?Sized> CursorTransport for Arc<T> {
    type Page = T::Page;

    async fn init(&self) -> Result<Self::Page, Failure> {
        (**self).init().await
    }

    async fn get_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<Self::Page, Failure> {
        (**self).get_page(cursor, request).await
    }
}

/// Transport that fails calls not answered within a deadline.
#[derive(Debug, Clone)]
pub struct Timeout<T> {
    inner: T,
    timeout: Option<Duration>,
}

impl<T> Timeout<T> {
    /// Wrap `inner`. `None` disables the deadline.
    pub const fn new(inner: T, timeout: Option<Duration>) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `inner` with the deadline from the client configuration.
    pub fn from_config(inner: T, config: &actual::Client) -> Self {
        Self::new(inner, config.request_timeout)
    }

    /// Wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: CursorTransport> Timeout<T> {
    async fn bounded<F>(&self, call: F) -> Result<T::Page, Failure>
    where
        F: core::future::Future<Output = Result<T::Page, Failure>> + Send,
    {
        let Some(timeout) = self.timeout else {
            return call.await;
        };
        tokio::time::timeout(timeout, call).await.unwrap_or_else(|_| {
            warn!(?timeout, "Record source did not answer in time");
            Err(Failure::timed_out(timeout))
        })
    }
}

#[async_trait]
impl<T: CursorTransport> CursorTransport for Timeout<T> {
    type Page = T::Page;

    async fn init(&self) -> Result<Self::Page, Failure> {
        self.bounded(self.inner.init()).await
    }

    async fn get_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<Self::Page, Failure> {
        self.bounded(self.inner.get_page(cursor, request)).await
    }
}

/// Remote procedure endpoint exchanging JSON.
///
/// On failure the endpoint returns whatever error payload the remote side
/// produced; it is classified with [`Failure::from_json`].
#[async_trait]
pub trait RemoteProcedure: Send + Sync {
    /// Invoke `procedure` with named `params`.
    async fn invoke(&self, procedure: &str, params: Map<String, Value>) -> Result<Value, Value>;
}

#[async_trait]
impl<R: RemoteProcedure + ?Sized> RemoteProcedure for Arc<R> {
    async fn invoke(&self, procedure: &str, params: Map<String, Value>) -> Result<Value, Value> {
        (**self).invoke(procedure, params).await
    }
}

/// Names of the procedures serving one cursor variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Procedures {
    /// Procedure starting a scan
    pub init: &'static str,
    /// Procedure fetching a page
    pub get_page: &'static str,
    /// Parameter carrying the cursor token in `get_page`
    pub cursor_param: &'static str,
}

impl Procedures {
    /// Procedures of a standard cursor backend.
    pub const STANDARD: Self = Self {
        init: "initCursor",
        get_page: "getPage",
        cursor_param: "cursor",
    };

    /// Procedures of an advancing-index cursor backend.
    pub const ADVANCING: Self = Self {
        init: "initPaginationCursor",
        get_page: "getPage",
        cursor_param: "pagCursor",
    };
}

/// [`CursorTransport`] over a JSON [`RemoteProcedure`].
pub struct JsonTransport<R, P> {
    remote: R,
    procedures: Procedures,
    _page: PhantomData<fn() -> P>,
}

impl<R, P> core::fmt::Debug for JsonTransport<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JsonTransport")
            .field("procedures", &self.procedures)
            .finish_non_exhaustive()
    }
}

impl<R: RemoteProcedure> JsonTransport<R, StandardPage> {
    /// Standard cursor transport over `remote`.
    pub const fn standard(remote: R) -> Self {
        Self::new(remote, Procedures::STANDARD)
    }
}

impl<R: RemoteProcedure> JsonTransport<R, AdvancingPage> {
    /// Advancing-index cursor transport over `remote`.
    pub const fn advancing(remote: R) -> Self {
        Self::new(remote, Procedures::ADVANCING)
    }
}

impl<R, P> JsonTransport<R, P> {
    /// Constructs [`JsonTransport`].
    pub const fn new(remote: R, procedures: Procedures) -> Self {
        Self {
            remote,
            procedures,
            _page: PhantomData,
        }
    }

    fn decode(value: Value) -> Result<P, Failure>
    where
        P: DeserializeOwned,
    {
        serde_json::from_value(value).map_err(Into::into)
    }
}

#[async_trait]
impl<R, P> CursorTransport for JsonTransport<R, P>
where
    R: RemoteProcedure,
    P: DeserializeOwned + Send,
{
    type Page = P;

    async fn init(&self) -> Result<P, Failure> {
        let response = self
            .remote
            .invoke(self.procedures.init, Map::new())
            .await
            .map_err(Failure::from_json)?;
        Self::decode(response)
    }

    async fn get_page(&self, cursor: &CursorToken, request: PageRequest) -> Result<P, Failure> {
        let mut params = match serde_json::to_value(request)? {
            Value::Object(params) => params,
            _ => Map::new(),
        };
        params.insert(
            self.procedures.cursor_param.to_owned(),
            Value::String(cursor.as_wire().to_owned()),
        );

        let response = self
            .remote
            .invoke(self.procedures.get_page, params)
            .await
            .map_err(Failure::from_json)?;
        Self::decode(response)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
        reply: Mutex<Option<Result<Value, Value>>>,
    }

    #[async_trait]
    impl RemoteProcedure for Recorder {
        async fn invoke(
            &self,
            procedure: &str,
            params: Map<String, Value>,
        ) -> Result<Value, Value> {
            self.calls.lock().push((procedure.to_owned(), params));
            self.reply
                .lock()
                .take()
                .unwrap_or_else(|| Err(json!("no reply")))
        }
    }

    fn advancing_reply() -> Value {
        json!({
            "paginationCursor": "scan-2",
            "records": [{ "Name": "Acme" }],
            "currentPage": 2,
            "totalRecords": 25,
            "nextIndex": 20,
            "deletedRows": 0,
            "hasMorePages": true
        })
    }

    #[tokio::test]
    async fn advancing_get_page_sends_named_params() {
        let recorder = Arc::new(Recorder::default());
        *recorder.reply.lock() = Some(Ok(advancing_reply()));
        let transport = JsonTransport::advancing(Arc::clone(&recorder));

        let page = transport
            .get_page(
                &CursorToken::issue("scan-1"),
                PageRequest::by_index(10, 2, PageSize::DEFAULT),
            )
            .await
            .unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.progress.next_index, 20);

        let calls = recorder.calls.lock();
        let (procedure, params) = &calls[0];
        assert_eq!(procedure, "getPage");
        assert_eq!(
            Value::Object(params.clone()),
            json!({ "pagCursor": "scan-1", "startIndex": 10, "page": 2, "pageSize": 10 })
        );
    }

    #[tokio::test]
    async fn remote_error_payload_is_classified() {
        let recorder = Recorder::default();
        *recorder.reply.lock() = Some(Err(json!({
            "status": 500,
            "body": { "message": "Cursor has expired" }
        })));
        let transport = JsonTransport::standard(recorder);

        let failure = transport.init().await.unwrap_err();
        assert!(matches!(failure, Failure::Transport(_)));
        assert_eq!(failure.user_message(), "Cursor has expired");
    }

    #[tokio::test]
    async fn reply_missing_variant_fields_is_malformed() {
        let recorder = Recorder::default();
        *recorder.reply.lock() = Some(Ok(json!({
            "cursor": "c-1",
            "records": [],
            "currentPage": 1
        })));
        let transport = JsonTransport::standard(recorder);

        let failure = transport.init().await.unwrap_err();
        assert!(failure.user_message().starts_with("Malformed response"));
    }

    struct Stalled;

    #[async_trait]
    impl CursorTransport for Stalled {
        type Page = StandardPage;

        async fn init(&self) -> Result<StandardPage, Failure> {
            core::future::pending().await
        }

        async fn get_page(
            &self,
            _cursor: &CursorToken,
            _request: PageRequest,
        ) -> Result<StandardPage, Failure> {
            core::future::pending().await
        }
    }

    #[tokio::test]
    async fn deadline_turns_into_transport_failure() {
        let transport = Timeout::new(Stalled, Some(Duration::from_millis(10)));
        let failure = transport.init().await.unwrap_err();
        assert_eq!(failure.user_message(), "Request timed out after 10 ms");
    }
}
