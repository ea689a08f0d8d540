use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

use bytes::Bytes;
use eyre::Context;
use http::{header::CONTENT_TYPE, uri::InvalidUri, Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};

use super::{
    error::{error_chain, NetworkFailure},
    LogSink, SinkError,
};
use crate::http::{Builder as HttpClientBuilder, HttpsClient};

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

pub struct StdoutSink {
    handle: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            handle: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_batch(&self, records: &[String]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut writer = self.handle.lock();
        write_lines(&mut writer, records).map_err(|e| SinkError::io("<stdout>", e))
    }
}

fn write_lines<W: Write>(writer: &mut W, records: &[String]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()
}

/// Overwrites the target file with the current batch on every flush.
pub struct FileSink {
    file_path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn overwrite(&self, contents: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }

        let mut file = options.open(&self.file_path)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

fn render_lines(records: &[String]) -> String {
    let mut contents = records.join("\n");
    contents.push('\n');
    contents
}

impl LogSink for FileSink {
    fn write_batch(&self, records: &[String]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        let contents = render_lines(records);
        self.overwrite(contents.as_bytes())
            .map_err(|e| SinkError::io(&self.file_path, e))?;

        tracing::trace!(
            "wrote {} bytes to {}",
            contents.len(),
            self.file_path.display()
        );
        Ok(())
    }
}

/// Runtime owned by a sink. Shut down without waiting on its blocking pool, so a sink can be
/// dropped from inside someone else's async context.
struct SinkRuntime(Option<tokio::runtime::Runtime>);

impl SinkRuntime {
    fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self(Some(runtime)))
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> Option<F::Output> {
        self.0.as_ref().map(|runtime| runtime.block_on(future))
    }
}

impl Drop for SinkRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// POSTs each batch as a JSON array of strings and expects exactly `200 OK` back.
///
/// Requests are driven by a current-thread runtime owned by the sink, so a flush blocks the
/// calling thread until the response arrives. There's no timeout: a stalled endpoint stalls
/// every caller waiting on the logger lock.
pub struct NetworkSink {
    url: String,
    runtime: SinkRuntime,
    client: HttpsClient,
}

impl NetworkSink {
    pub fn new(url: impl Into<String>) -> eyre::Result<Self> {
        let url: String = url.into();

        let runtime = SinkRuntime::new().context("Failed building runtime for network sink")?;

        // Connections would otherwise sit idle between flushes while nothing drives the runtime.
        let mut client_builder =
            hyper_util::client::legacy::Builder::new(hyper_util::rt::TokioExecutor::new());
        client_builder.pool_max_idle_per_host(0);

        let client = HttpClientBuilder::new()
            .hyper_builder(client_builder)
            .build()
            .with_context(|| format!("Failed building http client for {}", url))?;

        tracing::debug!("network sink targeting {}", url);
        Ok(Self {
            url,
            runtime,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn failure(&self, reason: NetworkFailure) -> SinkError {
        SinkError::network(&self.url, reason)
    }

    fn build_request(&self, body: Vec<u8>) -> Result<Request<Full<Bytes>>, SinkError> {
        let uri: Uri = self
            .url
            .parse()
            .map_err(|e: InvalidUri| self.failure(NetworkFailure::InvalidUrl(e.to_string())))?;

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| self.failure(NetworkFailure::Request(e.to_string())))
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<(), NetworkFailure> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| NetworkFailure::Transport(error_chain(&e)))?;

        let status = response.status();
        tracing::debug!("POST {} answered {}", self.url, status);

        // The body carries nothing we use, but it's read to completion before the connection goes.
        let drained = response.into_body().collect().await;

        if status != StatusCode::OK {
            return Err(NetworkFailure::Status(status.as_u16()));
        }

        drained
            .map(|_| ())
            .map_err(|e| NetworkFailure::Transport(error_chain(&e)))
    }
}

impl LogSink for NetworkSink {
    fn write_batch(&self, records: &[String]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_vec(records)?;
        let request = self.build_request(body)?;

        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(self.failure(NetworkFailure::NestedRuntime));
        }

        self.runtime
            .block_on(self.send(request))
            .unwrap_or(Err(NetworkFailure::NestedRuntime))
            .map_err(|reason| self.failure(reason))
    }
}
