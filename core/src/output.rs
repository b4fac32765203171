use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::RunnerError;

/// How child stdout is echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Every line, blank ones included.
    #[default]
    Full,
    /// Stop echoing at the first blank line. Output after it is still read
    /// and discarded so the child never blocks on a full pipe.
    StopAtBlankLine,
}

pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str) -> std::io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn line(&self, line: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()
    }
}

/// Copies `reader` to `sink` line by line until EOF. Returns the number of
/// lines echoed.
pub async fn forward_lines<R>(
    reader: R,
    sink: Arc<dyn OutputSink>,
    mode: OutputMode,
) -> Result<usize, RunnerError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut forwarded = 0;
    let mut echoing = true;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(RunnerError::Output)?;

        if read == 0 {
            break;
        }

        if !echoing {
            continue;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }

        if mode == OutputMode::StopAtBlankLine && buf.is_empty() {
            echoing = false;
            continue;
        }

        sink.line(&String::from_utf8_lossy(&buf))
            .map_err(RunnerError::Output)?;
        forwarded += 1;
    }

    Ok(forwarded)
}
