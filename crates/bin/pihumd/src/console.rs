//! Terminal operator — commands from stdin, messages to stdout.

use pihum_app::ports::{InputError, Operator};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// [`Operator`] reading one command per line.
pub struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

impl Console<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Console on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }
}

impl<R, W> Operator for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_command(&mut self) -> Result<String, InputError> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(InputError::EndOfInput),
            Err(err) => Err(InputError::Transient(Box::new(err))),
        }
    }

    async fn say(&mut self, message: &str) {
        let line = format!("{message}\n");
        let written = match self.output.write_all(line.as_bytes()).await {
            Ok(()) => self.output.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            tracing::warn!(%err, "failed to write to operator");
        }
    }
}
