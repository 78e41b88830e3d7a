//! Shared terminal input
//!
//! Every consumer of stdin (the REPL, the approval prompt, the `ask_user`
//! tool) reads through one [`Console`], so lines buffered by one reader are
//! still seen by the next. Prompts go to stderr to keep stdout clean for
//! answers and JSON.

use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

type LineSource = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;
type PromptSink = Box<dyn AsyncWrite + Send + Unpin>;

static STDIN: OnceLock<Console> = OnceLock::new();

/// Line reader shared by everything that asks the user something
#[derive(Clone)]
pub struct Console {
    lines: Arc<Mutex<LineSource>>,
    prompts: Arc<Mutex<PromptSink>>,
}

impl Console {
    /// The process-wide console over stdin
    pub fn stdin() -> Self {
        STDIN
            .get_or_init(|| Self::from_reader(BufReader::new(tokio::io::stdin())))
            .clone()
    }

    /// A console over any buffered reader, prompting on stderr
    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
            prompts: Arc::new(Mutex::new(Box::new(tokio::io::stderr()))),
        }
    }

    /// Send prompts to `sink` instead of stderr
    pub fn with_prompt_sink(mut self, sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.prompts = Arc::new(Mutex::new(Box::new(sink)));
        self
    }

    /// Read the next line without its terminator; `None` on EOF
    pub async fn read_line(&self) -> io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }

    /// Write `text` to the prompt sink, then read one line
    pub async fn prompt(&self, text: &str) -> io::Result<Option<String>> {
        {
            let mut sink = self.prompts.lock().await;
            sink.write_all(text.as_bytes()).await?;
            sink.flush().await?;
        }
        self.read_line().await
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_buffer() {
        let console = Console::from_reader(&b"first\nsecond\n"[..]);
        let other = console.clone();

        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(other.read_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(console.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prompt_goes_to_sink_not_stdout() {
        let (sink, mut shown) = tokio::io::duplex(256);
        let console = Console::from_reader(&b"y\n"[..]).with_prompt_sink(sink);

        let answer = console.prompt("Approve? [y/N]: ").await.unwrap();
        assert_eq!(answer.as_deref(), Some("y"));

        let mut buf = vec![0u8; 64];
        let n = tokio::io::AsyncReadExt::read(&mut shown, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"Approve? [y/N]: ");
    }

    #[tokio::test]
    async fn test_stdin_console_is_shared() {
        let a = Console::stdin();
        let b = Console::stdin();
        assert!(Arc::ptr_eq(&a.lines, &b.lines));
    }
}
