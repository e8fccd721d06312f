//! Scripted stand-in for the broker, used by the unit tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub(crate) enum Step {
    /// Write this text followed by a newline.
    Send(String),
    /// Read one line and forward it to the test.
    Recv,
    /// Wait before the next step.
    Pause(Duration),
    /// Hang up.
    Close,
}

pub(crate) fn send(line: &str) -> Step {
    Step::Send(line.to_string())
}

/// Ready signal, read credentials, accept.
pub(crate) fn handshake() -> Vec<Step> {
    vec![send(r#""ok""#), Step::Recv, send(r#""ACCEPTED""#)]
}

/// Handshake followed by one read-then-reply pair per entry in `replies`.
pub(crate) fn session(replies: &[&str]) -> Vec<Step> {
    let mut steps = handshake();
    for reply in replies {
        steps.push(Step::Recv);
        steps.push(send(reply));
    }
    steps
}

pub(crate) struct FakeBroker {
    pub addr: SocketAddr,
    pub received: mpsc::UnboundedReceiver<String>,
}

impl FakeBroker {
    /// Accepts a single connection and plays `steps` against it. Once the
    /// script runs out the stream stays open and silent until the client
    /// hangs up.
    pub(crate) async fn spawn(steps: Vec<Step>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, received) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();

            for step in steps {
                match step {
                    Step::Send(line) => {
                        if write.write_all(format!("{line}\n").as_bytes()).await.is_err() {
                            return;
                        }
                    }
                    Step::Recv => match lines.next_line().await {
                        Ok(Some(line)) => {
                            let _ = tx.send(line);
                        }
                        _ => return,
                    },
                    Step::Pause(delay) => tokio::time::sleep(delay).await,
                    Step::Close => return,
                }
            }

            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx.send(line);
            }
        });

        Self { addr, received }
    }

    pub(crate) fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Next line the client wrote, parsed as JSON.
    pub(crate) async fn next_json(&mut self) -> serde_json::Value {
        let line = self.received.recv().await.expect("broker saw no line");
        serde_json::from_str(&line).unwrap()
    }
}
