use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use gulfsend_core::{Clipboard, ClipboardError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Request = (String, oneshot::Sender<Result<(), ClipboardError>>);

/// System clipboard backed by `arboard`.
///
/// The `arboard::Clipboard` handle lives on its own thread for the whole
/// session (on X11 the selection is only served while the handle is alive).
/// Writes are sent to that thread and answered over a oneshot.
pub struct SystemClipboard {
    tx: mpsc::Sender<Request>,
}

impl SystemClipboard {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Request>();
        if let Err(e) = thread::Builder::new()
            .name("clipboard".into())
            .spawn(move || serve(rx))
        {
            // rx is gone with the closure; every write reports Unavailable.
            warn!("failed to start clipboard thread: {e}");
        }
        Self { tx }
    }
}

fn serve(rx: mpsc::Receiver<Request>) {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(c) => Ok(c),
        Err(e) => {
            warn!("system clipboard unavailable: {e}");
            Err(e.to_string())
        }
    };

    for (text, reply) in rx {
        let result = match clipboard.as_mut() {
            Ok(cb) => cb
                .set_text(text)
                .map_err(|e| ClipboardError::Write(e.to_string())),
            Err(reason) => Err(ClipboardError::Unavailable(reason.clone())),
        };
        let _ = reply.send(result);
    }
    debug!("clipboard thread exiting");
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let stopped = || ClipboardError::Unavailable("clipboard thread stopped".into());
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((text.to_string(), reply_tx))
            .map_err(|_| stopped())?;
        reply_rx.await.map_err(|_| stopped())?
    }
}
