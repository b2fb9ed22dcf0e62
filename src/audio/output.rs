use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use rodio::{OutputStream, OutputStreamBuilder};

use crate::library::Track;

use super::engine::Engine;
use super::sink::{RodioHandle, create_handle};
use super::thread::{Decoded, LoadRequest, spawn_loader_thread};
use super::types::{EngineError, LoadTicket, Loaded};

/// The real engine: default output device plus a background decode thread.
///
/// Sinks are created on the caller's thread from `poll_loaded`, so every
/// handle lives where the controller lives.
pub struct RodioEngine {
    stream: Option<OutputStream>,
    requests: Option<Sender<LoadRequest>>,
    decoded: Receiver<Decoded>,
    loader: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Open the default output. A missing device is logged, not fatal:
    /// every load then fails with `EngineError::Output`.
    pub fn open() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which would
                // scribble over the terminal UI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::error!("no audio output device: {e}");
                None
            }
        };

        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (decoded_tx, decoded_rx) = mpsc::channel::<Decoded>();
        let loader = spawn_loader_thread(request_rx, decoded_tx);

        Self {
            stream,
            requests: Some(request_tx),
            decoded: decoded_rx,
            loader: Some(loader),
        }
    }

    pub fn has_output(&self) -> bool {
        self.stream.is_some()
    }
}

impl Engine for RodioEngine {
    type Handle = RodioHandle;

    fn begin_load(&mut self, ticket: LoadTicket, track: &Track) -> Result<(), EngineError> {
        if self.stream.is_none() {
            return Err(EngineError::Output("no audio output device".to_string()));
        }
        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| EngineError::Output("audio loader stopped".to_string()))?;
        requests
            .send(LoadRequest {
                ticket,
                source: track.source.clone(),
            })
            .map_err(|_| EngineError::Output("audio loader stopped".to_string()))
    }

    fn poll_loaded(&mut self) -> Option<Loaded<RodioHandle>> {
        let decoded = self.decoded.try_recv().ok()?;
        let result = match (decoded.result, self.stream.as_ref()) {
            (Ok((decoder, duration)), Some(stream)) => {
                Ok(create_handle(stream, decoder, decoded.source, duration))
            }
            (Ok(_), None) => Err(EngineError::Output("no audio output device".to_string())),
            (Err(e), _) => Err(e),
        };
        Some(Loaded {
            ticket: decoded.ticket,
            result,
        })
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        // Closing the request channel ends the loader loop.
        self.requests.take();
        if let Some(loader) = self.loader.take() {
            let _ = loader.join();
        }
    }
}
