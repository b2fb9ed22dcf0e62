use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::Decoder;

use crate::library::Source;

use super::media::{MediaReader, open_decoder};
use super::types::{EngineError, LoadTicket};

pub(super) struct LoadRequest {
    pub ticket: LoadTicket,
    pub source: Source,
}

pub(super) struct Decoded {
    pub ticket: LoadTicket,
    pub source: Source,
    pub result: Result<(Decoder<MediaReader>, Option<Duration>), EngineError>,
}

/// Spawn the decode thread. It exits when either channel end is dropped.
///
/// Requests that queued up while a decode was running are collapsed to the
/// newest one; older ones could only produce stale completions.
pub(super) fn spawn_loader_thread(
    requests: Receiver<LoadRequest>,
    decoded: Sender<Decoded>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(mut request) = requests.recv() {
            while let Ok(newer) = requests.try_recv() {
                log::debug!("load of {} superseded before it started", request.ticket.url);
                request = newer;
            }

            log::debug!(
                "decoding {} (generation {})",
                request.ticket.url,
                request.ticket.generation
            );
            let result = open_decoder(&request.source);
            if let Err(e) = &result {
                log::warn!("load of {} failed: {e}", request.ticket.url);
            }

            let out = Decoded {
                ticket: request.ticket,
                source: request.source,
                result,
            };
            if decoded.send(out).is_err() {
                break;
            }
        }
        log::debug!("loader thread exiting");
    })
}
