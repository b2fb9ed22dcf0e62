use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use super::media::{open_decoder, open_reader};
use super::thread::{Decoded, LoadRequest, spawn_loader_thread};
use super::types::{EngineError, LoadTicket};
use crate::library::{BlobStore, Source, SourceUrl};

fn ticket(generation: u64, url: &str) -> LoadTicket {
    LoadTicket {
        generation,
        url: SourceUrl::from(url),
    }
}

#[test]
fn memory_reader_reads_blob_bytes() {
    let store = BlobStore::new();
    let blob = store.insert(b"abc".to_vec());
    let mut reader = open_reader(&Source::Blob(blob)).unwrap();
    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    assert_eq!(out, "abc");
}

#[test]
fn missing_file_is_an_open_error() {
    let source = Source::File(PathBuf::from("/nonexistent/turntable/x.mp3"));
    assert!(matches!(open_decoder(&source), Err(EngineError::Open(_))));
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let store = BlobStore::new();
    let blob = store.insert(b"definitely not audio".to_vec());
    assert!(matches!(
        open_decoder(&Source::Blob(blob)),
        Err(EngineError::Decode(_))
    ));
}

#[test]
fn loader_reports_failures_and_always_finishes_the_newest_request() {
    let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
    let (decoded_tx, decoded_rx) = mpsc::channel::<Decoded>();
    let loader = spawn_loader_thread(request_rx, decoded_tx);

    let store = BlobStore::new();
    for generation in 1..=3 {
        request_tx
            .send(LoadRequest {
                ticket: ticket(generation, "blob:turntable/x"),
                source: Source::Blob(store.insert(b"junk".to_vec())),
            })
            .unwrap();
    }

    let mut last = None;
    while let Ok(decoded) = decoded_rx.recv_timeout(Duration::from_secs(5)) {
        assert!(decoded.result.is_err());
        let generation = decoded.ticket.generation;
        last = Some(generation);
        if generation == 3 {
            break;
        }
    }
    assert_eq!(last, Some(3));

    drop(request_tx);
    loader.join().unwrap();
}
