//! In-memory engine for controller tests. Loads stay pending until a test
//! completes them.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::audio::{Engine, EngineError, EngineHandle, LoadTicket, Loaded};
use crate::library::{SourceUrl, Track};

pub(crate) const LENGTH: Duration = Duration::from_secs(180);

#[derive(Debug, Default)]
pub(crate) struct HandleState {
    pub(crate) url: Option<SourceUrl>,
    pub(crate) playing: bool,
    pub(crate) position: Duration,
    pub(crate) volume: f32,
    pub(crate) rate: f32,
    pub(crate) looping: bool,
    pub(crate) ended: bool,
    pub(crate) fail_seek: bool,
    pub(crate) fail_play: bool,
}

pub(crate) struct FakeHandle {
    state: Rc<RefCell<HandleState>>,
    live: Rc<Cell<usize>>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl EngineHandle for FakeHandle {
    fn play(&mut self) -> Result<(), EngineError> {
        let mut s = self.state.borrow_mut();
        if s.fail_play {
            return Err(EngineError::Output("blocked".into()));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, to: Duration) -> Result<(), EngineError> {
        let mut s = self.state.borrow_mut();
        if s.fail_seek {
            return Err(EngineError::Seek("unsupported".into()));
        }
        s.position = to;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        Some(LENGTH)
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn set_rate(&mut self, rate: f32) {
        self.state.borrow_mut().rate = rate;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().looping = looping;
    }

    fn poll_ended(&mut self) -> bool {
        self.state.borrow().ended
    }

    fn fade_out(&mut self, _over: Duration) {
        self.state.borrow_mut().volume = 0.0;
    }
}

#[derive(Default)]
pub(crate) struct Fake {
    pub(crate) pending: VecDeque<LoadTicket>,
    pub(crate) done: VecDeque<Loaded<FakeHandle>>,
    pub(crate) handles: Vec<Rc<RefCell<HandleState>>>,
    pub(crate) live: Rc<Cell<usize>>,
    pub(crate) refuse: bool,
}

impl Fake {
    pub(crate) fn finish_next(&mut self, ok: bool) {
        let Some(ticket) = self.pending.pop_front() else {
            return;
        };
        let result = if ok {
            let state = Rc::new(RefCell::new(HandleState {
                url: Some(ticket.url.clone()),
                ..HandleState::default()
            }));
            self.handles.push(state.clone());
            self.live.set(self.live.get() + 1);
            Ok(FakeHandle {
                state,
                live: self.live.clone(),
            })
        } else {
            Err(EngineError::Decode("not audio".into()))
        };
        self.done.push_back(Loaded { ticket, result });
    }

    pub(crate) fn last_handle(&self) -> Rc<RefCell<HandleState>> {
        self.handles.last().cloned().expect("a handle was created")
    }
}

pub(crate) struct FakeEngine(pub(crate) Rc<RefCell<Fake>>);

impl Engine for FakeEngine {
    type Handle = FakeHandle;

    fn begin_load(&mut self, ticket: LoadTicket, _track: &Track) -> Result<(), EngineError> {
        let mut fake = self.0.borrow_mut();
        if fake.refuse {
            return Err(EngineError::Output("no device".into()));
        }
        fake.pending.push_back(ticket);
        Ok(())
    }

    fn poll_loaded(&mut self) -> Option<Loaded<FakeHandle>> {
        self.0.borrow_mut().done.pop_front()
    }
}
