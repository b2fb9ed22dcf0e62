use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Most notices kept on screen at once; older ones are dropped first.
const MAX_NOTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    expires: Instant,
}

/// Short-lived messages for the user. Nothing here ever blocks input.
#[derive(Debug)]
pub struct Notices {
    items: VecDeque<Notice>,
    ttl: Duration,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text.into(), NoticeLevel::Info, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text.into(), NoticeLevel::Error, Instant::now());
    }

    pub fn push(&mut self, text: String, level: NoticeLevel, now: Instant) {
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            text,
            level,
            expires: now + self.ttl,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|n| n.expires > now);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
