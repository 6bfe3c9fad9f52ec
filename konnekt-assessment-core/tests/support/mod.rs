#![allow(dead_code)]

use async_trait::async_trait;
use konnekt_assessment_core::audio::{AudioClip, AudioFetcher};
use konnekt_assessment_core::{
    AnswerMap, AudioError, CaptureDevice, CaptureError, CaptureStream, NavigationState,
    RendererProps,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// Everything a host observed through the renderer callbacks
#[derive(Default)]
pub struct HostLog {
    pub answers: RefCell<Vec<AnswerMap>>,
    pub navigation: RefCell<Vec<NavigationState>>,
    pub index_requests: RefCell<Vec<usize>>,
}

impl HostLog {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Wire all three observers of `props` to this log
    pub fn observe<C>(self: &Rc<Self>, props: RendererProps<C>) -> RendererProps<C> {
        let answers = Rc::clone(self);
        let navigation = Rc::clone(self);
        let index = Rc::clone(self);

        props
            .with_on_answers_change(move |map| answers.answers.borrow_mut().push(map))
            .with_on_navigation_change(move |state| navigation.navigation.borrow_mut().push(state))
            .with_on_index_change(move |i| index.index_requests.borrow_mut().push(i))
    }

    pub fn last_navigation(&self) -> Option<NavigationState> {
        self.navigation.borrow().last().cloned()
    }

    pub fn last_answers(&self) -> Option<AnswerMap> {
        self.answers.borrow().last().cloned()
    }

    pub fn navigation_count(&self) -> usize {
        self.navigation.borrow().len()
    }

    pub fn answer_count(&self) -> usize {
        self.answers.borrow().len()
    }
}

/// In-memory microphone
pub struct FakeDevice {
    pub deny: bool,
    pub opened: Cell<u32>,
    pub released: Rc<Cell<u32>>,
    pub payload: Vec<u8>,
}

impl FakeDevice {
    pub fn granting() -> Self {
        Self {
            deny: false,
            opened: Cell::new(0),
            released: Rc::new(Cell::new(0)),
            payload: b"RIFF-fake-audio".to_vec(),
        }
    }

    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::granting()
        }
    }

    /// A stream that does not go through `open`, for two-phase tests
    pub fn stream(&self) -> Box<dyn CaptureStream> {
        Box::new(FakeStream {
            payload: self.payload.clone(),
            released: Rc::clone(&self.released),
        })
    }
}

#[async_trait(?Send)]
impl CaptureDevice for FakeDevice {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if self.deny {
            return Err(CaptureError::PermissionDenied);
        }
        self.opened.set(self.opened.get() + 1);
        Ok(self.stream())
    }
}

pub struct FakeStream {
    payload: Vec<u8>,
    released: Rc<Cell<u32>>,
}

impl CaptureStream for FakeStream {
    fn mime_type(&self) -> String {
        "audio/webm".to_string()
    }

    fn finish(&mut self) -> Vec<u8> {
        self.payload.clone()
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Audio fetcher answering from a fixed result
pub struct FakeFetcher {
    pub fail: bool,
    pub fetched: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn working() -> Self {
        Self {
            fail: false,
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            fetched: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl AudioFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioClip, AudioError> {
        self.fetched.borrow_mut().push(url.to_string());

        if self.fail {
            return Err(AudioError::Fetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(AudioClip {
            url: url.to_string(),
            mime_type: "audio/mpeg".to_string(),
            bytes: vec![0xff, 0xfb],
        })
    }
}
