use async_trait::async_trait;
use cucumber::World;
use konnekt_assessment_core::{
    Activity, AnswerMap, AnyRenderer, AssessmentConfig, CaptureDevice, CaptureError, CaptureStream,
    GuardOutcome, MixedAssessment, MixedAssessmentProps, NavigationRequest,
    NavigationState, QuestionRecord, RendererProps, Resolution, Timestamp,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What the host saw through the observers
#[derive(Debug, Default)]
pub struct HostRecorder {
    pub answers: RefCell<Vec<AnswerMap>>,
    pub navigation: RefCell<Vec<NavigationState>>,
    pub index_requests: RefCell<Vec<usize>>,
}

impl HostRecorder {
    pub fn observe<C>(self: &Rc<Self>, props: RendererProps<C>) -> RendererProps<C> {
        let answers = Rc::clone(self);
        let navigation = Rc::clone(self);
        let index = Rc::clone(self);

        props
            .with_on_answers_change(move |map| answers.answers.borrow_mut().push(map))
            .with_on_navigation_change(move |state| navigation.navigation.borrow_mut().push(state))
            .with_on_index_change(move |i| index.index_requests.borrow_mut().push(i))
    }

    pub fn last_navigation(&self) -> NavigationState {
        self.navigation
            .borrow()
            .last()
            .cloned()
            .expect("No navigation state published yet")
    }
}

/// Microphone double with a release counter
#[derive(Debug, Default)]
pub struct FakeMicrophone {
    pub denied: bool,
    pub released: Rc<Cell<u32>>,
}

#[async_trait(?Send)]
impl CaptureDevice for FakeMicrophone {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if self.denied {
            return Err(CaptureError::PermissionDenied);
        }
        Ok(Box::new(FakeStream {
            released: Rc::clone(&self.released),
        }))
    }
}

struct FakeStream {
    released: Rc<Cell<u32>>,
}

impl CaptureStream for FakeStream {
    fn mime_type(&self) -> String {
        "audio/webm".to_string()
    }

    fn finish(&mut self) -> Vec<u8> {
        b"OggS-take".to_vec()
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[derive(Debug, World, Default)]
pub struct AssessmentWorld {
    /// Single-activity renderer under test
    pub renderer: Option<AnyRenderer>,

    /// Props the host renders with (content comes from the activity)
    pub host_props: Option<RendererProps<()>>,

    /// Mixed assessment under test
    pub assessment: Option<MixedAssessment>,

    pub questions: Vec<QuestionRecord>,

    /// Resolutions in presentation order
    pub resolutions: Vec<Rc<Resolution>>,

    pub host: Rc<HostRecorder>,

    pub microphone: FakeMicrophone,

    pub last_request: Option<NavigationRequest>,
    pub last_outcome: Option<GuardOutcome>,
    pub last_error: Option<CaptureError>,

    /// Assessment clock in milliseconds
    pub clock_ms: u64,
}

impl AssessmentWorld {
    /// Mount a renderer for `activity`, optionally host-controlled
    pub fn mount(&mut self, activity: Activity, controlled_index: Option<usize>) {
        let mut props = self.host.observe(RendererProps::new(()));
        if let Some(index) = controlled_index {
            props = props.with_current_index(index);
        }
        self.renderer = Some(AnyRenderer::mount(&activity, props.clone()));
        self.host_props = Some(props);
    }

    /// Host re-render with a new controlled index
    pub fn host_renders_index(&mut self, index: usize) {
        let props = self
            .host_props
            .take()
            .expect("No renderer mounted")
            .with_current_index(index);
        self.renderer_mut().render(props.clone());
        self.host_props = Some(props);
    }

    pub fn renderer(&self) -> &AnyRenderer {
        self.renderer.as_ref().expect("No renderer mounted")
    }

    pub fn renderer_mut(&mut self) -> &mut AnyRenderer {
        self.renderer.as_mut().expect("No renderer mounted")
    }

    pub fn start_assessment(&mut self, controlled_index: Option<usize>) {
        let mut props: MixedAssessmentProps =
            self.host.observe(RendererProps::new(self.questions.clone()));
        if let Some(index) = controlled_index {
            props = props.with_current_index(index);
        }
        self.assessment = Some(MixedAssessment::new(props, AssessmentConfig::default()));
    }

    pub fn assessment(&self) -> &MixedAssessment {
        self.assessment.as_ref().expect("No assessment started")
    }

    pub fn assessment_mut(&mut self) -> &mut MixedAssessment {
        self.assessment.as_mut().expect("No assessment started")
    }

    pub fn advance_clock(&mut self, ms: u64) -> Timestamp {
        self.clock_ms += ms;
        Timestamp::from_millis(self.clock_ms)
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.clock_ms)
    }
}
