//! Screen state machine.
//!
//! `Idle -> ImageSelected -> Predicting -> ResultShown`, driven by a pure
//! reducer. The state record is never mutated in place: every action yields
//! a new [`ScreenState`] plus the [`Effect`] the surface has to carry out.

use leafscan_models::PredictionResult;

use crate::acquisition::SelectedImage;
use crate::presenter::Alert;

/// Where the screen is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No image selected
    #[default]
    Idle,
    /// Image selected, predict control enabled
    ImageSelected,
    /// Request in flight, predict control disabled
    Predicting,
    /// Prediction rendered against the selected image
    ResultShown,
}

/// Everything one screen shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    phase: Phase,
    image: Option<SelectedImage>,
    result: Option<PredictionResult>,
    last_error: Option<Alert>,
    drag_active: bool,
}

impl ScreenState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&Alert> {
        self.last_error.as_ref()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Whether the loading indicator is shown.
    pub fn loading(&self) -> bool {
        self.phase == Phase::Predicting
    }

    /// Whether the predict control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::ImageSelected
    }
}

/// User and network events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectImage(SelectedImage),
    Submit,
    PredictionSucceeded(PredictionResult),
    PredictionFailed(Alert),
    /// Back to `Idle`, dropping the image
    Reset,
    /// Back to `ImageSelected`, keeping the image
    DismissResult,
    SetDragActive(bool),
}

/// Why an action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A prediction is already outstanding
    RequestInFlight,
    /// Completion arrived with no request outstanding
    NoPendingRequest,
    /// The current image already has a result
    AlreadyPredicted,
    /// Nothing to reset or dismiss
    NothingToClear,
    /// Acquisition produced no file
    NoFile,
    /// The user dismissed the picker
    Cancelled,
}

/// What the surface has to do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Send the selected image to the service
    RequestPrediction,
    /// Show a blocking notification
    ShowAlert(Alert),
    Ignored(IgnoreReason),
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ScreenState,
    pub effect: Effect,
}

impl Transition {
    fn to(state: ScreenState, effect: Effect) -> Self {
        Self { state, effect }
    }

    fn ignored(state: &ScreenState, reason: IgnoreReason) -> Self {
        Self::to(state.clone(), Effect::Ignored(reason))
    }
}

/// Apply an action to a state.
pub fn reduce(state: &ScreenState, action: Action) -> Transition {
    use Phase::*;

    match (state.phase, action) {
        (_, Action::SetDragActive(active)) => Transition::to(
            ScreenState {
                drag_active: active,
                ..state.clone()
            },
            Effect::None,
        ),

        (Predicting, Action::SelectImage(_)) | (Predicting, Action::Submit) => {
            Transition::ignored(state, IgnoreReason::RequestInFlight)
        }

        // A new image always drops the previous result in the same step.
        (_, Action::SelectImage(image)) => Transition::to(
            ScreenState {
                phase: ImageSelected,
                image: Some(image),
                result: None,
                last_error: None,
                drag_active: false,
            },
            Effect::None,
        ),

        (Idle, Action::Submit) => {
            Transition::to(state.clone(), Effect::ShowAlert(Alert::no_image()))
        }
        (ResultShown, Action::Submit) => Transition::ignored(state, IgnoreReason::AlreadyPredicted),
        (ImageSelected, Action::Submit) => Transition::to(
            ScreenState {
                phase: Predicting,
                last_error: None,
                ..state.clone()
            },
            Effect::RequestPrediction,
        ),

        (Predicting, Action::PredictionSucceeded(result)) => Transition::to(
            ScreenState {
                phase: ResultShown,
                result: Some(result),
                ..state.clone()
            },
            Effect::None,
        ),
        (Predicting, Action::PredictionFailed(alert)) => Transition::to(
            ScreenState {
                phase: ImageSelected,
                last_error: Some(alert.clone()),
                ..state.clone()
            },
            Effect::ShowAlert(alert),
        ),
        (_, Action::PredictionSucceeded(_)) | (_, Action::PredictionFailed(_)) => {
            Transition::ignored(state, IgnoreReason::NoPendingRequest)
        }

        (Predicting, Action::Reset) | (Predicting, Action::DismissResult) => {
            Transition::ignored(state, IgnoreReason::RequestInFlight)
        }
        (Idle, Action::Reset) => Transition::ignored(state, IgnoreReason::NothingToClear),
        (_, Action::Reset) => Transition::to(ScreenState::default(), Effect::None),

        (ResultShown, Action::DismissResult) => Transition::to(
            ScreenState {
                phase: ImageSelected,
                result: None,
                ..state.clone()
            },
            Effect::None,
        ),
        (_, Action::DismissResult) => Transition::ignored(state, IgnoreReason::NothingToClear),
    }
}
