//! One screen's worth of flow: acquisition, prediction and presentation.

use tracing::{debug, info, warn};

use leafscan_client::{PredictionError, Predictor};

use crate::acquisition::{
    accept_file, Acquisition, AssetLoader, DragEvent, FileCandidate, FsAssetLoader, NoOpReason,
};
use crate::presenter::{Alert, ResultView};
use crate::state::{reduce, Action, Effect, IgnoreReason, ScreenState};

/// Drives a [`ScreenState`] against a predictor.
///
/// A session owns its state exclusively. `submit` takes `&mut self`, so a
/// second request cannot start on the same session while one is pending.
pub struct Session<P, L = FsAssetLoader> {
    predictor: P,
    loader: L,
    state: ScreenState,
}

impl<P: Predictor> Session<P, FsAssetLoader> {
    pub fn new(predictor: P) -> Self {
        Self::with_loader(predictor, FsAssetLoader)
    }
}

impl<P: Predictor, L: AssetLoader> Session<P, L> {
    pub fn with_loader(predictor: P, loader: L) -> Self {
        Self {
            predictor,
            loader,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Rendered view of the current result, if one is shown.
    pub fn result_view(&self) -> Option<ResultView> {
        self.state.result().map(ResultView::from)
    }

    /// Apply an action and return the effect to render.
    pub fn dispatch(&mut self, action: Action) -> Effect {
        let transition = reduce(&self.state, action);
        self.state = transition.state;
        transition.effect
    }

    /// Drag-enter/over/leave on the drop zone.
    pub fn drag(&mut self, event: DragEvent) -> Effect {
        self.dispatch(Action::SetDragActive(event.drag_active()))
    }

    /// A drop always ends the drag, then goes through the same check as
    /// the file input.
    pub fn drop_file(&mut self, candidate: Option<FileCandidate>) -> Effect {
        self.dispatch(Action::SetDragActive(false));
        self.select(accept_file(candidate))
    }

    /// File input change. Same check as a drop, drag state untouched.
    pub fn choose_file(&mut self, candidate: Option<FileCandidate>) -> Effect {
        self.select(accept_file(candidate))
    }

    /// Feed an acquisition outcome into the flow.
    ///
    /// Rejections raise an alert without touching the state; no-ops are
    /// reported as ignored.
    pub fn select(&mut self, acquisition: Acquisition) -> Effect {
        match acquisition {
            Acquisition::Accepted(image) => {
                debug!("Selected image {}", image.preview);
                self.dispatch(Action::SelectImage(image))
            }
            Acquisition::Rejected(err) => Effect::ShowAlert(Alert::for_acquire(&err)),
            Acquisition::NoOp(NoOpReason::NoFile) => Effect::Ignored(IgnoreReason::NoFile),
            Acquisition::NoOp(NoOpReason::Cancelled) => Effect::Ignored(IgnoreReason::Cancelled),
        }
    }

    /// Submit the selected image and wait for the outcome.
    ///
    /// On return the session is in `ResultShown` (success) or back in
    /// `ImageSelected` with an alert (failure), unless the submit was
    /// ignored or refused up front. Dropping the future before it resolves
    /// also lands in `ImageSelected`, with [`Alert::cancelled`] recorded.
    pub async fn submit(&mut self) -> Effect {
        let effect = self.dispatch(Action::Submit);
        if effect != Effect::RequestPrediction {
            return effect;
        }

        let Self {
            predictor,
            loader,
            state,
        } = self;
        let pending = PendingPrediction { state };

        let Some(image) = pending.state.image().cloned() else {
            return pending.finish(Action::PredictionFailed(Alert::no_image()));
        };

        let upload = match image.to_upload(&*loader).await {
            Ok(upload) => upload,
            Err(e) => {
                warn!("Could not load {}: {}", image.preview, e);
                return pending.finish(Action::PredictionFailed(Alert::for_acquire(&e)));
            }
        };

        info!("Requesting prediction for {}", upload.filename);
        let outcome = predictor.predict(&upload).await.and_then(|result| {
            result
                .validate()
                .map_err(|e| PredictionError::malformed(e.to_string()))?;
            Ok(result)
        });

        match outcome {
            Ok(result) => {
                info!(
                    "Prediction for {}: {} ({})",
                    upload.filename,
                    result.class,
                    result.confidence_percent()
                );
                pending.finish(Action::PredictionSucceeded(result))
            }
            Err(e) => {
                warn!("Prediction for {} failed: {}", upload.filename, e);
                let alert = Alert::for_prediction(&e, predictor.base_url());
                pending.finish(Action::PredictionFailed(alert))
            }
        }
    }

    /// Back to `Idle`.
    pub fn reset(&mut self) -> Effect {
        self.dispatch(Action::Reset)
    }

    /// Whether the service is reachable. Never fails.
    pub async fn health(&self) -> bool {
        self.predictor.ping().await
    }
}

/// Holds the state while a prediction is outstanding.
///
/// If the owning future is dropped first, the state is moved out of
/// `Predicting` so the screen stays usable.
struct PendingPrediction<'a> {
    state: &'a mut ScreenState,
}

impl PendingPrediction<'_> {
    fn finish(self, action: Action) -> Effect {
        let transition = reduce(self.state, action);
        *self.state = transition.state;
        transition.effect
    }
}

impl Drop for PendingPrediction<'_> {
    fn drop(&mut self) {
        if self.state.loading() {
            warn!("Prediction dropped before completion");
            let transition = reduce(self.state, Action::PredictionFailed(Alert::cancelled()));
            *self.state = transition.state;
        }
    }
}
