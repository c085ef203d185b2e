//! Input → Loading → Done request flow shared by the single-request screens.

use serde::Serialize;
use tracing::error;

use crate::coach::CoachError;
use crate::screens::FormError;
use crate::ticket::Ticket;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Input,
    Loading,
    Done,
}

#[derive(Debug, Clone, Serialize)]
pub struct SingleShot<T> {
    phase: FormPhase,
    result: Option<T>,
    error: Option<&'static str>,
    #[serde(skip)]
    in_flight: Option<Ticket>,
}

impl<T> Default for SingleShot<T> {
    fn default() -> Self {
        Self {
            phase: FormPhase::Input,
            result: None,
            error: None,
            in_flight: None,
        }
    }
}

impl<T: Clone> SingleShot<T> {
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Loading
    }

    /// Records an inline validation message without leaving the input state.
    pub fn reject(&mut self, message: &'static str) -> FormError {
        self.error = Some(message);
        FormError::Invalid(message)
    }

    pub fn begin(&mut self) -> Result<Ticket, FormError> {
        if self.is_loading() {
            return Err(FormError::Busy);
        }
        self.phase = FormPhase::Loading;
        self.result = None;
        self.error = None;
        let ticket = Ticket::issue();
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Stores the outcome of the call started by `begin` with `ticket`.
    /// On failure the screen returns to input with `failure_message`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<T, CoachError>,
        failure_message: &'static str,
    ) -> Result<T, FormError> {
        if self.in_flight != Some(ticket) {
            return Err(FormError::Stale);
        }
        self.in_flight = None;
        match outcome {
            Ok(value) => {
                self.result = Some(value.clone());
                self.phase = FormPhase::Done;
                Ok(value)
            }
            Err(e) => {
                error!("{failure_message} ({e})");
                self.error = Some(failure_message);
                self.phase = FormPhase::Input;
                Err(FormError::Failed(failure_message))
            }
        }
    }

    /// "Redo": back to an empty input.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
