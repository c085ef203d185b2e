//! Voice capture: the recording state machine behind voice-mode interviews.
//!
//! The machine is sans-IO: the client's media layer reports what happened as
//! [`VoiceEvent`]s and performs the [`VoiceEffect`]s returned for each one.
//! The pending answer text is passed in by the owner so partial transcripts can
//! overwrite it.
//!
//! ```text
//! NotRecording ──toggle──▶ AwaitingConsent ──accept──▶ Acquiring ──granted──▶ Recording
//!      ▲                        │decline                 │denied                 │ toggle
//!      └────────────────────────┴────────────────────────┘                       ▼
//!      ◀───────────────────────────── recognition ended ──────────────────── Stopping
//!
//! Recording ──retry──▶ RetryRequested ──recognition ended──▶ Acquiring (restart)
//! ```
//!
//! The audio context outlives individual recordings; only `teardown` closes it.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::interview::volume::{Analyser, FFT_SIZE};

pub const MICROPHONE_REQUIRED_MESSAGE: &str =
    "Microphone access is required for voice interviews. Please allow access and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    NotRecording,
    AwaitingConsent,
    Acquiring,
    Recording,
    Stopping,
    RetryRequested,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// The record button: starts when idle, stops when recording.
    ToggleRecording,
    ConsentAccepted,
    ConsentDeclined,
    MicrophoneGranted,
    MicrophoneDenied { reason: String },
    /// Full transcript so far, including interim results.
    Transcript { text: String },
    RecognitionEnded,
    /// Byte time-domain samples read from the analyser.
    AudioFrame { samples: Vec<u8> },
    Retry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEffect {
    ShowConsent,
    AcquireMicrophone,
    CreateAudioContext,
    ConnectAnalyser { fft_size: usize },
    StartTranscription { continuous: bool, interim_results: bool },
    StopTranscription,
    DisconnectAnalyser,
    StopTracks,
    CloseAudioContext,
    Alert { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioContextState {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct VoiceCapture {
    state: RecordingState,
    consent_given: bool,
    /// Set while re-acquiring the microphone after a retry.
    restarting: bool,
    volume: f32,
    context: Option<AudioContextState>,
    analyser: Option<Analyser>,
    stream_open: bool,
}

impl Default for VoiceCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCapture {
    pub fn new() -> Self {
        Self {
            state: RecordingState::NotRecording,
            consent_given: false,
            restarting: false,
            volume: 0.0,
            context: None,
            analyser: None,
            stream_open: false,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// True while a recording is live, including the restart window of a retry.
    pub fn is_recording(&self) -> bool {
        match self.state {
            RecordingState::Recording | RecordingState::RetryRequested => true,
            RecordingState::Acquiring => self.restarting,
            _ => false,
        }
    }

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn analyser_connected(&self) -> bool {
        self.analyser.is_some()
    }

    pub fn audio_context(&self) -> Option<AudioContextState> {
        self.context
    }

    /// Applies one event. `answer` is the pending answer text.
    pub fn handle(&mut self, event: VoiceEvent, answer: &mut String) -> Vec<VoiceEffect> {
        match event {
            VoiceEvent::ToggleRecording => match self.state {
                RecordingState::Recording => {
                    self.state = RecordingState::Stopping;
                    vec![VoiceEffect::StopTranscription]
                }
                RecordingState::NotRecording => self.request_start(),
                _ => Vec::new(),
            },
            VoiceEvent::ConsentAccepted => {
                self.consent_given = true;
                if self.state == RecordingState::AwaitingConsent {
                    self.state = RecordingState::Acquiring;
                    vec![VoiceEffect::AcquireMicrophone]
                } else {
                    Vec::new()
                }
            }
            VoiceEvent::ConsentDeclined => {
                if self.state == RecordingState::AwaitingConsent {
                    self.state = RecordingState::NotRecording;
                }
                Vec::new()
            }
            VoiceEvent::MicrophoneGranted => self.on_microphone_granted(answer),
            VoiceEvent::MicrophoneDenied { reason } => {
                if self.state != RecordingState::Acquiring {
                    return Vec::new();
                }
                error!("Microphone access denied: {reason}");
                self.state = RecordingState::NotRecording;
                self.restarting = false;
                vec![VoiceEffect::Alert {
                    message: MICROPHONE_REQUIRED_MESSAGE.to_string(),
                }]
            }
            VoiceEvent::Transcript { text } => {
                if matches!(
                    self.state,
                    RecordingState::Recording | RecordingState::Stopping
                ) {
                    *answer = text;
                }
                Vec::new()
            }
            VoiceEvent::AudioFrame { samples } => {
                if let Some(analyser) = &self.analyser {
                    self.volume = analyser.volume(&samples);
                }
                Vec::new()
            }
            VoiceEvent::Retry => {
                if self.state != RecordingState::Recording {
                    return Vec::new();
                }
                self.state = RecordingState::RetryRequested;
                answer.clear();
                vec![VoiceEffect::StopTranscription]
            }
            VoiceEvent::RecognitionEnded => self.on_recognition_ended(),
        }
    }

    /// Ends a live recording. Used when an answer is submitted mid-recording.
    pub fn stop(&mut self) -> Vec<VoiceEffect> {
        if self.state == RecordingState::Recording {
            self.state = RecordingState::Stopping;
            vec![VoiceEffect::StopTranscription]
        } else {
            Vec::new()
        }
    }

    /// Releases every media resource, including the audio context.
    pub fn teardown(&mut self) -> Vec<VoiceEffect> {
        let mut effects = Vec::new();
        if matches!(
            self.state,
            RecordingState::Recording | RecordingState::Stopping | RecordingState::RetryRequested
        ) {
            effects.push(VoiceEffect::StopTranscription);
        }
        if self.stream_open {
            effects.push(VoiceEffect::StopTracks);
            self.stream_open = false;
        }
        effects.extend(self.cleanup_audio());
        if self.context == Some(AudioContextState::Open) {
            effects.push(VoiceEffect::CloseAudioContext);
            self.context = Some(AudioContextState::Closed);
        }
        self.state = RecordingState::NotRecording;
        self.restarting = false;
        effects
    }

    fn request_start(&mut self) -> Vec<VoiceEffect> {
        if !self.consent_given {
            self.state = RecordingState::AwaitingConsent;
            return vec![VoiceEffect::ShowConsent];
        }
        self.state = RecordingState::Acquiring;
        vec![VoiceEffect::AcquireMicrophone]
    }

    fn on_microphone_granted(&mut self, answer: &mut String) -> Vec<VoiceEffect> {
        if self.state != RecordingState::Acquiring {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.stream_open {
            // the previous recording's stream is replaced by this one
            effects.push(VoiceEffect::StopTracks);
        }
        self.stream_open = true;
        answer.clear();

        if self.context != Some(AudioContextState::Open) {
            self.context = Some(AudioContextState::Open);
            effects.push(VoiceEffect::CreateAudioContext);
        }
        let analyser = Analyser::new(FFT_SIZE);
        effects.push(VoiceEffect::ConnectAnalyser {
            fft_size: analyser.fft_size(),
        });
        self.analyser = Some(analyser);
        effects.push(VoiceEffect::StartTranscription {
            continuous: true,
            interim_results: true,
        });

        self.state = RecordingState::Recording;
        self.restarting = false;
        debug!("Recording started");
        effects
    }

    fn on_recognition_ended(&mut self) -> Vec<VoiceEffect> {
        let mut effects = self.cleanup_audio();
        match self.state {
            RecordingState::RetryRequested => {
                self.restarting = true;
                self.state = RecordingState::Acquiring;
                effects.push(VoiceEffect::AcquireMicrophone);
            }
            RecordingState::Recording | RecordingState::Stopping => {
                self.state = RecordingState::NotRecording;
            }
            _ => {}
        }
        effects
    }

    /// Disconnects the analyser graph and zeroes the meter; keeps the context.
    fn cleanup_audio(&mut self) -> Vec<VoiceEffect> {
        self.volume = 0.0;
        match self.analyser.take() {
            Some(_) => vec![VoiceEffect::DisconnectAnalyser],
            None => Vec::new(),
        }
    }
}
