//! Speech input capability.
//!
//! The prompting page talks to a [`SpeechRecognizer`] trait object chosen
//! once by [`detect`] at startup. When no backend is available the
//! [`Unsupported`] recognizer is selected; callers never branch on
//! availability themselves beyond asking [`SpeechRecognizer::supported`].

use std::collections::VecDeque;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::SpeechSettings;

/// Events delivered by a recognizer while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Full transcript recognized so far in this session.
    Result(String),
    /// Recognition failed; the session is over.
    Error(String),
    /// The recognizer stopped listening.
    End,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech recognition is not supported")]
    Unsupported,

    #[error("failed to read transcript {path}: {source}")]
    Transcript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A speech-to-text backend.
///
/// Results are pulled with [`poll_event`](SpeechRecognizer::poll_event) from
/// the main loop; the call never blocks.
pub trait SpeechRecognizer: Send + Debug {
    /// Whether this backend can listen at all.
    fn supported(&self) -> bool;

    /// Human-readable backend name for the status bar.
    fn description(&self) -> &str;

    /// Begin a listening session.
    fn start(&mut self) -> Result<(), SpeechError>;

    /// End the current session. Pending events are discarded.
    fn stop(&mut self);

    /// Next event of the current session, if any.
    fn poll_event(&mut self) -> Option<SpeechEvent>;
}

/// The recognizer selected when no backend is available.
#[derive(Debug, Default)]
pub struct Unsupported;

impl SpeechRecognizer for Unsupported {
    fn supported(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "speech: unsupported"
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&mut self) {}

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        None
    }
}

/// Replays utterances from a text file, one line per recognition result.
///
/// Each started session re-reads the file and emits the growing transcript
/// one line per poll, followed by [`SpeechEvent::End`].
#[derive(Debug)]
pub struct TranscriptFile {
    path: PathBuf,
    description: String,
    pending: VecDeque<SpeechEvent>,
}

impl TranscriptFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("speech: {}", path.display());
        Self {
            path,
            description,
            pending: VecDeque::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SpeechRecognizer for TranscriptFile {
    fn supported(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SpeechError::Transcript {
            path: self.path.clone(),
            source,
        })?;

        self.pending.clear();
        let mut transcript = String::new();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !transcript.is_empty() {
                transcript.push(' ');
            }
            transcript.push_str(line);
            self.pending.push_back(SpeechEvent::Result(transcript.clone()));
        }
        self.pending.push_back(SpeechEvent::End);

        debug!(path = %self.path.display(), results = self.pending.len() - 1, "listening");
        Ok(())
    }

    fn stop(&mut self) {
        self.pending.clear();
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        self.pending.pop_front()
    }
}

/// Select the speech backend once, at initialization.
pub fn detect(settings: &SpeechSettings) -> Box<dyn SpeechRecognizer> {
    match settings.transcript_file {
        Some(ref path) => {
            info!(path = %path.display(), "speech input from transcript file");
            Box::new(TranscriptFile::new(path))
        }
        None => {
            info!("speech recognition unsupported, voice input disabled");
            Box::new(Unsupported)
        }
    }
}
