use crate::audio::AudioSource;
use crate::error::AudioError;
use async_trait::async_trait;

/// Fetched and decoded audio, ready to hand to an output device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub url: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Fetches and decodes audio for a URL
///
/// Single-threaded: implementations may hold `Rc` state.
#[async_trait(?Send)]
pub trait AudioFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioClip, AudioError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No source at all
    Unavailable,
    Idle,
    Loading,
    Playing,
    /// Fetch or decode failed; playing again retries
    Failed(AudioError),
}

/// How the play control should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAffordance {
    Hidden,
    Enabled,
    /// Source is still pending
    Disabled,
}

/// Identifies one fetch; results carrying an older ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTicket {
    generation: u64,
}

/// Plays one audio source at a time
#[derive(Debug)]
pub struct AudioPlayback {
    source: Option<AudioSource>,
    state: PlaybackState,
    generation: u64,
    clip: Option<AudioClip>,
}

impl AudioPlayback {
    pub fn new(source: Option<AudioSource>) -> Self {
        let state = Self::resting_state(source.as_ref());
        Self {
            source,
            state,
            generation: 0,
            clip: None,
        }
    }

    fn resting_state(source: Option<&AudioSource>) -> PlaybackState {
        match source {
            None => PlaybackState::Unavailable,
            Some(_) => PlaybackState::Idle,
        }
    }

    pub fn source(&self) -> Option<&AudioSource> {
        self.source.as_ref()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn affordance(&self) -> AudioAffordance {
        match &self.source {
            None => AudioAffordance::Hidden,
            Some(source) if source.is_playable() => AudioAffordance::Enabled,
            Some(_) => AudioAffordance::Disabled,
        }
    }

    /// Switch to another source, stopping whatever was playing
    ///
    /// Setting the same source again keeps the current state.
    pub fn set_source(&mut self, source: Option<AudioSource>) {
        if self.source == source {
            return;
        }
        self.stop();
        self.state = Self::resting_state(source.as_ref());
        self.source = source;
    }

    /// Start a fetch for the current source
    ///
    /// Returns the ticket and URL to fetch; any earlier in-flight fetch
    /// becomes stale.
    pub fn begin_play(&mut self) -> Result<(PlaybackTicket, String), AudioError> {
        let url = match &self.source {
            Some(source) => source.url().map(str::to_string),
            None => None,
        };
        let Some(url) = url else {
            tracing::debug!("Play requested without a playable source");
            return Err(AudioError::Pending);
        };

        self.generation += 1;
        self.clip = None;
        self.state = PlaybackState::Loading;

        Ok((
            PlaybackTicket {
                generation: self.generation,
            },
            url,
        ))
    }

    /// Apply a fetch result; returns false when the ticket is stale
    pub fn complete_play(
        &mut self,
        ticket: PlaybackTicket,
        result: Result<AudioClip, AudioError>,
    ) -> bool {
        if ticket.generation != self.generation || self.state != PlaybackState::Loading {
            tracing::debug!(
                "Discarding stale audio result (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(clip) => {
                self.clip = Some(clip);
                self.state = PlaybackState::Playing;
            }
            Err(e) => {
                tracing::warn!("Audio playback failed: {}", e);
                self.state = PlaybackState::Failed(e);
            }
        }
        true
    }

    /// Fetch and start playing the current source
    pub async fn play(&mut self, fetcher: &dyn AudioFetcher) -> Result<(), AudioError> {
        let (ticket, url) = self.begin_play()?;
        let result = fetcher.fetch(&url).await;
        self.complete_play(ticket, result);

        match &self.state {
            PlaybackState::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    /// Playback reached its end
    pub fn finished(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Idle;
        }
    }

    /// Stop playback and invalidate any in-flight fetch
    pub fn stop(&mut self) {
        self.generation += 1;
        self.clip = None;
        if matches!(self.state, PlaybackState::Loading | PlaybackState::Playing) {
            self.state = PlaybackState::Idle;
        }
    }
}

impl Default for AudioPlayback {
    fn default() -> Self {
        Self::new(None)
    }
}
