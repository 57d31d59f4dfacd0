use std::path::PathBuf;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::config::AudioSettings;
use crate::library::{LocatorRegistry, SourceLocator};

use super::events::EventBook;
use super::primitive::PlaybackPrimitive;
use super::sink::create_sink_at;
use super::types::{AudioError, Listener, ListenerId};

/// `PlaybackPrimitive` backed by the default rodio output device.
///
/// Holds at most one `Sink`; binding a new source stops and drops the old one.
pub struct RodioPrimitive {
    stream: OutputStream,
    registry: LocatorRegistry,

    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,
    // Added to `Sink::get_pos` after a sink had to be rebuilt to seek.
    position_offset: Duration,

    volume: f32,
    playing: bool,

    events: EventBook,
}

impl RodioPrimitive {
    pub fn new(registry: LocatorRegistry, settings: &AudioSettings) -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            registry,
            sink: None,
            path: None,
            duration: None,
            position_offset: Duration::ZERO,
            volume: 1.0,
            playing: false,
            events: EventBook::new(Duration::from_millis(settings.position_interval_ms)),
        })
    }

    fn load(&mut self, locator: &SourceLocator) -> Result<Option<Duration>, AudioError> {
        let path = self
            .registry
            .resolve(locator)
            .ok_or_else(|| AudioError::UnknownLocator(locator.to_string()))?;

        let (sink, duration) = create_sink_at(&self.stream, &path, Duration::ZERO)?;
        sink.set_volume(self.volume);

        self.sink = Some(sink);
        self.path = Some(path);
        self.duration = duration;
        Ok(duration)
    }

    /// Rebuild the sink at `position` for decoders that cannot seek in place.
    fn rebuild_at(&mut self, position: Duration) -> Result<(), AudioError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let (sink, _) = create_sink_at(&self.stream, &path, position)?;
        sink.set_volume(self.volume);
        if self.playing {
            sink.play();
        }

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.position_offset = position;
        Ok(())
    }
}

impl PlaybackPrimitive for RodioPrimitive {
    fn bind(&mut self, locator: &SourceLocator) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        self.path = None;
        self.duration = None;
        self.position_offset = Duration::ZERO;
        self.volume = 1.0;
        self.playing = false;

        let loaded = match self.load(locator) {
            Ok(duration) => {
                debug!(%locator, "source bound");
                Ok(duration)
            }
            Err(e) => {
                warn!(%locator, error = %e, "failed to bind source");
                Err(e.to_string())
            }
        };
        self.events.rebound(loaded);
    }

    fn play(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.playing = self.events.play_requested(self.sink.is_some(), Instant::now());
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.playing = false;
    }

    fn set_position(&mut self, position: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        match sink.try_seek(position) {
            Ok(()) => self.position_offset = Duration::ZERO,
            Err(e) => {
                debug!(error = %e, "in-place seek unsupported, rebuilding sink");
                if let Err(e) = self.rebuild_at(position) {
                    warn!(error = %e, "seek failed");
                }
            }
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.position_offset + s.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(volume);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn attach(&mut self) -> Listener {
        self.events.attach()
    }

    fn detach(&mut self, id: ListenerId) {
        self.events.detach(id);
    }

    fn poll(&mut self) {
        if self.playing {
            let drained = self.sink.as_ref().is_some_and(Sink::empty);
            if drained {
                self.playing = false;
                self.events.ended();
            } else if self.events.position_due(Instant::now()) {
                let position = self.position();
                self.events.position(position);
            }
        }

        self.events.flush();
    }
}
