use crate::{config::AudioSettings, state::DeviceState, Result};

/// Logical name of one independently controllable sound source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Hum,
    Fan,
    Click,
    Alarm,
}

impl ChannelId {
    pub const ALL: [ChannelId; 4] = [
        ChannelId::Hum,
        ChannelId::Fan,
        ChannelId::Click,
        ChannelId::Alarm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChannelId::Hum => "hum",
            ChannelId::Fan => "fan",
            ChannelId::Click => "click",
            ChannelId::Alarm => "alarm",
        }
    }
}

/// Lifecycle of a single sound resource.
///
/// `Failed` is terminal: the channel's play requests become no-ops and its
/// effective volume is zero, while every other channel keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Unloaded,
    Loading,
    Ready,
    Playing,
    Paused,
    Failed,
}

/// Seam to the platform audio layer.
///
/// Calls are fire-and-forget from the caller's point of view; a returned
/// error means the underlying resource is unusable and is absorbed by
/// [`AudioFeedback`], never propagated further.
pub trait AudioBackend {
    fn load(&mut self, channel: ChannelId, source: &str) -> Result<()>;
    fn play(&mut self, channel: ChannelId, looping: bool) -> Result<()>;
    fn pause(&mut self, channel: ChannelId) -> Result<()>;
    fn set_volume(&mut self, channel: ChannelId, volume: f32) -> Result<()>;
    fn rewind(&mut self, channel: ChannelId) -> Result<()>;
}

/// Backend that accepts every command and produces no sound. Used by the
/// command line demo and anywhere real playback hardware is absent.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn load(&mut self, _channel: ChannelId, _source: &str) -> Result<()> {
        Ok(())
    }

    fn play(&mut self, _channel: ChannelId, _looping: bool) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self, _channel: ChannelId) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _channel: ChannelId, _volume: f32) -> Result<()> {
        Ok(())
    }

    fn rewind(&mut self, _channel: ChannelId) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct Channel {
    id: ChannelId,
    status: ChannelStatus,
}

impl Channel {
    fn new(id: ChannelId) -> Self {
        Self {
            id,
            status: ChannelStatus::Unloaded,
        }
    }
}

/// Maps device state to the four feedback channels.
///
/// Pure consumer of [`DeviceState`] snapshots: the store never calls into
/// this type; the owning session feeds it the latest snapshot once per
/// frame via [`sync`](Self::sync).
pub struct AudioFeedback<B: AudioBackend> {
    backend: B,
    settings: AudioSettings,
    channels: [Channel; 4],
    last_fault: bool,
}

impl<B: AudioBackend> AudioFeedback<B> {
    /// Loads all four channels. A channel that fails to load is disabled
    /// with a warning and the remaining channels stay operable.
    pub fn new(mut backend: B, settings: AudioSettings) -> Self {
        let mut channels = ChannelId::ALL.map(Channel::new);
        for channel in &mut channels {
            channel.status = ChannelStatus::Loading;
            let source = match channel.id {
                ChannelId::Hum => &settings.hum_source,
                ChannelId::Fan => &settings.fan_source,
                ChannelId::Click => &settings.click_source,
                ChannelId::Alarm => &settings.alarm_source,
            };
            match backend.load(channel.id, source) {
                Ok(()) => channel.status = ChannelStatus::Ready,
                Err(err) => {
                    tracing::warn!(channel = channel.id.name(), %err, "audio channel disabled");
                    channel.status = ChannelStatus::Failed;
                }
            }
        }
        Self {
            backend,
            settings,
            channels,
            last_fault: false,
        }
    }

    /// Current lifecycle status of a channel.
    pub fn status(&self, id: ChannelId) -> ChannelStatus {
        self.channel(id).status
    }

    /// Reconciles playback with the given snapshot and inputs.
    ///
    /// Idempotent: feeding the same snapshot repeatedly issues no redundant
    /// start/stop commands for the looping channels.
    pub fn sync(&mut self, state: &DeviceState, fan_speed: f32, fault: bool) {
        self.sync_hum(state.inverter_active);
        self.sync_fan(fan_speed);

        // Alarm fires on the rising edge only, so a persistent fault plays
        // one shot per occurrence rather than every frame.
        if fault && !self.last_fault {
            let volume = self.settings.alarm_volume;
            self.fire_one_shot(ChannelId::Alarm, volume);
        }
        self.last_fault = fault;
    }

    /// Plays the UI click, independent of device state.
    pub fn click(&mut self) {
        let volume = self.settings.click_volume;
        self.fire_one_shot(ChannelId::Click, volume);
    }

    /// Pauses and rewinds every channel. Runs the full sweep even when
    /// individual channels have failed.
    pub fn teardown(&mut self) {
        for id in ChannelId::ALL {
            if self.channel(id).status == ChannelStatus::Failed {
                continue;
            }
            let _ = self.backend.pause(id);
            let _ = self.backend.rewind(id);
            let channel = self.channel_mut(id);
            if channel.status == ChannelStatus::Playing {
                channel.status = ChannelStatus::Paused;
            }
        }
    }

    fn sync_hum(&mut self, inverter_active: bool) {
        let status = self.channel(ChannelId::Hum).status;
        if status == ChannelStatus::Failed {
            return;
        }
        if inverter_active && status != ChannelStatus::Playing {
            let volume = self.settings.hum_volume;
            if self.command(ChannelId::Hum, |b, id| {
                b.set_volume(id, volume)?;
                b.play(id, true)
            }) {
                self.channel_mut(ChannelId::Hum).status = ChannelStatus::Playing;
            }
        } else if !inverter_active && status == ChannelStatus::Playing {
            if self.command(ChannelId::Hum, |b, id| b.pause(id)) {
                self.channel_mut(ChannelId::Hum).status = ChannelStatus::Paused;
            }
        }
    }

    fn sync_fan(&mut self, fan_speed: f32) {
        let status = self.channel(ChannelId::Fan).status;
        if status == ChannelStatus::Failed {
            return;
        }
        let volume = (fan_speed / 100.0).clamp(0.0, 1.0);
        if volume > 0.0 {
            let ok = self.command(ChannelId::Fan, |b, id| {
                b.set_volume(id, volume)?;
                if status != ChannelStatus::Playing {
                    b.play(id, true)?;
                }
                Ok(())
            });
            if ok {
                self.channel_mut(ChannelId::Fan).status = ChannelStatus::Playing;
            }
        } else if status == ChannelStatus::Playing {
            if self.command(ChannelId::Fan, |b, id| b.pause(id)) {
                self.channel_mut(ChannelId::Fan).status = ChannelStatus::Paused;
            }
        }
    }

    fn fire_one_shot(&mut self, id: ChannelId, volume: f32) {
        if self.channel(id).status == ChannelStatus::Failed {
            return;
        }
        if self.command(id, |b, id| {
            b.set_volume(id, volume)?;
            b.rewind(id)?;
            b.play(id, false)
        }) {
            self.channel_mut(id).status = ChannelStatus::Playing;
        }
    }

    /// Issues a backend command, demoting the channel to `Failed` with a
    /// warning when it errors. Returns whether the command succeeded.
    fn command<F>(&mut self, id: ChannelId, f: F) -> bool
    where
        F: FnOnce(&mut B, ChannelId) -> Result<()>,
    {
        match f(&mut self.backend, id) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(channel = id.name(), %err, "audio channel disabled");
                self.channel_mut(id).status = ChannelStatus::Failed;
                false
            }
        }
    }

    fn channel(&self, id: ChannelId) -> &Channel {
        &self.channels[id as usize]
    }

    fn channel_mut(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.channels[id as usize]
    }
}

impl<B: AudioBackend> std::fmt::Debug for AudioFeedback<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFeedback")
            .field("channels", &self.channels)
            .field("last_fault", &self.last_fault)
            .finish()
    }
}
