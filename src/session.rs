// src/session.rs - The tracker context the host threads through every call
use crate::config::TrackerConfig;
use crate::device::DeviceHandle;
use crate::error::TrackError;
use crate::frame_cache::FrameCache;
use crate::geometry::{write_geometry, SceneSink};
use crate::host::{ClockTick, HostClock, ParameterSource, PARM_ARMS, PARM_HANDS};
use crate::mapper::{self, InclusionFlags, MappingRules};
use crate::reading::Reading;
use crate::state::DeviceState;
use crate::status::{AnnotationTarget, StatusAnnotator};
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Enable,
    Disable,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl FromStr for Command {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            other => Err(TrackError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSummary {
    pub tick: ClockTick,
    pub hands: usize,
    pub points: usize,
    pub polylines: usize,
}

pub struct TrackerSession<D, L> {
    state: DeviceState<D, L>,
    cache: FrameCache,
    config: TrackerConfig,
}

impl<D: DeviceHandle, L: AnnotationTarget> TrackerSession<D, L> {
    pub fn new(device: D, label: L, config: TrackerConfig) -> Self {
        let state = DeviceState::new(device, label, config.policy);
        Self {
            state,
            cache: FrameCache::new(),
            config,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Enable => self.state.enable(),
            Command::Disable => self.state.disable(),
        }
    }

    pub fn reading(&mut self, tick: ClockTick) -> Option<Rc<Reading>> {
        self.cache.get_reading(self.state.device_mut(), tick)
    }

    /// One host cook: reading for the current tick, mapped with the current
    /// toggles, written into `sink`. Nothing reaches the sink unless every
    /// earlier step succeeded.
    pub fn track<S>(
        &mut self,
        clock: &dyn HostClock,
        params: &dyn ParameterSource,
        sink: &mut S,
    ) -> Result<TrackSummary, TrackError>
    where
        S: SceneSink + ?Sized,
    {
        if !self.state.is_enabled() {
            return Err(TrackError::DeviceDisabled);
        }

        let tick = clock.current_tick();
        let reading = self.reading(tick).ok_or(TrackError::NoReading)?;

        let flags = InclusionFlags {
            track_hands: params.evaluate(PARM_HANDS),
            track_arms: params.evaluate(PARM_ARMS),
            rules: self.config.rules,
        };
        let buffer = mapper::map(&reading, &flags)?;
        write_geometry(&buffer, sink)?;

        Ok(TrackSummary {
            tick,
            hands: reading.hands.len(),
            points: buffer.points.len(),
            polylines: buffer.polylines.len(),
        })
    }

    pub fn set_rules(&mut self, rules: MappingRules) {
        self.config.rules = rules;
    }

    pub fn state(&self) -> &DeviceState<D, L> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DeviceState<D, L> {
        &mut self.state
    }

    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

/// Holds the single session of the host process. Built on the first `init`
/// and kept until the slot is dropped; hosts own one slot for their whole
/// lifetime and pass it to every callback.
pub struct SessionSlot<D, L> {
    session: Option<TrackerSession<D, L>>,
}

impl<D, L> Default for SessionSlot<D, L> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<D: DeviceHandle, L: AnnotationTarget> SessionSlot<D, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects on first call only. Later calls keep the live session and
    /// just republish its status.
    pub fn init<F>(&mut self, connect: F, config: TrackerConfig) -> &mut TrackerSession<D, L>
    where
        F: FnOnce() -> (D, L),
    {
        if self.session.is_some() {
            debug!("session already initialized");
        }
        let session = self.session.get_or_insert_with(|| {
            let (device, label) = connect();
            let session = TrackerSession::new(device, label, config);
            info!("session initialized");
            session
        });
        session.state_mut().announce();
        session
    }

    pub fn is_init(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TrackerSession<D, L>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut TrackerSession<D, L>> {
        self.session.as_mut()
    }

    pub fn invoke(&mut self, node: &mut dyn AnnotationTarget, command: Command) -> Result<(), TrackError> {
        match self.session.as_mut() {
            Some(session) => {
                session.apply(command);
                Ok(())
            }
            None => Err(report(node, TrackError::NotInitialized)),
        }
    }

    /// `invoke` for hosts that hand over the command by name.
    pub fn invoke_named(&mut self, node: &mut dyn AnnotationTarget, name: &str) -> Result<(), TrackError> {
        let command = name.parse::<Command>().map_err(|e| report(node, e))?;
        self.invoke(node, command)
    }

    pub fn track<S>(
        &mut self,
        node: &mut dyn AnnotationTarget,
        clock: &dyn HostClock,
        params: &dyn ParameterSource,
        sink: &mut S,
    ) -> Result<TrackSummary, TrackError>
    where
        S: SceneSink + ?Sized,
    {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Err(report(node, TrackError::NotInitialized)),
        };
        session.track(clock, params, sink).map_err(|e| report(node, e))
    }
}

fn report(node: &mut dyn AnnotationTarget, err: TrackError) -> TrackError {
    warn!(error = %err, "track failed");
    StatusAnnotator::publish(node, &err.to_string());
    err
}
