use serde::{Deserialize, Serialize};
use seascape_common::{CameraInfo, ConfigError, HeightSampler};
use seascape_wave::{WaveConfig, WaveSimulator};
use std::time::Instant;

use crate::config::LodConfig;
use crate::error::StreamError;
use crate::pool::{LodStats, LodStreamer, TileAssignment};
use crate::select::{LodSelector, VisibleNode};
use crate::timing::{FrameTimer, StageTimings};

/// Frames kept by the pipeline's timing window.
const TIMING_WINDOW: usize = 120;

/// Top-level configuration, usually loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeascapeConfig {
    pub wave: WaveConfig,
    pub lod: LodConfig,
}

impl SeascapeConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, StreamError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, StreamError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wave.validate()?;
        self.lod.validate()
    }
}

/// Everything one frame produced.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: u64,
    pub tick: u64,
    pub visible: Vec<VisibleNode>,
    pub loads: Vec<TileAssignment>,
    pub unloads: Vec<VisibleNode>,
    pub stats: LodStats,
    pub timings: StageTimings,
}

/// Simulate, select, diff, apply: one synchronous pass per frame.
pub struct FramePipeline {
    simulator: WaveSimulator,
    selector: LodSelector,
    streamer: LodStreamer,
    sampler_override: Option<Box<dyn HeightSampler>>,
    timer: FrameTimer,
    frame: u64,
}

impl FramePipeline {
    pub fn new(config: SeascapeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulator = WaveSimulator::new(config.wave)?;
        let selector = LodSelector::new(&config.lod)?;
        let streamer = LodStreamer::new(&config.lod, selector.distances().to_vec());
        tracing::info!(
            lods = config.lod.max_depth,
            distances = ?selector.distances(),
            "frame pipeline ready"
        );
        Ok(Self {
            simulator,
            selector,
            streamer,
            sampler_override: None,
            timer: FrameTimer::new(TIMING_WINDOW),
            frame: 0,
        })
    }

    /// Fit node heights from `sampler` instead of the wave simulation. The
    /// simulation still advances every frame.
    pub fn with_sampler(mut self, sampler: Box<dyn HeightSampler>) -> Self {
        self.sampler_override = Some(sampler);
        self
    }

    pub fn run_frame(&mut self, camera: &CameraInfo) -> FrameReport {
        let _span = tracing::info_span!("frame", frame = self.frame).entered();
        let mut timings = StageTimings::default();

        let start = Instant::now();
        self.simulator.step_frame();
        timings.simulate = start.elapsed();

        let start = Instant::now();
        let wave = self.simulator.sampler();
        let sampler: &dyn HeightSampler = match &self.sampler_override {
            Some(sampler) => sampler.as_ref(),
            None => &wave,
        };
        let visible = self.selector.select(camera, sampler);
        timings.select = start.elapsed();

        let start = Instant::now();
        let changes = crate::diff::diff(self.streamer.loaded(), &visible);
        timings.diff = start.elapsed();

        let start = Instant::now();
        let loads = self.streamer.apply(&changes);
        timings.apply = start.elapsed();

        self.timer.record(timings);
        let report = FrameReport {
            frame: self.frame,
            tick: self.simulator.tick(),
            visible,
            loads,
            unloads: changes.to_unload,
            stats: self.streamer.stats().clone(),
            timings,
        };
        tracing::debug!(
            visible = report.visible.len(),
            loads = report.loads.len(),
            unloads = report.unloads.len(),
            total = ?timings.total(),
            "frame complete"
        );
        self.frame += 1;
        report
    }

    pub fn simulator(&self) -> &WaveSimulator {
        &self.simulator
    }

    pub fn selector(&self) -> &LodSelector {
        &self.selector
    }

    pub fn streamer(&self) -> &LodStreamer {
        &self.streamer
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};
    use seascape_common::{Bounds, ProceduralSampler};
    use seascape_wave::ImpulseConfig;
    use std::collections::HashSet;

    fn small() -> SeascapeConfig {
        SeascapeConfig {
            wave: WaveConfig {
                tile_resolution: 16,
                tiles_per_side: 2,
                block_size: 4,
                origin: glam::Vec2::new(-60.0, -60.0),
                impulse: ImpulseConfig {
                    period: 2,
                    ..ImpulseConfig::default()
                },
                ..WaveConfig::default()
            },
            lod: LodConfig {
                max_depth: 4,
                root: Bounds::new(IVec3::new(-512, -64, -512), IVec3::new(1024, 128, 1024)),
                initial_tiles: 8,
                ..LodConfig::default()
            },
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SeascapeConfig::from_json(r#"{ "lod": { "max_depth": 5 } }"#).unwrap();
        assert_eq!(config.lod.max_depth, 5);
        assert_eq!(config.lod.lod_zero_range, LodConfig::default().lod_zero_range);
        assert_eq!(config.wave, WaveConfig::default());
    }

    #[test]
    fn json_round_trips() {
        let config = small();
        let text = config.to_json().unwrap();
        assert_eq!(SeascapeConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn invalid_json_config_is_refused() {
        let bad = r#"{ "wave": { "tile_resolution": 12 } }"#;
        assert!(matches!(
            SeascapeConfig::from_json(bad),
            Err(StreamError::Config(ConfigError::NotPowerOfTwo { .. }))
        ));
        assert!(matches!(
            SeascapeConfig::from_json("{ not json"),
            Err(StreamError::Parse(_))
        ));
    }

    #[test]
    fn first_frame_loads_everything_visible() {
        let mut pipeline = FramePipeline::new(small()).unwrap();
        let report = pipeline.run_frame(&CameraInfo::at(Vec3::ZERO));
        assert_eq!(report.frame, 0);
        assert_eq!(report.tick, 1);
        assert!(report.unloads.is_empty());
        assert_eq!(report.loads.len(), report.visible.len());
        assert_eq!(report.stats.resident, report.visible.len());
        assert_eq!(pipeline.frame(), 1);
    }

    #[test]
    fn static_camera_settles_to_no_churn() {
        let mut pipeline = FramePipeline::new(small())
            .unwrap()
            .with_sampler(Box::new(ProceduralSampler::default()));
        let camera = CameraInfo::at(Vec3::new(10.0, 0.0, -20.0));
        pipeline.run_frame(&camera);
        for _ in 0..3 {
            let report = pipeline.run_frame(&camera);
            assert!(report.loads.is_empty());
            assert!(report.unloads.is_empty());
        }
        assert_eq!(pipeline.timer().count(), 4);
    }

    #[test]
    fn moving_camera_keeps_tiles_consistent() {
        let mut pipeline = FramePipeline::new(small()).unwrap();
        for step in 0..24 {
            let x = -400.0 + step as f32 * 35.0;
            let report = pipeline.run_frame(&CameraInfo::at(Vec3::new(x, 0.0, x * 0.5)));
            let resident: HashSet<_> = pipeline.streamer().loaded().iter().copied().collect();
            let visible: HashSet<_> = report.visible.iter().copied().collect();
            assert_eq!(resident, visible);
            let tiles: HashSet<_> = report
                .visible
                .iter()
                .filter_map(|n| pipeline.streamer().tile_for(n))
                .collect();
            assert_eq!(tiles.len(), report.visible.len());
            assert_eq!(report.stats.desyncs, 0);
        }
    }

    #[test]
    fn small_pool_grows_under_load() {
        let mut config = small();
        config.lod.initial_tiles = 1;
        config.lod.tile_grow = 4;
        let mut pipeline = FramePipeline::new(config).unwrap();
        let report = pipeline.run_frame(&CameraInfo::at(Vec3::ZERO));
        assert!(report.stats.pool_grown > 0);
        assert!(report.stats.pool_total as usize >= report.visible.len());
    }
}
