//! Frame scheduler: drives the pipeline once per frame and hands the result
//! to a renderer.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::audio::{AudioSource, PlaybackState};
use crate::error::RenderError;
use crate::params::ScheduleConfig;
use crate::pipeline::{OutputParameterVector, Pipeline};

/// Consumer of the per-tick output vector
pub trait Renderer {
    /// Called once per tick with the absolute running time
    fn render(&mut self, time_s: f32, params: &OutputParameterVector) -> Result<(), RenderError>;

    /// Called once after the last tick
    fn finish(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Scheduler lifecycle (no pause or stop state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { started_at: Instant },
}

/// When `run` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Stop after this many ticks
    pub max_frames: Option<u64>,

    /// Stop on the first tick that sees the clip finished
    pub exit_on_end: bool,
}

/// User control gating playback start
#[derive(Debug, Clone)]
pub struct PlayTrigger {
    fired: Arc<AtomicBool>,
}

impl PlayTrigger {
    /// Already fired: playback starts on the first tick
    pub fn immediate() -> Self {
        Self {
            fired: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Fires when a line (Enter) arrives on stdin
    pub fn on_stdin_line() -> Self {
        let trigger = Self {
            fired: Arc::new(AtomicBool::new(false)),
        };
        let fired = Arc::clone(&trigger.fired);
        std::thread::spawn(move || {
            let mut line = String::new();
            if std::io::stdin().lock().read_line(&mut line).is_ok() {
                fired.store(true, Ordering::Relaxed);
            }
        });
        trigger
    }

    /// Manually controlled trigger
    pub fn manual() -> Self {
        Self {
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fire(&self) {
        self.fired.store(true, Ordering::Relaxed);
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Relaxed)
    }
}

/// Drives one pipeline at a fixed frame rate
pub struct FrameScheduler {
    pipeline: Pipeline,
    frame_interval: Duration,
    state: SchedulerState,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(pipeline: Pipeline, schedule: &ScheduleConfig) -> Self {
        Self {
            pipeline,
            frame_interval: schedule.frame_interval(),
            state: SchedulerState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Idle → Running; later calls keep the first start time
    pub fn start(&mut self, now: Instant) {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Running { started_at: now };
        }
    }

    /// Run the pipeline for `now` and pass the result to `renderer`
    ///
    /// Renderer errors are logged and swallowed.
    pub fn tick<S, R>(&mut self, now: Instant, source: &mut S, renderer: &mut R) -> f32
    where
        S: AudioSource + ?Sized,
        R: Renderer + ?Sized,
    {
        self.start(now);
        let SchedulerState::Running { started_at } = self.state else {
            return 0.0;
        };

        let time_s = now.saturating_duration_since(started_at).as_secs_f32();
        let params = self.pipeline.tick(source, time_s);
        debug_assert!(params.is_finite());

        if let Err(e) = renderer.render(time_s, params) {
            log::warn!("Renderer error at {:.3}s: {}", time_s, e);
        }
        self.frames += 1;
        time_s
    }

    /// Tick until a limit is reached (forever without limits)
    ///
    /// Playback is started on the first tick after `trigger` fires. A failed
    /// start is reported once; the loop keeps running on silence.
    pub fn run<S, R>(
        &mut self,
        source: &mut S,
        renderer: &mut R,
        trigger: &PlayTrigger,
        limits: RunLimits,
    ) -> u64
    where
        S: AudioSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut play_requested = false;
        let mut deadline = Instant::now();
        let mut fps = FpsCounter::new(deadline);

        loop {
            if !play_requested && trigger.is_fired() {
                play_requested = true;
                if let Err(e) = source.play() {
                    log::error!("Playback failed: {}", e);
                    eprintln!("Error {}", e);
                }
            }

            let now = Instant::now();
            self.tick(now, source, renderer);
            fps.record(now);

            if limits.max_frames.is_some_and(|max| self.frames >= max) {
                break;
            }
            if limits.exit_on_end && source.state() == PlaybackState::Finished {
                log::info!("Clip finished, stopping after {} frames", self.frames);
                break;
            }

            deadline += self.frame_interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                // Behind schedule: drop the backlog instead of bursting
                deadline = now;
            }
        }

        if let Err(e) = renderer.finish() {
            log::warn!("Renderer failed to finish: {}", e);
        }
        self.frames
    }
}

/// Achieved frame rate, logged every few seconds
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    const REPORT_INTERVAL: Duration = Duration::from_secs(5);

    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Self::REPORT_INTERVAL {
            log::debug!("FPS: {:.1}", self.frames as f64 / elapsed.as_secs_f64());
            self.window_start = now;
            self.frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Clip, ClipAsset, ClockSource, SilentSource};
    use crate::params::{AnalyserConfig, PipelineConfig};

    #[derive(Default)]
    struct Recorder {
        times: Vec<f32>,
        fail: bool,
        finished: bool,
    }

    impl Renderer for Recorder {
        fn render(
            &mut self,
            time_s: f32,
            params: &OutputParameterVector,
        ) -> Result<(), RenderError> {
            assert!(params.is_finite());
            self.times.push(time_s);
            if self.fail {
                return Err(RenderError::Io(std::io::Error::other("sink closed")));
            }
            Ok(())
        }

        fn finish(&mut self) -> Result<(), RenderError> {
            self.finished = true;
            Ok(())
        }
    }

    fn scheduler(fps: u32) -> FrameScheduler {
        let config = PipelineConfig::default();
        FrameScheduler::new(Pipeline::new(&config).unwrap(), &ScheduleConfig { fps })
    }

    #[test]
    fn test_first_tick_starts_scheduler() {
        let mut scheduler = scheduler(60);
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let t0 = Instant::now();
        let mut recorder = Recorder::default();
        let time = scheduler.tick(t0, &mut SilentSource, &mut recorder);

        assert_eq!(time, 0.0);
        assert_eq!(scheduler.state(), SchedulerState::Running { started_at: t0 });

        let later = t0 + Duration::from_millis(1500);
        let time = scheduler.tick(later, &mut SilentSource, &mut recorder);
        assert_eq!(time, 1.5);
        assert_eq!(recorder.times, vec![0.0, 1.5]);
    }

    #[test]
    fn test_start_is_one_way() {
        let mut scheduler = scheduler(60);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.start(t0 + Duration::from_secs(3));

        assert_eq!(scheduler.state(), SchedulerState::Running { started_at: t0 });
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut scheduler = scheduler(1000);
        let mut recorder = Recorder::default();
        let limits = RunLimits {
            max_frames: Some(5),
            exit_on_end: false,
        };

        let frames = scheduler.run(
            &mut SilentSource,
            &mut recorder,
            &PlayTrigger::immediate(),
            limits,
        );

        assert_eq!(frames, 5);
        assert_eq!(recorder.times.len(), 5);
        assert!(recorder.times.windows(2).all(|w| w[0] <= w[1]));
        assert!(recorder.finished);
    }

    #[test]
    fn test_renderer_errors_do_not_stop_loop() {
        let mut scheduler = scheduler(1000);
        let mut recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let limits = RunLimits {
            max_frames: Some(4),
            exit_on_end: false,
        };

        let frames = scheduler.run(
            &mut SilentSource,
            &mut recorder,
            &PlayTrigger::immediate(),
            limits,
        );
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_decode_failure_keeps_ticking() {
        let mut source = ClockSource::new(
            ClipAsset::Path("/missing/track.wav".into()),
            AnalyserConfig::default(),
        )
        .unwrap();
        let mut scheduler = scheduler(1000);
        let mut recorder = Recorder::default();
        let limits = RunLimits {
            max_frames: Some(3),
            exit_on_end: true,
        };

        let frames = scheduler.run(&mut source, &mut recorder, &PlayTrigger::immediate(), limits);

        assert_eq!(frames, 3);
        assert!(matches!(source.state(), PlaybackState::Failed(_)));
        assert_eq!(scheduler.pipeline().output().audio_factor, 0.0);
    }

    #[test]
    fn test_exit_on_end() {
        // 20 ms clip
        let clip = Clip::new(vec![0.5; 20], 1000);
        let mut source = ClockSource::new(
            ClipAsset::Decoded(clip),
            AnalyserConfig {
                fft_size: 32,
                ..Default::default()
            },
        )
        .unwrap();
        let mut scheduler = scheduler(500);
        let mut recorder = Recorder::default();
        let limits = RunLimits {
            max_frames: Some(5000),
            exit_on_end: true,
        };

        let frames = scheduler.run(&mut source, &mut recorder, &PlayTrigger::immediate(), limits);

        assert!(frames < 5000);
        assert_eq!(source.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_unfired_trigger_stays_silent() {
        let mut source = ClockSource::new(
            ClipAsset::Decoded(Clip::new(vec![0.9; 1000], 1000)),
            AnalyserConfig::default(),
        )
        .unwrap();
        let mut scheduler = scheduler(1000);
        let mut recorder = Recorder::default();
        let trigger = PlayTrigger::manual();
        let limits = RunLimits {
            max_frames: Some(3),
            exit_on_end: false,
        };

        scheduler.run(&mut source, &mut recorder, &trigger, limits);

        assert_eq!(source.state(), PlaybackState::Idle);
        assert_eq!(scheduler.pipeline().output().audio_factor, 0.0);

        trigger.fire();
        assert!(trigger.is_fired());
    }
}
