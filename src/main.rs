//! pulsesphere - audio-reactive visual parameters
//!
//! Plays a track, reads its spectrum every frame and turns it into smoothed,
//! bounded shader and light parameters for a renderer.

use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;

use pulsesphere::audio::{AudioSource, ClipAsset, ClockSource, DeviceSource, SilentSource};
use pulsesphere::cli::{Args, Sink, Transport};
use pulsesphere::error::AppError;
use pulsesphere::params::PipelineConfig;
use pulsesphere::pipeline::Pipeline;
use pulsesphere::render::{JsonLinesRenderer, LogRenderer};
use pulsesphere::scheduler::{FrameScheduler, Renderer};

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.schedule.fps = fps;
    }
    config.validate()?;

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let sink = args.parse_sink();
    // JSON on stdout must stay clean
    if !(sink == Sink::JsonLines && args.output.is_none()) {
        println!("pulsesphere - audio-reactive visual parameters");
        println!("Initializing pipeline at {} FPS...\n", config.schedule.fps);
    }

    let pipeline = Pipeline::new(&config)?;

    let mut source: Box<dyn AudioSource> = match &args.audio {
        None => Box::new(SilentSource),
        Some(path) => {
            let asset = ClipAsset::Path(path.clone());
            match args.parse_transport() {
                Transport::Device => Box::new(DeviceSource::new(asset, config.analyser.clone())?),
                Transport::Clock => Box::new(ClockSource::new(asset, config.analyser.clone())?),
            }
        }
    };

    let mut renderer: Box<dyn Renderer> = match sink {
        Sink::Log => Box::new(LogRenderer::new(args.log_every)),
        Sink::JsonLines => match &args.output {
            Some(path) => Box::new(JsonLinesRenderer::create(path)?),
            None => Box::new(JsonLinesRenderer::new(BufWriter::new(std::io::stdout()))),
        },
    };

    let limits = args.run_limits(&config.schedule);
    let trigger = args.play_trigger();

    let mut scheduler = FrameScheduler::new(pipeline, &config.schedule);
    let frames = scheduler.run(source.as_mut(), renderer.as_mut(), &trigger, limits);

    log::info!("Done after {} frames", frames);
    Ok(())
}
