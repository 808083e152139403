use std::path::PathBuf;

use anyhow::Context;
use catguard::detector::FakeDetector;
use catguard::repository::FileRepository;
use catguard::AlarmStatus;
use catguard::ArmingStatus;
use catguard::Config;
use catguard::Engine;
use catguard::Event;
use catguard::Sensor;
use catguard::SensorKey;
use catguard::SensorType;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

const DEFAULT_CONFIG_PATH: &str = "catguard.toml";
const DEFAULT_STORE_PATH: &str = "catguard.json";

#[derive(Parser)]
#[command(name = "catguard")]
#[command(about = "Home security monitor with camera-based cat detection")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./catguard.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show arming status, alarm status and sensors
    Status,

    /// Manage and trigger sensors
    Sensor {
        #[command(subcommand)]
        command: SensorCommand,
    },

    /// Arm the system
    Arm {
        #[arg(value_enum)]
        mode: ArmMode,
    },

    /// Disarm the system, clearing any alarm
    Disarm,

    /// Run an image through the cat detector
    Scan {
        /// Path to the image file
        image: PathBuf,
    },
}

#[derive(Subcommand)]
enum SensorCommand {
    /// Start monitoring a sensor
    Add { name: String, kind: SensorType },

    /// Stop monitoring a sensor
    Remove { name: String, kind: SensorType },

    /// Report a sensor as tripped
    Activate { name: String, kind: SensorType },

    /// Report a sensor as back to rest
    Deactivate { name: String, kind: SensorType },
}

#[derive(Clone, Copy, ValueEnum)]
enum ArmMode {
    Home,
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(Config::from_file(DEFAULT_CONFIG_PATH)?)
        }
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        config.logging.level.into()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store_path = config
        .storage
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
    tracing::debug!("Using store {}", store_path.display());

    let repository = FileRepository::open(&store_path)
        .with_context(|| format!("opening store {}", store_path.display()))?;
    let mut engine = Engine::new(repository, FakeDetector::new())
        .with_confidence_threshold(config.detector.confidence_threshold);

    engine.subscribe(|event: &Event| {
        if let Event::AlarmStatusChanged { from, to } = event {
            println!("alarm: {} -> {}", from, to);
        }
    });

    match cli.command {
        Commands::Status => {}
        Commands::Sensor { command } => match command {
            SensorCommand::Add { name, kind } => engine.add_sensor(Sensor::new(name, kind))?,
            SensorCommand::Remove { name, kind } => {
                engine.remove_sensor(&SensorKey::new(name, kind))?
            }
            SensorCommand::Activate { name, kind } => {
                engine.change_sensor_activation(&SensorKey::new(name, kind), true)?;
            }
            SensorCommand::Deactivate { name, kind } => {
                engine.change_sensor_activation(&SensorKey::new(name, kind), false)?;
            }
        },
        Commands::Arm { mode } => {
            engine.set_arming_status(mode.into())?;
        }
        Commands::Disarm => {
            engine.set_arming_status(ArmingStatus::Disarmed)?;
        }
        Commands::Scan { image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading image {}", image.display()))?;
            engine.process_image(&bytes)?;
            println!(
                "cat detected: {}",
                if engine.cat_detected() { "yes" } else { "no" }
            );
        }
    }

    print_status(&engine.state()?);
    Ok(())
}

fn print_status(state: &catguard::State) {
    let marker = match state.alarm_status {
        AlarmStatus::NoAlarm => "",
        AlarmStatus::PendingAlarm => " (!)",
        AlarmStatus::Alarm => " (!!!)",
    };
    println!("arming: {}", state.arming_status);
    println!("alarm:  {}{}", state.alarm_status, marker);

    if state.sensors.is_empty() {
        println!("no sensors");
        return;
    }
    println!("sensors:");
    for sensor in &state.sensors {
        println!(
            "  {:<20} {:<8} {}",
            sensor.name(),
            sensor.kind(),
            if sensor.is_active() { "active" } else { "inactive" }
        );
    }
}
