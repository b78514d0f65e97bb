pub mod config;
pub mod intake;
pub mod metrics;
pub mod pipeline;
pub mod runner;
pub mod scratch;
pub mod session;
pub mod telegram;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    TelegramConfig,
};
pub use intake::IntakeController;
pub use pipeline::{
    concat_manifest, drawtext_filter, MergePipeline, PipelineConfig, PipelineError,
    WatermarkAnchor, WatermarkSpec, MIN_CLIPS,
};
pub use runner::{CommandRunner, FfmpegRunner, RunnerConfig, RunnerError};
pub use scratch::ScratchFile;
pub use session::{ClipRef, DrainOutcome, SessionStore, UserId};
pub use telegram::{parse_command, Command, TelegramClient, Transport, TransportError, Update};
