use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ecs-exec",
    version,
    about = "Pick an ECS container interactively and open a shell in it."
)]
pub struct CliArgs {
    /// AWS region to search
    #[arg(short, long, default_value = "ap-northeast-1")]
    pub region: String,

    /// Shared config profile used for credentials
    #[arg(short, long, default_value = "default")]
    pub profile: String,

    /// tracing filter (for example: warn,info,debug)
    #[arg(long, default_value = "warn")]
    pub log_filter: String,
}
