use crate::cli::CliArgs;
use anyhow::{Result, bail};

pub const DEFAULT_SHELL: &str = "/bin/bash";
pub const TRANSPORT_PROGRAM: &str = "session-manager-plugin";
pub const TRANSPORT_OPERATION: &str = "StartSession";
/// Regional Session Manager endpoint passed to the transport.
const ENDPOINT_TEMPLATE: &str = "https://ssm.{region}.amazonaws.com";

/// Validated run settings. Everything besides region and profile is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub region: String,
    pub profile: String,
    pub shell: String,
    pub transport_program: String,
}

impl Settings {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let region = args.region.trim();
        if region.is_empty() {
            bail!("region must not be empty");
        }
        let profile = args.profile.trim();
        if profile.is_empty() {
            bail!("profile must not be empty");
        }

        Ok(Self {
            region: region.to_string(),
            profile: profile.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            transport_program: TRANSPORT_PROGRAM.to_string(),
        })
    }

    pub fn endpoint_url(&self) -> String {
        ENDPOINT_TEMPLATE.replace("{region}", &self.region)
    }
}
