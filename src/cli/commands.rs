use crate::source::SourceSpec;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Natural-language deployment orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "shipwright",
    about = "Deploy applications from a natural-language prompt",
    version,
    long_about = "shipwright takes a free-text deployment prompt and a source bundle, infers \
                  the target cloud, application framework, and infrastructure shape, patches \
                  the application for production binding, and provisions the infrastructure \
                  with terraform.\n\n\
                  Examples:\n  \
                  shipwright \"deploy this flask app on aws as serverless\" --repo https://github.com/me/app\n  \
                  shipwright \"run my django site on a vm\" --zip bundle.zip"
)]
pub struct CliArgs {
    /// Natural-language deployment description
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    #[arg(long, value_name = "URL", help = "Git repository URL to deploy")]
    pub repo: Option<String>,

    #[arg(long, value_name = "PATH", help = "Path to a zip bundle to deploy")]
    pub zip: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Report output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// The source to deploy. `--repo` takes precedence when both flags are
    /// given; neither flag yields `None` (reported as a usage error by the
    /// caller before any side effects).
    pub fn source(&self) -> Option<SourceSpec> {
        if let Some(url) = &self.repo {
            return Some(SourceSpec::Git { url: url.clone() });
        }
        self.zip
            .as_ref()
            .map(|path| SourceSpec::Zip { path: path.clone() })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}
