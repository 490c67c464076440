use clap::{Parser, Subcommand};
use std::path::PathBuf;

use app::session::ConnectionArgs;
use utils::app_config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "s3-browser", version)]
#[command(about = "Browse and download objects from S3-compatible stores", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Endpoint URI, e.g. http://localhost:9000 or s3://user:pass@host:9000
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Host to use when the endpoint (or saved profile) does not name one
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to use when the endpoint does not carry one
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true)]
    pub access_key: Option<String>,

    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    #[arg(short, long, global = true)]
    pub bucket: Option<String>,

    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Saved connection profile (id or name)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Additional configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the logging level (debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the parsed connection settings without connecting
    Meta,

    /// List folders and files under a prefix
    Ls {
        /// Key prefix, e.g. "reports/2024/"
        #[arg(default_value = "")]
        prefix: String,

        /// Only list folders
        #[arg(long)]
        only_folders: bool,

        /// Show full keys instead of names relative to the prefix
        #[arg(long)]
        full_path: bool,

        /// Include size and modification time of each file
        #[arg(long)]
        long: bool,
    },

    /// Download one object
    Get {
        key: String,

        /// Target file (default: last segment of the key)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List saved connection profiles
    Profiles,
}

impl Cli {
    pub fn connection_args(&self) -> ConnectionArgs {
        ConnectionArgs {
            endpoint: self.endpoint.clone(),
            host: self.host.clone(),
            port: self.port,
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

pub async fn cli_match() -> utils::error::Result<()> {
    let cli = Cli::parse();

    // Merge configuration file and log level before logging starts
    AppConfig::merge_config(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        AppConfig::set("log.level", level)?;
    }
    let _guard = utils::logger::setup_logging()?;

    let args = cli.connection_args();

    // Execute the subcommand
    match &cli.command {
        Commands::Meta => commands::meta_cmd(&args).await?,
        Commands::Ls {
            prefix,
            only_folders,
            full_path,
            long,
        } => {
            let params = app::browse::BrowseParams {
                prefix: prefix.clone(),
                only_folders: *only_folders,
                full_path: *full_path,
            };
            commands::ls_cmd(&args, &params, *long).await?
        }
        Commands::Get { key, output } => commands::get_cmd(&args, key, output.as_deref()).await?,
        Commands::Profiles => commands::profiles_cmd().await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "s3-browser",
            "ls",
            "reports/",
            "--full-path",
            "--endpoint",
            "http://minio:9000",
            "--bucket",
            "data",
        ])
        .unwrap();

        let args = cli.connection_args();
        assert_eq!(args.endpoint.as_deref(), Some("http://minio:9000"));
        assert_eq!(args.bucket.as_deref(), Some("data"));
        assert!(args.profile.is_none());

        match cli.command {
            Commands::Ls {
                prefix,
                only_folders,
                full_path,
                long,
            } => {
                assert_eq!(prefix, "reports/");
                assert!(!only_folders);
                assert!(full_path);
                assert!(!long);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn host_and_port_flags() {
        let cli = Cli::try_parse_from([
            "s3-browser",
            "meta",
            "--profile",
            "archive",
            "--host",
            "minio.internal",
            "--port",
            "9000",
        ])
        .unwrap();

        let args = cli.connection_args();
        assert_eq!(args.host.as_deref(), Some("minio.internal"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.profile.as_deref(), Some("archive"));

        assert!(Cli::try_parse_from(["s3-browser", "meta", "--port", "http"]).is_err());
    }

    #[test]
    fn ls_prefix_defaults_to_root() {
        let cli = Cli::try_parse_from(["s3-browser", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::Ls { ref prefix, .. } if prefix.is_empty()));
    }

    #[test]
    fn get_requires_key() {
        assert!(Cli::try_parse_from(["s3-browser", "get"]).is_err());

        let cli = Cli::try_parse_from(["s3-browser", "get", "a/b.txt", "-o", "out/b.txt"]).unwrap();
        match cli.command {
            Commands::Get { key, output } => {
                assert_eq!(key, "a/b.txt");
                assert_eq!(output, Some(PathBuf::from("out/b.txt")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
