use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "terrui")]
#[command(version)]
#[command(about = "A terminal UI for browsing Terraform Cloud organizations, workspaces and runs")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where to write the log (truncated on each run)
    #[arg(long, value_name = "PATH", default_value = "terrui.log")]
    pub log_file: PathBuf,

    /// Screen to open first: organizations, workspaces, workspace, run or help
    #[arg(long, value_name = "SCREEN")]
    pub start: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["terrui"]);
        assert!(cli.config.is_none());
        assert_eq!(cli.log_file, PathBuf::from("terrui.log"));
        assert!(cli.start.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "terrui",
            "--config",
            "/tmp/terrui.toml",
            "--log-file",
            "/tmp/terrui.log",
            "--start",
            "workspaces",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/terrui.toml")));
        assert_eq!(cli.log_file, PathBuf::from("/tmp/terrui.log"));
        assert_eq!(cli.start.as_deref(), Some("workspaces"));
    }
}
