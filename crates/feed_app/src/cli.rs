use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

#[derive(Debug, Clone, Parser)]
#[command(name = "feed_app")]
#[command(about = "Collect job listings from a paginated search feed")]
#[command(version)]
pub struct CliArgs {
    /// RON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search results url to open
    #[arg(long)]
    pub url: Option<String>,

    /// Query label used for the export file
    #[arg(long)]
    pub query: Option<String>,

    /// Export directory (default: ./output)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Attach to a running, signed-in browser over its DevTools websocket
    #[arg(long)]
    pub connect: Option<String>,

    /// Show the launched browser window
    #[arg(long)]
    pub headful: bool,

    /// Read saved result pages instead of a browser, page 1 first
    #[arg(long, num_args = 1.., value_name = "FILES")]
    pub replay: Vec<PathBuf>,

    /// Page cap (default: 4)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("feed_app").chain(args.iter().copied()))
    }

    #[test]
    fn parses_run_options() {
        let args = parse(&[
            "--url",
            "https://jobs.example.com/search/?keywords=rust",
            "--query",
            "rust",
            "--max-pages",
            "2",
            "--headful",
            "--log",
            "both",
        ])
        .unwrap();

        assert_eq!(args.query.as_deref(), Some("rust"));
        assert_eq!(args.max_pages, Some(2));
        assert!(args.headful);
        assert_eq!(args.log, LogDestination::Both);
        assert!(!args.verbose);
    }

    #[test]
    fn replay_takes_every_following_path() {
        let args = parse(&["--replay", "p1.html", "p2.html", "--query", "q"]).unwrap();

        assert_eq!(args.replay, vec![PathBuf::from("p1.html"), PathBuf::from("p2.html")]);
        assert_eq!(args.query.as_deref(), Some("q"));
    }

    #[test]
    fn defaults_log_to_terminal() {
        let args = parse(&["-v", "-o", "exports"]).unwrap();

        assert_eq!(args.log, LogDestination::Terminal);
        assert!(args.verbose);
        assert_eq!(args.out, Some(PathBuf::from("exports")));
        assert!(args.replay.is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--url"]).is_err());
        assert!(parse(&["--max-pages", "0"]).is_err());
        assert!(parse(&["--log", "syslog"]).is_err());
        assert_eq!(
            parse(&["--bogus"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
        assert!(parse(&["--replay"]).is_err());
    }

    #[test]
    fn help_is_reported_as_display_request() {
        let err = parse(&["--query", "x", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
