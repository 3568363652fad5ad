use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for the `rme` binary.
#[derive(Debug, Parser)]
#[command(
    name = "rme",
    version,
    about = "Mass download and edit your Reddit comments"
)]
pub struct Cli {
    /// What to replace your comments with. Valid placeholders are: '%{hash}', '%{id}' (without single quotes).
    pub edit_text: String,

    /// Whitelist any comments containing this string (case sensitive)
    #[arg(short, long)]
    pub whitelist: Vec<String>,

    /// Whitelist any comments containing a match to this regex
    #[arg(long, visible_alias = "wr")]
    pub whitelist_regex: Vec<String>,

    /// Whitelist any comments in this subreddit (case insensitive)
    #[arg(long, visible_alias = "ws")]
    pub whitelist_sub: Vec<String>,

    /// Removes mentions of all usernames in comments
    #[arg(long)]
    pub remove_mentions: bool,

    /// Skip confirmation prompt (this will NOT give you a chance to preview the comments that will be edited)
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Store the comments in HTML format instead of Markdown
    #[arg(long)]
    pub html: bool,

    /// How often to save the map file (in comments). 0 to save at the end of all parsing. Default: 10
    #[arg(long)]
    pub map_save_interval: Option<u32>,

    /// Edit the comment twice for the theoretical singular backup Reddit keeps
    #[arg(long)]
    pub edit_twice: bool,

    /// Use OAuth instead of username/password, needed for 2FA
    #[arg(long)]
    pub oauth: bool,

    /// Directory job workspaces are created in (default: jobs)
    #[arg(long)]
    pub jobs_dir: Option<PathBuf>,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::Cli;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_text_is_required() {
        assert!(Cli::try_parse_from(["rme"]).is_err());
    }

    #[test]
    fn defaults_are_off() {
        let cli = Cli::try_parse_from(["rme", "%{hash}"]).expect("cli should parse");
        assert_eq!(cli.edit_text, "%{hash}");
        assert!(cli.whitelist.is_empty());
        assert!(!cli.yes && !cli.html && !cli.oauth && !cli.edit_twice);
        assert_eq!(cli.map_save_interval, None);
    }

    #[test]
    fn whitelists_are_repeatable() {
        let cli = Cli::try_parse_from([
            "rme",
            "gone",
            "-w",
            "keep",
            "--whitelist",
            "also keep",
            "--wr",
            "^FAQ",
            "--whitelist-sub",
            "AskHistorians",
            "--ws",
            "rust",
        ])
        .expect("cli should parse");

        assert_eq!(cli.whitelist, ["keep", "also keep"]);
        assert_eq!(cli.whitelist_regex, ["^FAQ"]);
        assert_eq!(cli.whitelist_sub, ["AskHistorians", "rust"]);
    }

    #[test]
    fn toggles_and_interval_parse() {
        let cli = Cli::try_parse_from([
            "rme",
            "gone",
            "-y",
            "--html",
            "--remove-mentions",
            "--edit-twice",
            "--oauth",
            "--map-save-interval",
            "0",
        ])
        .expect("cli should parse");

        assert!(cli.yes && cli.html && cli.remove_mentions && cli.edit_twice && cli.oauth);
        assert_eq!(cli.map_save_interval, Some(0));
    }

    #[test]
    fn negative_interval_is_rejected() {
        let parsed = Cli::try_parse_from(["rme", "gone", "--map-save-interval", "-1"]);
        assert!(parsed.is_err());
    }
}
