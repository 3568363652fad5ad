use std::path::PathBuf;

use anyhow::Context;
use rme_config::RmeConfig;
use rme_core::BodyFormat;
use rme_job::{EditTemplate, JobOptions, WhitelistSpec};

use crate::cli::Cli;

pub fn load_config() -> anyhow::Result<RmeConfig> {
    RmeConfig::load_with_dotenv().context("failed to load configuration")
}

/// Merge command-line flags over the configured job defaults.
///
/// Toggles are additive: a flag turns a feature on even if the config leaves it off.
pub fn job_options(cli: &Cli, config: &RmeConfig) -> anyhow::Result<JobOptions> {
    let whitelist = WhitelistSpec::new(
        cli.whitelist.clone(),
        &cli.whitelist_regex,
        &cli.whitelist_sub,
    )?;

    Ok(JobOptions {
        jobs_dir: cli
            .jobs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.job.jobs_dir)),
        template: EditTemplate::new(cli.edit_text.as_str()),
        whitelist,
        format: BodyFormat::from_html_flag(cli.html || config.job.html),
        remove_mentions: cli.remove_mentions || config.job.remove_mentions,
        flush_interval: cli
            .map_save_interval
            .unwrap_or(config.job.map_save_interval),
        edit_twice: cli.edit_twice || config.job.edit_twice,
        skip_confirmation: cli.yes,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rme").chain(args.iter().copied()))
            .expect("cli should parse")
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let mut config = RmeConfig::default();
        config.job.map_save_interval = 25;
        config.job.html = true;
        config.job.jobs_dir = "archive".into();

        let options = job_options(&parse(&["gone"]), &config).expect("options");

        assert_eq!(options.flush_interval, 25);
        assert_eq!(options.format, BodyFormat::Html);
        assert_eq!(options.jobs_dir, PathBuf::from("archive"));
        assert!(!options.skip_confirmation);
        assert_eq!(options.template.render("a", "b"), "gone");
    }

    #[test]
    fn flags_override_config() {
        let options = job_options(
            &parse(&[
                "%{id}",
                "--map-save-interval",
                "0",
                "--jobs-dir",
                "/tmp/rme",
                "--edit-twice",
                "-y",
            ]),
            &RmeConfig::default(),
        )
        .expect("options");

        assert_eq!(options.flush_interval, 0);
        assert_eq!(options.jobs_dir, PathBuf::from("/tmp/rme"));
        assert!(options.edit_twice);
        assert!(options.skip_confirmation);
        assert_eq!(options.format, BodyFormat::Markdown);
    }

    #[test]
    fn invalid_whitelist_regex_fails_before_any_remote_call() {
        let result = job_options(&parse(&["gone", "--wr", "(["]), &RmeConfig::default());
        assert!(result.is_err());
    }
}
