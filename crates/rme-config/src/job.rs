//! Job execution defaults.

use serde::{Deserialize, Serialize};

const fn default_map_save_interval() -> u32 {
    10
}

fn default_jobs_dir() -> String {
    "jobs".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobConfig {
    /// Directory under which per-job workspaces are created.
    #[serde(default = "default_jobs_dir")]
    pub jobs_dir: String,

    /// Flush the archive map every N archived comments. 0 flushes only at the end.
    #[serde(default = "default_map_save_interval")]
    pub map_save_interval: u32,

    /// Archive the rendered HTML instead of the Markdown source.
    #[serde(default)]
    pub html: bool,

    /// Overwrite each comment with filler text before the real edit.
    #[serde(default)]
    pub edit_twice: bool,

    /// Replace user mentions in archived bodies.
    #[serde(default)]
    pub remove_mentions: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            jobs_dir: default_jobs_dir(),
            map_save_interval: default_map_save_interval(),
            html: false,
            edit_twice: false,
            remove_mentions: false,
        }
    }
}
