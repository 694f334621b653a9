use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::models::VersionKey;

/// States of one pipeline run, in the order they can be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    ValidateArgs,
    CheckVersionCache,
    ResolveSource,
    DecodeSource,
    CheckHashCache,
    Plan,
    Render,
    Pack,
    Promote,
    Done,
    Failed,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateArgs => "validate_args",
            Self::CheckVersionCache => "check_version_cache",
            Self::ResolveSource => "resolve_source",
            Self::DecodeSource => "decode_source",
            Self::CheckHashCache => "check_hash_cache",
            Self::Plan => "plan",
            Self::Render => "render",
            Self::Pack => "pack",
            Self::Promote => "promote",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a successful run obtained the version's icons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The version was already cached; nothing was resolved or rendered
    VersionCached,
    /// The source image had been rendered before under another version
    PromotedFromHash { content_hash: String },
    /// The variant set was rendered and packed in this run
    Rendered { content_hash: String, variants: usize },
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub version: VersionKey,
    pub outcome: RunOutcome,
    /// Every state visited, ending in `Done`
    pub states: Vec<PipelineStatus>,
    /// Version-keyed cache entry holding the icons
    pub output_dir: PathBuf,
}

impl PipelineReport {
    pub fn rendered(&self) -> bool {
        matches!(self.outcome, RunOutcome::Rendered { .. })
    }

    pub fn content_hash(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::VersionCached => None,
            RunOutcome::PromotedFromHash { content_hash }
            | RunOutcome::Rendered { content_hash, .. } => Some(content_hash),
        }
    }
}
