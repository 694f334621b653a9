//! Pipeline orchestrator
//!
//! Drives one run through explicit states:
//!
//! ```text
//! ValidateArgs -> CheckVersionCache -+-> Done                        (version hit)
//!                                    +-> ResolveSource -> DecodeSource -> CheckHashCache
//! CheckHashCache -+-> Promote -> Done                                (hash hit)
//!                 +-> Plan -> Render -> Pack -> Promote -> Done
//! ```
//!
//! Any error moves the run to `Failed`; a staged hash entry is discarded so
//! no partially written entry ever becomes visible.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::cache::{CacheEntryMetadata, CacheKey, CacheStore, FsCacheStore};
use crate::config::Config;
use crate::errors::{IconError, IconResult};
use crate::icons::packer::FAVICON_BASE_NAME;
use crate::icons::{
    self, BackgroundColor, ICO_FILENAME, IconPacker, RenderPlan, ResizeFilter, VariantRenderer,
    VariantTemplate,
};
use crate::models::VersionKey;
use crate::source::{ICON_FILENAME, SnapshotDirectoryResolver, SnapshotResolver, SourceImage};

use super::state::{PipelineReport, PipelineStatus, RunOutcome};

/// Settings that shape a run, usually taken from [`Config`]
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub background_color: BackgroundColor,
    pub resize_filter: ResizeFilter,
    pub cache_root: PathBuf,
    pub app_path: PathBuf,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            background_color: config.icons.background_color,
            resize_filter: config.icons.resize_filter,
            cache_root: config.storage.cache_path.clone(),
            app_path: config.storage.app_path.clone(),
        }
    }
}

/// One state together with the data it needs
enum Step {
    ValidateArgs(String),
    CheckVersionCache(VersionKey),
    ResolveSource(VersionKey),
    DecodeSource(VersionKey, PathBuf),
    CheckHashCache(VersionKey, SourceImage),
    Plan(VersionKey, SourceImage),
    Render(VersionKey, SourceImage, Vec<RenderPlan>),
    Pack {
        version: VersionKey,
        source: SourceImage,
        files: Vec<String>,
    },
    Promote {
        version: VersionKey,
        content_hash: String,
        variants: Option<usize>,
    },
    Done {
        version: VersionKey,
        outcome: RunOutcome,
    },
}

impl Step {
    fn status(&self) -> PipelineStatus {
        match self {
            Step::ValidateArgs(_) => PipelineStatus::ValidateArgs,
            Step::CheckVersionCache(_) => PipelineStatus::CheckVersionCache,
            Step::ResolveSource(_) => PipelineStatus::ResolveSource,
            Step::DecodeSource(..) => PipelineStatus::DecodeSource,
            Step::CheckHashCache(..) => PipelineStatus::CheckHashCache,
            Step::Plan(..) => PipelineStatus::Plan,
            Step::Render(..) => PipelineStatus::Render,
            Step::Pack { .. } => PipelineStatus::Pack,
            Step::Promote { .. } => PipelineStatus::Promote,
            Step::Done { .. } => PipelineStatus::Done,
        }
    }
}

/// Per-run bookkeeping
#[derive(Default)]
struct RunContext {
    states: Vec<PipelineStatus>,
    /// Staged hash entry not yet committed
    staging: Option<PathBuf>,
}

/// Generates, caches and promotes the icon set for one version
pub struct IconPipeline {
    settings: PipelineSettings,
    cache: Arc<dyn CacheStore>,
    snapshots: Arc<dyn SnapshotResolver>,
    catalog: Vec<VariantTemplate>,
    renderer: VariantRenderer,
    packer: IconPacker,
}

impl IconPipeline {
    pub fn new(
        settings: PipelineSettings,
        cache: Arc<dyn CacheStore>,
        snapshots: Arc<dyn SnapshotResolver>,
    ) -> Self {
        let renderer = VariantRenderer::new(settings.background_color, settings.resize_filter);
        Self {
            settings,
            cache,
            snapshots,
            catalog: icons::expand(),
            renderer,
            packer: IconPacker::default(),
        }
    }

    /// Pipeline backed by the filesystem cache and snapshot directory
    pub fn from_config(config: &Config) -> Self {
        let settings = PipelineSettings::from_config(config);
        let cache = Arc::new(FsCacheStore::new(&settings.cache_root));
        let mut resolver = SnapshotDirectoryResolver::new(config.snapshot_path());
        if let Some(command) = &config.snapshots.command {
            resolver = resolver.with_command(command.clone());
        }
        Self::new(settings, cache, Arc::new(resolver))
    }

    /// Replace the expanded catalog, e.g. with a reduced set
    pub fn with_catalog(mut self, templates: Vec<VariantTemplate>) -> Self {
        self.catalog = templates;
        self
    }

    /// Run the pipeline for a raw `--version` argument
    pub async fn run(&self, raw_version: &str) -> IconResult<PipelineReport> {
        info!("Icon generation ongoing - please wait ...");

        let mut run = RunContext::default();
        match self.drive(raw_version, &mut run).await {
            Ok(report) => {
                info!("Icon generation done.");
                Ok(report)
            }
            Err(e) => {
                let failed_in = run
                    .states
                    .last()
                    .copied()
                    .unwrap_or(PipelineStatus::ValidateArgs);
                if let Some(staging) = run.staging.take() {
                    self.cache.discard_entry(&staging).await;
                }
                debug!("Icon pipeline entering state {}", PipelineStatus::Failed);
                error!(
                    "Icon generation failed in state {} ({}): {}",
                    failed_in,
                    e.kind(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn drive(&self, raw_version: &str, run: &mut RunContext) -> IconResult<PipelineReport> {
        let mut step = Step::ValidateArgs(raw_version.to_string());
        loop {
            let status = step.status();
            debug!("Icon pipeline entering state {}", status);
            run.states.push(status);

            step = match step {
                Step::Done { version, outcome } => {
                    return Ok(PipelineReport {
                        output_dir: self.cache.entry_path(&CacheKey::version(&version)),
                        version,
                        outcome,
                        states: std::mem::take(&mut run.states),
                    });
                }
                other => self.advance(other, run).await?,
            };
        }
    }

    async fn advance(&self, step: Step, run: &mut RunContext) -> IconResult<Step> {
        let next = match step {
            Step::ValidateArgs(raw) => Step::CheckVersionCache(VersionKey::parse(&raw)?),

            Step::CheckVersionCache(version) => {
                let key = CacheKey::version(&version);
                if version.is_dev() {
                    debug!("Removing cached {} icons", version);
                    self.cache.invalidate(&version).await?;
                }

                if self.cache.exists(&key).await {
                    match self.cache.metadata(&key).await {
                        Some(meta) => info!(
                            "Icons for version {} already cached (hash {})",
                            version, meta.content_hash
                        ),
                        None => info!("Icons for version {} already cached", version),
                    }
                    Step::Done {
                        version,
                        outcome: RunOutcome::VersionCached,
                    }
                } else {
                    Step::ResolveSource(version)
                }
            }

            Step::ResolveSource(version) => {
                let path = self.resolve_source(&version).await?;
                Step::DecodeSource(version, path)
            }

            Step::DecodeSource(version, path) => {
                let source = SourceImage::load(&path).await?;
                Step::CheckHashCache(version, source)
            }

            Step::CheckHashCache(version, source) => {
                let key = CacheKey::content_hash(source.content_hash());
                if self.cache.exists(&key).await {
                    info!(
                        "Icons with hash {} already cached, reusing them for version {}",
                        source.content_hash(),
                        version
                    );
                    Step::Promote {
                        version,
                        content_hash: source.content_hash().to_string(),
                        variants: None,
                    }
                } else {
                    Step::Plan(version, source)
                }
            }

            Step::Plan(version, source) => {
                let plans = icons::plan(source.width(), source.height(), &self.catalog);
                Step::Render(version, source, plans)
            }

            Step::Render(version, source, plans) => {
                let key = CacheKey::content_hash(source.content_hash());
                let staging = self.cache.begin_entry(&key).await?;
                run.staging = Some(staging.clone());

                self.renderer.render(&source, &plans, &staging).await?;
                let files = VariantRenderer::processing_order(&plans)
                    .into_iter()
                    .map(|p| p.output_name.clone())
                    .collect();
                Step::Pack {
                    version,
                    source,
                    files,
                }
            }

            Step::Pack {
                version,
                source,
                mut files,
            } => {
                let staging = run
                    .staging
                    .clone()
                    .ok_or_else(|| IconError::pack("No staged hash entry to pack into"))?;
                if self.packs_favicons() {
                    self.packer.pack(&staging).await?;
                    files.push(ICO_FILENAME.to_string());
                }

                let variants = files.len();
                CacheEntryMetadata::new(
                    source.content_hash(),
                    source.width(),
                    source.height(),
                    files,
                )
                .write_to(&staging)
                .await?;

                Step::Promote {
                    version,
                    content_hash: source.content_hash().to_string(),
                    variants: Some(variants),
                }
            }

            Step::Promote {
                version,
                content_hash,
                variants,
            } => {
                if let Some(staging) = run.staging.take() {
                    self.cache
                        .commit_entry(&CacheKey::content_hash(&content_hash), &staging)
                        .await?;
                }
                self.cache.promote(&content_hash, &version).await?;

                let outcome = match variants {
                    Some(variants) => RunOutcome::Rendered {
                        content_hash,
                        variants,
                    },
                    None => RunOutcome::PromotedFromHash { content_hash },
                };
                Step::Done { version, outcome }
            }

            done @ Step::Done { .. } => done,
        };
        Ok(next)
    }

    /// `dev` prefers the working copy; everything else goes to the snapshots
    async fn resolve_source(&self, version: &VersionKey) -> IconResult<PathBuf> {
        if version.is_dev() {
            let working_copy = self.settings.app_path.join(ICON_FILENAME);
            if tokio::fs::metadata(&working_copy)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                info!("Using working copy icon {}", working_copy.display());
                return Ok(working_copy);
            }
        }
        self.snapshots.resolve_icon(version).await
    }

    fn packs_favicons(&self) -> bool {
        self.catalog
            .iter()
            .any(|t| t.base_name == FAVICON_BASE_NAME)
    }
}
