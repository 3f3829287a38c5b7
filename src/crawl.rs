use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::{debug, info, warn};

use crate::control::{classify, Disposition, Pacing};
use crate::extract::{self, TitleClass};
use crate::fetch::Transport;
use crate::store::{Ledger, NonGpuRecord, NotFoundRecord};

pub struct SweepConfig {
    /// Closed-open probe range.
    pub start: u64,
    pub end: u64,
    /// Product page URL with one `{}` placeholder for the id.
    pub url_template: String,
    pub pacing: Pacing,
    /// Cap on ids actually fetched this run; skips don't count.
    pub limit: Option<usize>,
}

#[derive(Debug, Default)]
pub struct SweepStats {
    pub attempted: usize,
    pub skipped: usize,
    pub gpus: usize,
    pub non_gpus: usize,
    pub not_found: usize,
    /// Rate-limited, unexpected-status and transport failures: nothing
    /// recorded, so a later run picks these ids up again.
    pub deferred: usize,
}

/// Probe every id in the configured range, ascending, strictly sequential.
/// Ids already present in any record set are skipped without a fetch or a
/// delay; every fetched id is routed to exactly one record set (or deferred).
pub async fn sweep<T: Transport>(
    transport: &T,
    ledger: &mut Ledger,
    cfg: &SweepConfig,
) -> Result<SweepStats> {
    let pb = ProgressBar::new(cfg.end.saturating_sub(cfg.start));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut stats = SweepStats::default();

    for id in cfg.start..cfg.end {
        if ledger.is_known(id) {
            debug!("{id}: already recorded");
            stats.skipped += 1;
            pb.inc(1);
            continue;
        }
        if let Some(limit) = cfg.limit {
            if stats.attempted >= limit {
                break;
            }
        }
        stats.attempted += 1;

        let url = cfg.url_template.replacen("{}", &id.to_string(), 1);
        let disposition = classify(transport.fetch(&url).await);
        let delay = cfg.pacing.delay_after(&disposition);

        match disposition {
            Disposition::Success(response) => {
                let doc = Html::parse_document(&response.body);
                let title = extract::page_title(&doc);
                match extract::classify_title(&title) {
                    TitleClass::GraphicsCard => {
                        let record = extract::gpu_record(&doc, id, &title);
                        info!(
                            "{id}: GPU found: {} [{} {}] {}",
                            record.title, record.vendor, record.model, record.price
                        );
                        ledger.gpus.append(record)?;
                        stats.gpus += 1;
                    }
                    TitleClass::Excluded => {
                        info!("{id}: skipping prebuilt or laptop");
                        ledger.non_gpus.append(NonGpuRecord { id, title })?;
                        stats.non_gpus += 1;
                    }
                    TitleClass::NotGraphicsCard => {
                        info!("{id}: not a GPU");
                        ledger.non_gpus.append(NonGpuRecord { id, title })?;
                        stats.non_gpus += 1;
                    }
                }
            }
            Disposition::NotFound => {
                info!("{id}: 404");
                ledger.not_found.append(NotFoundRecord { id })?;
                stats.not_found += 1;
            }
            Disposition::RateLimited => {
                warn!(
                    "{id}: rate limited (403), cooling down {:.0?} before moving on",
                    cfg.pacing.cooldown
                );
                stats.deferred += 1;
            }
            Disposition::Unexpected(status) => {
                warn!("{id}: unexpected status {status}, leaving for a later run");
                stats.deferred += 1;
            }
            Disposition::TransportFailed(err) => {
                warn!("{id}: request failed: {err:#}, leaving for a later run");
                stats.deferred += 1;
            }
        }

        pb.inc(1);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pb.finish_and_clear();
    Ok(stats)
}

// ── Tests ──
