use tracing::{info, warn};

use crate::error::Result;
use crate::reconcile::index::AssetIndex;
use crate::reconcile::resolver::Reconciler;
use crate::store::CatalogStore;
use crate::types::Resolution;

/// Number of attempted variants reported for an unresolved title.
const REPORTED_ATTEMPTS: usize = 3;

/// A title for which no asset was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub id: i64,
    pub title: String,
    /// Leading attempted variants, most faithful first.
    pub attempted: Vec<String>,
}

/// Summary of a batch image sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries scanned.
    pub total: usize,
    /// Entries whose image path was written back.
    pub updated: usize,
    /// Entries with no acceptable asset.
    pub unresolved: Vec<Unresolved>,
}

/// Resolves every catalog entry's title against `index` and writes the
/// matched asset back as `<path_prefix>/<file_name>`.
///
/// Unresolved titles are logged and reported; they do not stop the batch.
///
/// # Errors
///
/// Returns the store's error if reading the catalog or writing an entry fails.
pub fn sync_images<S: CatalogStore + ?Sized>(
    store: &mut S,
    index: &AssetIndex,
    reconciler: &Reconciler,
    path_prefix: &str,
) -> Result<SyncReport> {
    let entries = store.entries()?;
    info!(assets = index.len(), entries = entries.len(), "starting image sync");

    let mut report = SyncReport {
        total: entries.len(),
        ..SyncReport::default()
    };

    for entry in &entries {
        match reconciler.resolve_asset(&entry.title, index) {
            Resolution::Resolved(found) => {
                let path = join_asset_path(path_prefix, &found.file_name);
                store.set_image(entry.id, &path)?;
                report.updated += 1;
                info!(title = %entry.title, file = %found.file_name, strategy = %found.strategy, "updated");
            }
            Resolution::Unresolved { mut attempted } => {
                attempted.truncate(REPORTED_ATTEMPTS);
                let tried = reconciler.attempted_file_names(&attempted);
                warn!(title = %entry.title, tried = %tried.join(", "), "image not found");
                report.unresolved.push(Unresolved {
                    id: entry.id,
                    title: entry.title.clone(),
                    attempted,
                });
            }
        }
    }

    info!(updated = report.updated, "image sync finished");
    Ok(report)
}

fn join_asset_path(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}
