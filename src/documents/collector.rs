use super::{DocumentClient, DocumentState, FetchError, FieldSelection, Progress};
use crate::flatten::FlatRecord;
use std::time::Instant;

const LOG_TARGET: &str = " collector";

/// List a project's documents and fetch each one, strictly one after another.
///
/// Records come back in listing order. The first failure aborts the whole run and no records
/// are returned.
pub async fn fetch_records(
    client: &DocumentClient,
    project_id: &str,
    states: &[DocumentState],
    selection: &FieldSelection,
    progress: &dyn Progress,
) -> Result<Vec<FlatRecord>, FetchError> {
    let start = Instant::now();

    progress.set_phase("Listing");
    let ids = client.list_ids(project_id, states).await.inspect_err(|_| progress.done())?;

    progress.set_phase("Fetching");
    progress.set_total(ids.len() as u64);

    let mut records = Vec::with_capacity(ids.len());
    for id in &ids {
        let record = client
            .get_detail(project_id, id, selection)
            .await
            .inspect_err(|e| {
                log::debug!(target: LOG_TARGET, "Aborting after failure on document {id}: {e}");
                progress.done();
            })?;
        records.push(record);
        progress.advance(id);
    }

    progress.done();
    log::info!(
        target: LOG_TARGET,
        "Fetched {} document(s) from project {project_id} in {:.3}s",
        records.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(records)
}
