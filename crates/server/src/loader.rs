use anyhow::Result;
use shared::domain::OrderLine;
use storage::{tsv, TsvStore};
use tracing::{error, info};
use url::Url;

/// Resolves the working dataset.
///
/// The local cache wins whenever it exists; otherwise a one-shot remote fetch
/// seeds it. Remote failures (network, status, parse) degrade to an empty
/// dataset and are only logged; cache read or write failures propagate, since
/// they point at a deployment problem.
pub async fn load_dataset(store: &TsvStore, remote_url: &Url) -> Result<Vec<OrderLine>> {
    if store.exists() {
        return store.load();
    }

    match fetch_remote(remote_url).await {
        Ok(rows) => {
            store.save(&rows)?;
            info!(
                rows = rows.len(),
                url = %remote_url,
                "seeded dataset cache from remote source"
            );
            Ok(rows)
        }
        Err(error) => {
            error!(
                %error,
                url = %remote_url,
                "failed to load remote dataset, starting with an empty dataset"
            );
            Ok(Vec::new())
        }
    }
}

async fn fetch_remote(url: &Url) -> Result<Vec<OrderLine>> {
    let body = reqwest::get(url.clone())
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(tsv::parse(&body)?)
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
