use std::time::Duration;

use ghcatalog::search::{PageSize, SearchStatus, SearchView};
use tokio::sync::watch;

use crate::SearchArgs;
use crate::commands::shared::{github_client, start_session};
use crate::config::Config;
use crate::render;
use crate::shutdown;

/// Run one query and print the first page.
pub(crate) async fn handle_search(
    args: SearchArgs,
    config: &Config,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.search_options();
    if let Some(size) = args.page_size {
        options.page_size = PageSize::new(size)?;
    }
    options.include_forks |= args.include_forks;

    if options.include_forks && (args.name.is_some() || !args.lang.is_empty()) {
        tracing::warn!("Name and language filters are ignored when forks are included");
    }

    let client = github_client(config, args.token)?;
    let handle = start_session(client, options);
    let mut views = handle.subscribe();

    // Filters first: selecting the account cancels their pending refetch and
    // issues a single query that already includes them.
    if let Some(name) = args.name {
        handle.change_name_filter(name)?;
    }
    if !args.lang.is_empty() {
        handle.change_language_filters(args.lang)?;
    }
    handle.select_account(args.account)?;

    let timeout = config.github_timeout() + Duration::from_secs(5);
    let view = tokio::select! {
        view = tokio::time::timeout(timeout, settled(&mut views)) => view,
        _ = shutdown::requested(&mut shutdown) => {
            handle.shutdown().await;
            return Err("interrupted".into());
        }
    };
    handle.shutdown().await;

    let view = match view {
        Ok(Some(view)) => view,
        Ok(None) => return Err("search session stopped unexpectedly".into()),
        Err(_) => return Err("timed out waiting for results".into()),
    };

    if view.status == SearchStatus::Failed {
        let message = view.last_error.unwrap_or_else(|| "query failed".to_string());
        return Err(message.into());
    }

    render::print_page(&view, args.output)?;
    Ok(())
}

/// Wait for the first completed query.
async fn settled(views: &mut watch::Receiver<SearchView>) -> Option<SearchView> {
    views
        .wait_for(|v| v.status == SearchStatus::Loaded || v.status == SearchStatus::Failed)
        .await
        .ok()
        .map(|view| view.clone())
}
