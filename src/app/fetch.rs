// src/app/fetch.rs
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use eframe::egui as eg;
use tracing::error;

use super::catalog::{CatalogError, CatalogSource};
use super::types::{Command, FetchMsg};

/// Run one command to completion on the calling thread.
pub fn run_command(catalog: &dyn CatalogSource, cmd: Command) -> FetchMsg {
    match cmd {
        Command::FetchShows => FetchMsg::Shows(catalog.fetch_shows()),
        Command::FetchEpisodes(show_id) => FetchMsg::Episodes {
            show_id,
            result: catalog.fetch_episodes(show_id),
        },
    }
}

fn failed(cmd: Command, err: CatalogError) -> FetchMsg {
    match cmd {
        Command::FetchShows => FetchMsg::Shows(Err(err)),
        Command::FetchEpisodes(show_id) => FetchMsg::Episodes { show_id, result: Err(err) },
    }
}

/// Run `cmd` on a background thread; the result lands on `tx` and the UI is
/// woken up. There is no cancellation: late results are sorted out by the
/// browser using the show id they carry.
pub fn spawn_command(
    catalog: Arc<dyn CatalogSource>,
    cmd: Command,
    tx: Sender<FetchMsg>,
    ctx: eg::Context,
) {
    let worker_tx = tx.clone();
    let worker_ctx = ctx.clone();
    let spawned = thread::Builder::new()
        .name(format!("tvx-fetch-{cmd:?}"))
        .spawn(move || {
            let msg = run_command(catalog.as_ref(), cmd);
            let _ = worker_tx.send(msg);
            worker_ctx.request_repaint();
        });
    if let Err(e) = spawned {
        error!("could not start fetch thread for {cmd:?}: {e}");
        report_failure(cmd, CatalogError::Network(format!("could not start request: {e}")), &tx, &ctx);
    }
}

/// Deliver `err` as the result of `cmd` and wake the UI to show it.
pub fn report_failure(cmd: Command, err: CatalogError, tx: &Sender<FetchMsg>, ctx: &eg::Context) {
    let _ = tx.send(failed(cmd, err));
    ctx.request_repaint();
}
