use crate::client::{ApiClient, ApiError};
use crate::model::ToDoList;
use crate::tui::action::{AppEvent, Request};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Runs requests one at a time, in arrival order, so a mutation and the fetch
/// queued behind it are never reordered.
pub fn spawn(
    client: ApiClient,
    mut request_rx: Receiver<Request>,
    event_tx: Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = event_tx
            .send(AppEvent::Status(format!("Connecting to {}...", client.base())))
            .await;
        while let Some(request) = request_rx.recv().await {
            for event in perform(&client, request).await {
                if event_tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    })
}

/// Executes one request against the backend and reports what happened.
pub async fn perform(client: &ApiClient, request: Request) -> Vec<AppEvent> {
    match request {
        Request::FetchSummaries => vec![fetch_summaries(client).await],

        Request::CreateList(name) => {
            let mut events = Vec::new();
            match client.create_list(&name).await {
                Ok(Some(created)) => {
                    info!(list_id = %created.id, name = %created.name, "list created")
                }
                Ok(None) => info!(%name, "list created"),
                Err(e) => {
                    warn!(%name, error = %e, "creating list failed");
                    events.push(AppEvent::Error(format!("Could not create list: {}", e)));
                }
            }
            // The summaries are re-read whatever the create call returned.
            events.push(fetch_summaries(client).await);
            events
        }

        Request::DeleteList(id) => match client.delete_list(&id).await {
            Ok(true) => {
                info!(list_id = %id, "list deleted");
                vec![
                    fetch_summaries(client).await,
                    AppEvent::ListDeleted { id, ok: true },
                ]
            }
            // Someone else may already have removed it; refresh so a stale row goes away.
            Ok(false) => {
                warn!(list_id = %id, "server reported nothing to delete");
                vec![
                    fetch_summaries(client).await,
                    AppEvent::ListDeleted { id, ok: false },
                ]
            }
            Err(e) => {
                warn!(list_id = %id, error = %e, "deleting list failed");
                vec![AppEvent::ListDeleted { id, ok: false }]
            }
        },

        Request::FetchList(id) => snapshot(client.get_list(&id).await, "Could not load list"),

        Request::CreateItem { list_id, label } => snapshot(
            client.create_item(&list_id, &label).await,
            "Could not add item",
        ),

        Request::DeleteItem { list_id, item_id } => snapshot(
            client.delete_item(&list_id, &item_id).await,
            "Could not delete item",
        ),

        Request::SetChecked {
            list_id,
            item_id,
            checked,
        } => snapshot(
            client.set_checked_state(&list_id, &item_id, checked).await,
            "Could not update item",
        ),
    }
}

async fn fetch_summaries(client: &ApiClient) -> AppEvent {
    match client.list_summaries().await {
        Ok(summaries) => AppEvent::SummariesLoaded(summaries),
        Err(e) => {
            warn!(error = %e, "fetching lists failed");
            AppEvent::SummariesFailed(e.to_string())
        }
    }
}

fn snapshot(result: Result<ToDoList, ApiError>, context: &str) -> Vec<AppEvent> {
    match result {
        Ok(list) => vec![AppEvent::ListLoaded(list)],
        Err(e) => {
            warn!(error = %e, "{}", context);
            vec![AppEvent::Error(format!("{}: {}", context, e))]
        }
    }
}
