use crate::database::PageRepository;
use crate::services::client::DataServiceHandle;
use crate::services::protocol::{
    Ack, Action, ActionFailure, ActionReply, ActionRequest, ActionResult, PageLookup,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::{Instrument, debug, error, info, info_span, warn};

/// One request plus the channel its single reply goes back on.
pub struct Envelope {
    pub request: ActionRequest,
    pub respond_to: oneshot::Sender<ActionReply>,
}

pub struct DataServiceOptions {
    /// Bound on the inbound queue.
    pub queue_capacity: usize,
    /// How long a caller waits for a reply before giving up.
    pub reply_timeout: Duration,
    /// Most requests handled at the same time; further envelopes wait in the queue.
    pub max_in_flight: usize,
}

impl Default for DataServiceOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            reply_timeout: Duration::from_secs(5),
            max_in_flight: 32,
        }
    }
}

/// Owns the page store and answers action requests arriving on its channel.
pub struct DataService {
    repo: Arc<dyn PageRepository>,
}

impl DataService {
    /// Prepares the store and, only if that succeeds, starts accepting
    /// requests. The returned handle is the service's address.
    pub async fn start(
        repo: Arc<dyn PageRepository>,
        options: DataServiceOptions,
    ) -> Result<DataServiceHandle> {
        info!("Starting data service...");

        repo.prepare_schema()
            .await
            .inspect_err(|e| error!("Database preparation error: {:#}", e))
            .context("Data service failed to start")?;

        let (tx, rx) = mpsc::channel::<Envelope>(options.queue_capacity.max(1));
        let service = Arc::new(DataService { repo });
        let permits = Arc::new(Semaphore::new(options.max_in_flight.max(1)));
        tokio::spawn(service.run(rx, permits));

        info!("Data service ready, accepting requests.");

        Ok(DataServiceHandle::new(tx, options.reply_timeout))
    }

    // each envelope gets its own task, so a slow statement never holds up the queue.
    // a permit is taken before receiving, so at most `max_in_flight` tasks exist and the
    // bounded channel pushes back on callers. the loop ends once every handle is gone.
    async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<Envelope>, permits: Arc<Semaphore>) {
        loop {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };
            let Some(envelope) = rx.recv().await else {
                break;
            };
            let service = self.clone();
            let span = info_span!("action", request_id = %envelope.request.id);
            tokio::spawn(
                async move {
                    let _permit = permit;
                    let reply = service.handle(envelope.request).await;
                    if envelope.respond_to.send(reply).is_err() {
                        debug!("Caller went away before the reply was delivered.");
                    }
                }
                .instrument(span),
            );
        }

        info!("Data service channel closed, stopping.");
    }

    /// Routes one request to its operation and produces its only reply.
    pub async fn handle(&self, request: ActionRequest) -> ActionReply {
        let action = match request.action {
            Some(action) => action,
            None => {
                warn!(request_id = %request.id, "No action specified for request");
                return Err(ActionFailure::no_action());
            }
        };

        debug!(action = action.as_str(), "Dispatching");

        let outcome = match action {
            Action::ListPages => self.fetch_all_pages().await,
            Action::GetPage(p) => self.fetch_page(&p.name).await,
            Action::CreatePage(p) => self.create_page(&p.name, &p.content).await,
            Action::SavePage(p) => self.save_page(p.id, &p.content).await,
            Action::DeletePage(p) => self.delete_page(p.id).await,
            Action::Unrecognized(token) => {
                warn!(action = %token, "Bad action");
                return Err(ActionFailure::bad_action(&token));
            }
        };

        outcome.map_err(|e| {
            error!("Database query error: {:#}", e);
            ActionFailure::db(&e)
        })
    }

    async fn fetch_all_pages(&self) -> Result<ActionResult> {
        let mut pages = self.repo.list_page_names().await?;
        // String's Ord is byte order, so "Banana" < "Cherry" < "apple"
        pages.sort();
        Ok(ActionResult::Pages { pages })
    }

    async fn fetch_page(&self, name: &str) -> Result<ActionResult> {
        let lookup = match self.repo.get_page_by_name(name).await? {
            Some(page) => PageLookup::found(page.id, page.content),
            None => PageLookup::missing(),
        };
        Ok(ActionResult::Page(lookup))
    }

    async fn create_page(&self, name: &str, content: &str) -> Result<ActionResult> {
        self.repo.create_page(name, content).await?;
        Ok(ActionResult::Ack(Ack::Ok))
    }

    async fn save_page(&self, id: i64, content: &str) -> Result<ActionResult> {
        self.repo.save_page(id, content).await?;
        Ok(ActionResult::Ack(Ack::Ok))
    }

    async fn delete_page(&self, id: i64) -> Result<ActionResult> {
        self.repo.delete_page(id).await?;
        Ok(ActionResult::Ack(Ack::Ok))
    }
}
