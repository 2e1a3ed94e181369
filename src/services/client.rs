use crate::services::data_service::Envelope;
use crate::services::protocol::{
    Action, ActionFailure, ActionRequest, ActionResult, CreatePagePayload, DeletePagePayload,
    GetPagePayload, PageLookup, SavePagePayload,
};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Everything that can go wrong when asking the data service for something.
///
/// `Failed` is a reply from the service; the other variants mean no reply
/// arrived at all.
#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("data service failed the request: {0}")]
    Failed(#[from] ActionFailure),
    #[error("no reply from the data service within {0:?}")]
    Timeout(Duration),
    #[error("data service is not running")]
    Unavailable,
    #[error("unexpected reply to {action}: {reply:?}")]
    UnexpectedReply {
        action: &'static str,
        reply: ActionResult,
    },
}

/// Address of a running data service. Cheap to clone; every clone feeds the
/// same inbound channel.
#[derive(Clone)]
pub struct DataServiceHandle {
    tx: mpsc::Sender<Envelope>,
    reply_timeout: Duration,
}

impl DataServiceHandle {
    pub(crate) fn new(tx: mpsc::Sender<Envelope>, reply_timeout: Duration) -> Self {
        Self { tx, reply_timeout }
    }

    /// Hands a request to the service and waits, up to the reply timeout,
    /// for its one reply.
    pub async fn send(&self, request: ActionRequest) -> Result<ActionResult, DataServiceError> {
        let (respond_to, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            request,
            respond_to,
        };

        let exchange = async {
            self.tx
                .send(envelope)
                .await
                .map_err(|_| DataServiceError::Unavailable)?;
            reply_rx.await.map_err(|_| DataServiceError::Unavailable)
        };

        match tokio::time::timeout(self.reply_timeout, exchange).await {
            Ok(Ok(reply)) => reply.map_err(DataServiceError::from),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DataServiceError::Timeout(self.reply_timeout)),
        }
    }

    pub async fn list_pages(&self) -> Result<Vec<String>, DataServiceError> {
        match self.send(ActionRequest::new(Action::ListPages)).await? {
            ActionResult::Pages { pages } => Ok(pages),
            reply => Err(DataServiceError::UnexpectedReply {
                action: Action::LIST_PAGES,
                reply,
            }),
        }
    }

    pub async fn get_page(&self, name: &str) -> Result<PageLookup, DataServiceError> {
        let request = ActionRequest::new(Action::GetPage(GetPagePayload {
            name: name.to_string(),
        }));
        match self.send(request).await? {
            ActionResult::Page(lookup) => Ok(lookup),
            reply => Err(DataServiceError::UnexpectedReply {
                action: Action::GET_PAGE,
                reply,
            }),
        }
    }

    pub async fn create_page(&self, name: &str, content: &str) -> Result<(), DataServiceError> {
        let request = ActionRequest::new(Action::CreatePage(CreatePagePayload {
            name: name.to_string(),
            content: content.to_string(),
        }));
        self.expect_ack(Action::CREATE_PAGE, request).await
    }

    pub async fn save_page(&self, id: i64, content: &str) -> Result<(), DataServiceError> {
        let request = ActionRequest::new(Action::SavePage(SavePagePayload {
            id,
            content: content.to_string(),
        }));
        self.expect_ack(Action::SAVE_PAGE, request).await
    }

    pub async fn delete_page(&self, id: i64) -> Result<(), DataServiceError> {
        let request = ActionRequest::new(Action::DeletePage(DeletePagePayload { id }));
        self.expect_ack(Action::DELETE_PAGE, request).await
    }

    async fn expect_ack(
        &self,
        action: &'static str,
        request: ActionRequest,
    ) -> Result<(), DataServiceError> {
        match self.send(request).await? {
            ActionResult::Ack(_) => Ok(()),
            reply => Err(DataServiceError::UnexpectedReply { action, reply }),
        }
    }
}
