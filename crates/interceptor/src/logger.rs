//! TranscriptLogger - per-turn activity interception
//!
//! The host pipeline calls one wrapper per interception point, each
//! taking the event plus a continuation that runs the rest of the
//! pipeline. Hooks are plain functions of (event, continuation) ->
//! result; no subscription hierarchy. The wrappers forward the
//! pipeline's own result unchanged and hand every observed activity
//! to the batcher as a deep copy, because the host keeps mutating its
//! live objects after the call returns.

use std::future::Future;

use tracing::instrument;

use batcher::{ActivityBatcher, BatcherConfig};
use contracts::{
    Activity, ActivityType, ContractError, ConversationReference, EventStreamClient,
};

/// Per-activity acknowledgment returned by the host's send pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendResponse {
    pub id: Option<String>,
}

/// Middleware that relays every activity the bot sees or produces
pub struct TranscriptLogger<C> {
    batcher: ActivityBatcher<C>,
}

impl<C: EventStreamClient + Send + Sync + 'static> TranscriptLogger<C> {
    pub fn new(batcher: ActivityBatcher<C>) -> Self {
        Self { batcher }
    }

    /// Construct with a fresh batcher over the given client
    pub fn from_client(client: C, config: BatcherConfig) -> Self {
        Self::new(ActivityBatcher::new(client, config))
    }

    pub fn batcher(&self) -> &ActivityBatcher<C> {
        &self.batcher
    }

    /// Turn entry point
    ///
    /// Logs the incoming activity (if any) after defaulting a missing
    /// sender role to "user" on the live activity, then runs the rest
    /// of the turn. A turn without an incoming activity is legal (some
    /// channels open turns proactively); the continuation always runs.
    #[instrument(name = "transcript_on_turn", skip_all)]
    pub async fn on_turn<F, Fut>(
        &self,
        incoming: Option<&mut Activity>,
        next: F,
    ) -> Result<(), ContractError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ContractError>>,
    {
        if let Some(activity) = incoming {
            activity.normalize_from_role();
            self.log_activity(Some(activity))?;
        }

        next().await
    }

    /// Outbound interception
    ///
    /// Runs the downstream pipeline first, then logs each outgoing
    /// activity and forwards the pipeline responses unchanged.
    #[instrument(name = "transcript_on_send", skip_all, fields(count = activities.len()))]
    pub async fn on_send_activities<F, Fut>(
        &self,
        activities: &[Activity],
        next: F,
    ) -> Result<Vec<SendResponse>, ContractError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SendResponse>, ContractError>>,
    {
        let responses = next().await?;

        for activity in activities {
            self.log_activity(Some(activity))?;
        }

        Ok(responses)
    }

    /// Update interception
    ///
    /// Runs the update first, then logs a copy retagged as a message
    /// update and forwards the result unchanged.
    #[instrument(name = "transcript_on_update", skip_all)]
    pub async fn on_update_activity<F, Fut>(
        &self,
        activity: &Activity,
        next: F,
    ) -> Result<SendResponse, ContractError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SendResponse, ContractError>>,
    {
        let response = next().await?;

        let mut updated = activity.clone();
        updated.activity_type = ActivityType::MessageUpdate;
        self.log_activity(Some(&updated))?;

        Ok(response)
    }

    /// Delete interception
    ///
    /// Runs the delete first, then logs a minimal tombstone carrying
    /// only the deleted activity's identifier and conversation.
    #[instrument(name = "transcript_on_delete", skip_all)]
    pub async fn on_delete_activity<F, Fut>(
        &self,
        reference: &ConversationReference,
        next: F,
    ) -> Result<(), ContractError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ContractError>>,
    {
        next().await?;

        let tombstone = reference.delete_record();
        self.log_activity(Some(&tombstone))?;

        Ok(())
    }

    /// Hand one activity to the batcher
    ///
    /// # Errors
    /// A missing activity is a caller-contract violation, reported
    /// immediately; nothing is enqueued.
    pub fn log_activity(&self, activity: Option<&Activity>) -> Result<(), ContractError> {
        let activity = activity.ok_or(ContractError::MissingActivity)?;
        self.batcher.enqueue(activity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ChannelAccount, ConversationAccount, Role};
    use dispatcher::MemoryStreamClient;
    use std::time::Duration;

    fn logger(
        batch_size: usize,
    ) -> (TranscriptLogger<MemoryStreamClient>, MemoryStreamClient) {
        let client = MemoryStreamClient::new(2);
        let config = BatcherConfig {
            batch_size,
            batch_interval: Duration::from_secs(60),
        };
        (TranscriptLogger::from_client(client.clone(), config), client)
    }

    fn incoming(text: &str) -> Activity {
        Activity::message("emulator", text)
            .with_conversation(ConversationAccount::new("conv-1"))
            .with_from(ChannelAccount::new("user-1"))
    }

    #[tokio::test]
    async fn test_on_turn_logs_incoming_with_defaulted_role() {
        let (logger, client) = logger(5);
        let mut activity = incoming("hello bot");

        logger
            .on_turn(Some(&mut activity), || async { Ok(()) })
            .await
            .unwrap();

        // live activity was normalized in place
        assert_eq!(activity.from.as_ref().unwrap().role, Some(Role::User));

        logger.batcher().flush().await.unwrap();
        let batches = client.batches();
        assert_eq!(batches.len(), 1);
        let transcript = &batches[0].events[0].transcript;
        assert_eq!(transcript.text.as_deref(), Some("hello bot"));
        assert_eq!(transcript.from.as_ref().unwrap().role, Some(Role::User));
    }

    #[tokio::test]
    async fn test_on_turn_without_incoming_still_runs_next() {
        let (logger, client) = logger(5);
        let mut ran = false;

        logger
            .on_turn(None, || async {
                ran = true;
                Ok(())
            })
            .await
            .unwrap();

        assert!(ran);
        logger.batcher().flush().await.unwrap();
        assert_eq!(client.batch_count(), 0);
    }

    #[tokio::test]
    async fn test_on_send_logs_after_pipeline_and_forwards_responses() {
        let (logger, client) = logger(5);
        let outgoing = vec![
            incoming("reply one"),
            incoming("reply two"),
        ];

        let responses = logger
            .on_send_activities(&outgoing, || async {
                Ok(vec![
                    SendResponse { id: Some("r1".into()) },
                    SendResponse { id: Some("r2".into()) },
                ])
            })
            .await
            .unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id.as_deref(), Some("r1"));

        logger.batcher().flush().await.unwrap();
        let events = &client.batches()[0].events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message.as_deref(), Some("reply one"));
        assert_eq!(events[1].message.as_deref(), Some("reply two"));
    }

    #[tokio::test]
    async fn test_on_update_retags_activity_type() {
        let (logger, client) = logger(5);
        let edited = incoming("edited text");

        logger
            .on_update_activity(&edited, || async { Ok(SendResponse::default()) })
            .await
            .unwrap();

        logger.batcher().flush().await.unwrap();
        let event = &client.batches()[0].events[0];
        assert_eq!(event.activity_type, ActivityType::MessageUpdate);
        assert_eq!(event.transcript.activity_type, ActivityType::MessageUpdate);
        assert_eq!(event.message.as_deref(), Some("edited text"));
    }

    #[tokio::test]
    async fn test_on_delete_logs_tombstone() {
        let (logger, client) = logger(5);
        let original = incoming("doomed");
        let reference = ConversationReference::from_activity(&original).unwrap();

        logger
            .on_delete_activity(&reference, || async { Ok(()) })
            .await
            .unwrap();

        logger.batcher().flush().await.unwrap();
        let event = &client.batches()[0].events[0];
        assert_eq!(event.activity_type, ActivityType::MessageDelete);
        assert_eq!(event.transcript.id, original.id);
        assert_eq!(
            event.transcript.conversation.as_ref().unwrap().id,
            "conv-1"
        );
        assert!(event.message.is_none());
    }

    #[tokio::test]
    async fn test_log_activity_none_is_contract_violation() {
        let (logger, client) = logger(5);

        let result = logger.log_activity(None);
        assert!(matches!(result, Err(ContractError::MissingActivity)));

        logger.batcher().flush().await.unwrap();
        assert_eq!(client.batch_count(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_error_passes_through_unlogged() {
        let (logger, client) = logger(5);
        let outgoing = vec![incoming("never logged")];

        let result = logger
            .on_send_activities(&outgoing, || async {
                Err(ContractError::Other("downstream failed".into()))
            })
            .await;

        assert!(result.is_err());
        logger.batcher().flush().await.unwrap();
        // downstream failed before producing output, nothing captured
        assert_eq!(client.batch_count(), 0);
    }
}
