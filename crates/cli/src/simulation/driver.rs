//! Simulation driver - walks scripted users through the middleware

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use contracts::{
    Activity, ActivityType, ChannelAccount, ContractError, ConversationAccount,
    ConversationReference, EventStreamClient, Role,
};
use interceptor::{SendResponse, TranscriptLogger};

use super::script::dialog_catalog;

/// Minimum simulated user population for meaningful funnels
pub const MIN_USERS: usize = 100;

/// Channel id stamped on all simulated traffic
const CHANNEL_ID: &str = "simulator";

/// Simulation parameters
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub users: usize,
    /// Deterministic runs when set
    pub seed: Option<u64>,
    /// Every Nth user edits their last answer
    pub update_every: usize,
    /// Every Nth user deletes their last answer
    pub delete_every: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            users: 200,
            seed: None,
            update_every: 20,
            delete_every: 50,
        }
    }
}

/// Counters from a simulation run
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStats {
    pub users: usize,
    pub conversations: u64,
    pub user_turns: u64,
    pub bot_replies: u64,
    pub updates: u64,
    pub deletes: u64,
    pub untracked_events: u64,
    pub abandoned_dialogs: u64,
}

/// Drive the scripted dialog catalog through the middleware
///
/// Ends with a forced drain so the last partial batch is delivered.
#[instrument(name = "simulation_run", skip(logger, config), fields(users = config.users))]
pub async fn run_simulation<C>(
    logger: &TranscriptLogger<C>,
    config: &SimulationConfig,
) -> Result<SimulationStats, ContractError>
where
    C: EventStreamClient + Send + Sync + 'static,
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut stats = SimulationStats {
        users: config.users,
        ..Default::default()
    };

    let bot = ChannelAccount::new("relay-bot").with_role(Role::Bot);

    for user_index in 0..config.users {
        let user = ChannelAccount::new(Uuid::new_v4().to_string());

        for dialog in dialog_catalog() {
            let conversation = ConversationAccount::new(Uuid::new_v4().to_string());
            stats.conversations += 1;

            let mut last_answer: Option<Activity> = None;

            for step in dialog.steps {
                // bot prompt goes out through the send pipeline
                let prompt = bot_activity(step.prompt, &conversation, &bot, &user);
                logger
                    .on_send_activities(&[prompt], || async {
                        Ok(vec![SendResponse::default()])
                    })
                    .await?;
                stats.bot_replies += 1;

                // user answer arrives as the next turn
                let mut answer = user_activity(step.answer, &conversation, &user, &bot);
                logger.on_turn(Some(&mut answer), || async { Ok(()) }).await?;
                stats.user_turns += 1;
                last_answer = Some(answer);

                if rng.random_bool(step.abandon_rate) {
                    stats.abandoned_dialogs += 1;
                    debug!(dialog = dialog.name, step = step.name, "User abandoned dialog");
                    break;
                }
            }

            if let Some(answer) = last_answer {
                if user_index % config.update_every == config.update_every - 1 {
                    let mut edited = answer.clone();
                    edited.text = edited.text.map(|t| format!("{t} (edited)"));
                    logger
                        .on_update_activity(&edited, || async {
                            Ok(SendResponse::default())
                        })
                        .await?;
                    stats.updates += 1;
                }

                if user_index % config.delete_every == config.delete_every - 1 {
                    if let Some(reference) = ConversationReference::from_activity(&answer) {
                        logger
                            .on_delete_activity(&reference, || async { Ok(()) })
                            .await?;
                        stats.deletes += 1;
                    }
                }
            }
        }

        // proactive telemetry event outside any conversation; the
        // batcher drops it, which the summary makes visible
        if user_index % 10 == 0 {
            let event = Activity::new(ActivityType::Event, CHANNEL_ID);
            logger.log_activity(Some(&event))?;
            stats.untracked_events += 1;
        }
    }

    logger.batcher().flush().await?;

    info!(
        conversations = stats.conversations,
        user_turns = stats.user_turns,
        bot_replies = stats.bot_replies,
        "Simulation complete"
    );

    Ok(stats)
}

fn user_activity(
    text: &str,
    conversation: &ConversationAccount,
    user: &ChannelAccount,
    bot: &ChannelAccount,
) -> Activity {
    // role left unset on purpose: the interceptor defaults it
    Activity::message(CHANNEL_ID, text)
        .with_conversation(conversation.clone())
        .with_from(ChannelAccount::new(user.id.clone()))
        .with_recipient(bot.clone())
}

fn bot_activity(
    text: &str,
    conversation: &ConversationAccount,
    bot: &ChannelAccount,
    user: &ChannelAccount,
) -> Activity {
    Activity::message(CHANNEL_ID, text)
        .with_conversation(conversation.clone())
        .with_from(bot.clone())
        .with_recipient(user.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use batcher::BatcherConfig;
    use dispatcher::MemoryStreamClient;
    use std::time::Duration;

    fn test_logger(partitions: usize) -> (TranscriptLogger<MemoryStreamClient>, MemoryStreamClient)
    {
        let client = MemoryStreamClient::new(partitions);
        let config = BatcherConfig {
            batch_size: 50,
            batch_interval: Duration::from_secs(60),
        };
        (TranscriptLogger::from_client(client.clone(), config), client)
    }

    /// Size-triggered flushes run as detached tasks; wait for every
    /// enqueued event to land before asserting on deliveries.
    async fn wait_for_drain(
        client: &MemoryStreamClient,
        logger: &TranscriptLogger<MemoryStreamClient>,
    ) {
        for _ in 0..200 {
            if client.delivered_events() as u64 == logger.batcher().metrics().enqueued_count() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("pipeline did not drain within 1s");
    }

    #[tokio::test]
    async fn test_seeded_run_is_deterministic() {
        let config = SimulationConfig {
            users: 100,
            seed: Some(7),
            ..Default::default()
        };

        let (logger_a, client_a) = test_logger(2);
        let stats_a = run_simulation(&logger_a, &config).await.unwrap();
        wait_for_drain(&client_a, &logger_a).await;

        let (logger_b, client_b) = test_logger(2);
        let stats_b = run_simulation(&logger_b, &config).await.unwrap();
        wait_for_drain(&client_b, &logger_b).await;

        assert_eq!(stats_a.user_turns, stats_b.user_turns);
        assert_eq!(stats_a.abandoned_dialogs, stats_b.abandoned_dialogs);
        assert_eq!(client_a.delivered_events(), client_b.delivered_events());
    }

    #[tokio::test]
    async fn test_untracked_events_never_delivered() {
        let config = SimulationConfig {
            users: 100,
            seed: Some(1),
            ..Default::default()
        };

        let (logger, client) = test_logger(2);
        let stats = run_simulation(&logger, &config).await.unwrap();
        wait_for_drain(&client, &logger).await;

        assert!(stats.untracked_events > 0);
        for batch in client.batches() {
            for event in &batch.events {
                assert!(event.transcript.conversation.is_some());
            }
        }

        // everything eligible was drained by the final flush
        let eligible = logger.batcher().metrics().enqueued_count();
        assert_eq!(client.delivered_events() as u64, eligible);
        assert_eq!(
            logger.batcher().metrics().skipped_count(),
            stats.untracked_events
        );
    }
}
