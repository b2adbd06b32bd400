//! # Integration Tests
//!
//! End-to-end tests over the full relay pipeline:
//! middleware -> batcher -> partition router -> stream client.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // smoke-check the contracts surface
        let partition = contracts::PartitionId::from_index(0);
        assert_eq!(partition.as_str(), "0");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use batcher::BatcherConfig;
    use contracts::{
        Activity, ActivityType, ChannelAccount, ConversationAccount, ConversationReference, Role,
    };
    use dispatcher::MemoryStreamClient;
    use interceptor::{SendResponse, TranscriptLogger};
    use tokio::time::sleep;

    fn pipeline(
        batch_size: usize,
        interval: Duration,
        partitions: usize,
    ) -> (TranscriptLogger<MemoryStreamClient>, MemoryStreamClient) {
        let client = MemoryStreamClient::new(partitions);
        let config = BatcherConfig {
            batch_size,
            batch_interval: interval,
        };
        (
            TranscriptLogger::from_client(client.clone(), config),
            client,
        )
    }

    fn user_message(text: &str, conversation: &str) -> Activity {
        Activity::message("emulator", text)
            .with_conversation(ConversationAccount::new(conversation))
            .with_from(ChannelAccount::new("user-1"))
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not met within 1s");
    }

    /// Three back-to-back turns at batch_size=3 produce exactly one
    /// immediate flush carrying all three records, in order, to
    /// partition 0 - and no timer remains scheduled afterwards.
    #[tokio::test]
    async fn test_size_threshold_flushes_once_to_partition_zero() {
        let (logger, client) = pipeline(3, Duration::from_secs(5), 4);

        for text in ["first", "second", "third"] {
            let mut activity = user_message(text, "conv-a");
            logger
                .on_turn(Some(&mut activity), || async { Ok(()) })
                .await
                .unwrap();
        }

        wait_until(|| client.batch_count() == 1).await;

        let batches = client.batches();
        assert_eq!(batches[0].partition.as_str(), "0");
        let texts: Vec<_> = batches[0]
            .events
            .iter()
            .map(|e| e.message.clone().unwrap())
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);

        // nothing else fires: the size flush cancelled the timer
        sleep(Duration::from_millis(100)).await;
        assert_eq!(client.batch_count(), 1);
    }

    /// Two buffered records at batch_size=5 are flushed by the timer
    /// once the interval elapses; the buffer ends empty.
    #[tokio::test]
    async fn test_timer_flush_delivers_partial_batch() {
        let (logger, client) = pipeline(5, Duration::from_millis(80), 4);

        for text in ["one", "two"] {
            let mut activity = user_message(text, "conv-b");
            logger
                .on_turn(Some(&mut activity), || async { Ok(()) })
                .await
                .unwrap();
        }

        assert_eq!(client.batch_count(), 0);
        wait_until(|| client.batch_count() == 1).await;

        let batches = client.batches();
        assert_eq!(batches[0].partition.as_str(), "0");
        assert_eq!(batches[0].events.len(), 2);
        assert_eq!(logger.batcher().buffered_len(), 0);
        assert_eq!(logger.batcher().metrics().timer_flushes(), 1);
    }

    /// An activity without a conversation never appears in any
    /// transmitted batch, end to end.
    #[tokio::test]
    async fn test_conversationless_activity_excluded() {
        let (logger, client) = pipeline(5, Duration::from_secs(5), 2);

        let mut tracked = user_message("kept", "conv-c");
        logger
            .on_turn(Some(&mut tracked), || async { Ok(()) })
            .await
            .unwrap();

        let mut loose = Activity::message("emulator", "dropped");
        logger
            .on_turn(Some(&mut loose), || async { Ok(()) })
            .await
            .unwrap();

        logger.batcher().flush().await.unwrap();

        let delivered: Vec<_> = client
            .batches()
            .iter()
            .flat_map(|b| b.events.iter())
            .map(|e| e.message.clone().unwrap())
            .collect();
        assert_eq!(delivered, ["kept"]);
        assert_eq!(logger.batcher().metrics().skipped_count(), 1);
    }

    /// Consecutive flushes cycle through every partition, starting
    /// from partition 0, before repeating.
    #[tokio::test]
    async fn test_flushes_cycle_all_partitions() {
        let (logger, client) = pipeline(10, Duration::from_secs(5), 3);

        for round in 0..6 {
            let mut activity = user_message(&format!("round-{round}"), "conv-d");
            logger
                .on_turn(Some(&mut activity), || async { Ok(()) })
                .await
                .unwrap();
            logger.batcher().flush().await.unwrap();
        }

        let order: Vec<_> = client
            .batches()
            .iter()
            .map(|b| b.partition.as_str().to_string())
            .collect();
        assert_eq!(order, ["0", "1", "2", "0", "1", "2"]);
    }

    /// A full turn lifecycle: incoming, outgoing, update, delete -
    /// each interception produces one record of the right type.
    #[tokio::test]
    async fn test_full_turn_lifecycle() {
        let (logger, client) = pipeline(50, Duration::from_secs(5), 2);

        let mut incoming = user_message("book a table", "conv-e");
        logger
            .on_turn(Some(&mut incoming), || async { Ok(()) })
            .await
            .unwrap();

        let reply = Activity::message("emulator", "for how many?")
            .with_conversation(ConversationAccount::new("conv-e"))
            .with_from(ChannelAccount::new("bot").with_role(Role::Bot));
        let responses = logger
            .on_send_activities(&[reply.clone()], || async {
                Ok(vec![SendResponse { id: Some("r1".into()) }])
            })
            .await
            .unwrap();
        assert_eq!(responses.len(), 1);

        logger
            .on_update_activity(&reply, || async { Ok(SendResponse::default()) })
            .await
            .unwrap();

        let reference = ConversationReference::from_activity(&reply).unwrap();
        logger
            .on_delete_activity(&reference, || async { Ok(()) })
            .await
            .unwrap();

        logger.batcher().flush().await.unwrap();

        let batches = client.batches();
        assert_eq!(batches.len(), 1);
        let types: Vec<_> = batches[0]
            .events
            .iter()
            .map(|e| e.activity_type)
            .collect();
        assert_eq!(
            types,
            [
                ActivityType::Message,
                ActivityType::Message,
                ActivityType::MessageUpdate,
                ActivityType::MessageDelete,
            ]
        );

        // the incoming record was normalized before capture
        let first = &batches[0].events[0].transcript;
        assert_eq!(first.from.as_ref().unwrap().role, Some(Role::User));
    }

    /// Config file drives the pipeline: batch policy comes from TOML,
    /// topology from the stream section.
    #[tokio::test]
    async fn test_config_driven_pipeline() {
        let toml = r#"
[connection]
endpoint = "127.0.0.1:9100"
entity_path = "transcripts"

[batching]
batch_size = 2
batch_interval_ms = 60000

[stream]
partition_count = 2
"#;
        let config =
            config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let client = MemoryStreamClient::new(config.stream.partition_count);
        let logger = TranscriptLogger::from_client(
            client.clone(),
            BatcherConfig::from(&config.batching),
        );

        for text in ["a", "b"] {
            let mut activity = user_message(text, "conv-f");
            logger
                .on_turn(Some(&mut activity), || async { Ok(()) })
                .await
                .unwrap();
        }

        // batch_size=2 from the file triggered the flush
        wait_until(|| client.batch_count() == 1).await;
        assert_eq!(client.batches()[0].events.len(), 2);
    }
}
