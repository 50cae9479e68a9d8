//! Wire message in, reassembled groups out

use header_mapping::WireMessage;
use integration_config::IntegrationConfig;
use integration_e2e_tests::fixtures::{order_lines, SAMPLE_CONFIG};
use integration_e2e_tests::{GroupReassembler, Pipeline, DELIMITER_HEADER};
use message::{Message, MessageBuilder, MessageId, Value};
use message_store::BoundedMessageStore;
use splitter::SplitError;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn sample_config() -> IntegrationConfig {
    IntegrationConfig::from_toml_str(SAMPLE_CONFIG).unwrap()
}

#[tokio::test]
async fn wire_message_is_split_and_reassembled() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();

    let parts = pipeline.ingest(&order_lines("foo.bar", "acme")).await.unwrap();
    assert_eq!(parts, 2);

    let groups = pipeline.collect_groups().unwrap();
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    let payloads: Vec<&str> = group.iter().map(|m| m.payload().as_str()).collect();
    assert_eq!(payloads, vec!["foo", "bar"]);

    let correlation = group[0].headers().correlation_id().unwrap();
    for (i, message) in group.iter().enumerate() {
        assert_eq!(message.headers().correlation_id(), Some(correlation));
        assert_eq!(message.headers().sequence_number(), Some(i as u32 + 1));
        assert_eq!(message.headers().sequence_size(), Some(2));
        // copy_inbound_headers carries the wire property through
        assert_eq!(message.headers().get("tenant"), Some(&Value::from("acme")));
    }
    assert_eq!(pipeline.reassembler().pending(), 0);
}

#[tokio::test]
async fn outbound_wire_messages_carry_sequence_properties() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();
    pipeline.ingest(&order_lines("a.b.c", "acme")).await.unwrap();
    let group = pipeline.collect_groups().unwrap().remove(0);

    let wire = pipeline.to_wire(&group).unwrap();
    assert_eq!(wire.len(), 3);
    assert_eq!(wire[2].body, b"c");
    assert_eq!(wire[2].property("sequenceNumber"), Some("3"));
    assert_eq!(wire[2].property("sequenceSize"), Some("3"));
    assert_eq!(
        wire[0].correlation_id,
        group[0].headers().correlation_id().map(|id| id.to_string())
    );
    assert_eq!(wire[0].property("id"), None);
}

#[tokio::test]
async fn per_message_delimiter_header() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();
    let wire = WireMessage::new("x|y.z").with_property(DELIMITER_HEADER, "|");

    assert_eq!(pipeline.ingest(&wire).await.unwrap(), 2);
    let group = pipeline.collect_groups().unwrap().remove(0);
    assert_eq!(group[1].payload(), "y.z");
}

#[tokio::test]
async fn empty_payload_dispatches_nothing() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();
    assert_eq!(pipeline.ingest(&WireMessage::new("...")).await.unwrap(), 0);
    assert!(pipeline.collect_groups().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_delimiter_header_is_production_failure() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();
    // "7" parses as an integer header, not the text the producer expects
    let wire = WireMessage::new("a.b").with_property(DELIMITER_HEADER, "7");

    let err = pipeline.ingest(&wire).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SplitError>(),
        Some(SplitError::ProductionFailed(_))
    ));
    assert!(pipeline.receiver_mut().try_recv().is_none());
}

#[tokio::test]
async fn interleaved_groups_complete_independently() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 16).unwrap();
    pipeline.ingest(&order_lines("1.2.3", "a")).await.unwrap();
    pipeline.ingest(&order_lines("4.5", "b")).await.unwrap();

    let groups = pipeline.collect_groups().unwrap();
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 2]);
    assert_ne!(
        groups[0][0].headers().correlation_id(),
        groups[1][0].headers().correlation_id()
    );
}

#[tokio::test]
async fn line_larger_than_queue_is_rejected_not_stalled() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 2).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        pipeline.ingest(&order_lines("a.b.c", "acme")),
    )
    .await
    .expect("ingest must not block on a full queue");

    let err = result.unwrap_err();
    match err.downcast_ref::<SplitError>() {
        Some(SplitError::DispatchFailed {
            sequence_number,
            sequence_size,
            ..
        }) => {
            assert_eq!(*sequence_number, 3);
            assert_eq!(*sequence_size, 3);
        }
        other => panic!("expected DispatchFailed, got {:?}", other),
    }

    // the two parts that fit were discarded with their line
    assert!(pipeline.collect_groups().unwrap().is_empty());
    assert_eq!(pipeline.reassembler().pending(), 0);

    assert_eq!(pipeline.ingest(&order_lines("x.y", "acme")).await.unwrap(), 2);
    let groups = pipeline.collect_groups().unwrap();
    assert_eq!(groups.len(), 1);
    let payloads: Vec<&str> = groups[0].iter().map(|m| m.payload().as_str()).collect();
    assert_eq!(payloads, vec!["x", "y"]);
}

#[tokio::test]
async fn rejected_line_keeps_earlier_uncollected_groups() {
    let mut pipeline = Pipeline::from_config(&sample_config(), ".", 3).unwrap();
    pipeline.ingest(&order_lines("p.q", "a")).await.unwrap();

    // one slot left: "r" fits, "s" times out
    assert!(pipeline.ingest(&order_lines("r.s", "b")).await.is_err());

    let groups = pipeline.collect_groups().unwrap();
    assert_eq!(groups.len(), 1);
    let payloads: Vec<&str> = groups[0].iter().map(|m| m.payload().as_str()).collect();
    assert_eq!(payloads, vec!["p", "q"]);
    assert_eq!(pipeline.reassembler().pending(), 0);
}

#[test]
fn reassembly_out_of_order_and_eviction() {
    let correlation = MessageId::new();
    let part = |n: u32, size: u32| -> Message<String> {
        MessageBuilder::with_payload(format!("part-{n}"))
            .correlation_id(correlation)
            .sequence_number(n)
            .sequence_size(size)
            .build()
            .unwrap()
    };

    let reassembler = GroupReassembler::new(BoundedMessageStore::new(4).unwrap());
    assert!(reassembler.accept(part(3, 3)).unwrap().is_none());
    assert!(reassembler.accept(part(1, 3)).unwrap().is_none());
    let group = reassembler.accept(part(2, 3)).unwrap().unwrap();
    let payloads: Vec<&str> = group.iter().map(|m| m.payload().as_str()).collect();
    assert_eq!(payloads, vec!["part-1", "part-2", "part-3"]);

    // capacity 2: a six-part group can never be held at once
    let small: GroupReassembler<String> = GroupReassembler::new(BoundedMessageStore::new(2).unwrap());
    for n in 1..=6 {
        assert!(small.accept(part(n, 6)).unwrap().is_none());
    }
    assert_eq!(small.pending(), 2);
    assert_eq!(small.stats().evictions, 4);

    let unsequenced = small.accept(Message::new("loose".to_string()));
    assert!(unsequenced.is_err());
}

#[test]
fn concurrent_accept_hands_out_each_group_once() {
    const GROUPS: usize = 200;
    const SIZE: u32 = 4;

    let groups: Vec<Vec<Message<String>>> = (0..GROUPS)
        .map(|_| {
            let correlation = MessageId::new();
            (1..=SIZE)
                .map(|n| {
                    MessageBuilder::with_payload(format!("part-{n}"))
                        .correlation_id(correlation)
                        .sequence_number(n)
                        .sequence_size(SIZE)
                        .build()
                        .unwrap()
                })
                .collect()
        })
        .collect();

    let reassembler = Arc::new(GroupReassembler::new(
        BoundedMessageStore::new(GROUPS * SIZE as usize).unwrap(),
    ));

    // worker n feeds sequence number n of every group
    let handles: Vec<_> = (0..SIZE as usize)
        .map(|n| {
            let reassembler = Arc::clone(&reassembler);
            let parts: Vec<Message<String>> = groups.iter().map(|g| g[n].clone()).collect();
            std::thread::spawn(move || {
                parts
                    .into_iter()
                    .filter_map(|part| reassembler.accept(part).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let completed: Vec<Vec<Message<String>>> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(completed.len(), GROUPS);
    for group in &completed {
        assert_eq!(group.len(), SIZE as usize);
        let numbers: Vec<u32> = group
            .iter()
            .map(|m| m.headers().sequence_number().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
    assert_eq!(reassembler.pending(), 0);
}

#[tokio::test]
async fn pipeline_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conduit.toml");
    fs::write(&path, "[store]\ncapacity = 3\n\n[splitter]\nname = \"file\"\n").unwrap();

    let config = IntegrationConfig::load(Some(&path), None).unwrap();
    let mut pipeline = Pipeline::from_config(&config, ",", 8).unwrap();
    assert_eq!(pipeline.splitter().name(), "file");

    // four parts cannot all be buffered in a store of three
    pipeline.ingest(&WireMessage::new("a,b,c,d")).await.unwrap();
    assert!(pipeline.collect_groups().unwrap().is_empty());
    assert_eq!(pipeline.reassembler().pending(), 3);
}
