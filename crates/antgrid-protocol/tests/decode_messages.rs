//! Decoding of representative server frames, end to end.

use antgrid_core::{Ant, AntId, CellCoord, CellKey, Color, Direction, PlayerId, Rule, TurnDirection};
use antgrid_protocol::{
    GameStateSnapshotPayload, InboundMessage, OutboundMessage, PlaceAntAckPayload, decode_inbound,
};
use pretty_assertions::assert_eq;

const SNAPSHOT: &str = r##"{
  "type": "GAME_STATE_SNAPSHOT",
  "payload": {
    "cells": {
      "0,0": { "1,1": "#ff0000", "2,1": "#ff0000" },
      "1,0": { "40,3": "#00ff00" }
    },
    "ants": [
      {
        "id": "ant-1",
        "position": { "x": 1, "y": 1 },
        "direction": "UP",
        "color": "#ff0000",
        "rules": [
          { "currentColor": "#FFFFFF", "newColor": "#ff0000", "turnDirection": "LEFT" },
          { "currentColor": "#ff0000", "newColor": "#FFFFFF", "turnDirection": "RIGHT" }
        ]
      }
    ],
    "width": 64,
    "height": 48
  }
}"##;

#[test]
fn snapshot_with_config() {
    let InboundMessage::GameStateSnapshot(GameStateSnapshotPayload {
        cells,
        ants,
        width,
        height,
    }) = decode_inbound(SNAPSHOT).unwrap()
    else {
        panic!("expected a snapshot");
    };

    let flat = cells.flatten();
    assert_eq!(flat.len(), 3);
    assert_eq!(flat[&CellKey::new(40, 3)], Color::from("#00ff00"));
    assert_eq!((width, height), (Some(64), Some(48)));
    assert_eq!(
        ants,
        Some(vec![Ant {
            id: AntId::from("ant-1"),
            position: CellCoord::new(1, 1),
            direction: Direction::Up,
            color: Color::from("#ff0000"),
            rules: Rule::default_set(&Color::from("#ff0000")),
        }])
    );
}

#[test]
fn place_ant_ack_without_owner() {
    let frame = r##"{"type":"PLACE_ANT","payload":{
        "cells":{},
        "ants":[{"id":"a9","position":{"x":0,"y":4},"direction":"LEFT","color":"#123456"}]
    }}"##;
    let InboundMessage::PlaceAnt(PlaceAntAckPayload {
        player_id, ants, ..
    }) = decode_inbound(frame).unwrap()
    else {
        panic!("expected PLACE_ANT");
    };
    assert_eq!(player_id, None);
    assert_eq!(ants[0].rules, Vec::<Rule>::new());
    assert_eq!(ants[0].direction, Direction::Left);
}

#[test]
fn place_ant_ack_with_owner() {
    let frame = r##"{"type":"PLACE_ANT","payload":{"playerId":"p2","cells":{},"ants":[]}}"##;
    let InboundMessage::PlaceAnt(ack) = decode_inbound(frame).unwrap() else {
        panic!("expected PLACE_ANT");
    };
    assert_eq!(ack.player_id, Some(PlayerId::from("p2")));
}

#[test]
fn player_leave_carries_cleanup_diff() {
    let frame = r##"{"type":"PLAYER_LEAVE","payload":{"playerId":"p1","cells":{"0,0":{"3,3":"#FFFFFF"}}}}"##;
    let InboundMessage::PlayerLeave(leave) = decode_inbound(frame).unwrap() else {
        panic!("expected PLAYER_LEAVE");
    };
    assert_eq!(leave.player_id, PlayerId::from("p1"));
    assert_eq!(leave.cells.flatten()[&CellKey::new(3, 3)], Color::white());
    assert!(leave.ants.is_empty());
}

#[test]
fn error_message_text() {
    let msg = decode_inbound(r#"{"type":"ERROR","payload":{"message":"Cell occupied"}}"#).unwrap();
    let InboundMessage::Error(err) = msg else {
        panic!("expected ERROR");
    };
    assert_eq!(err.message, "Cell occupied");
}

#[test]
fn rule_change_request_round_trips_through_text() {
    let rules = vec![
        Rule::new("#FFFFFF", "#0000ff", TurnDirection::Right),
        Rule::new("#0000ff", "#FFFFFF", TurnDirection::Left),
    ];
    let text = OutboundMessage::RuleChange {
        rules: rules.clone(),
    }
    .encode()
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "RULE_CHANGE");
    let decoded: Vec<Rule> = serde_json::from_value(value["payload"]["rules"].clone()).unwrap();
    assert_eq!(decoded, rules);
}
