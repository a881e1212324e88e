//! Protocol tests - board sessions encoded as JSON lines

use tilepop::core::{BoardConfig, BoardController, Grid, Palette};
use tilepop::protocol::{parse_command, to_line, Command, EventBody, EventMessage, MessageEncoder};

#[test]
fn test_click_session_encodes_every_event() {
    let config = BoardConfig {
        palette: Palette::numbered(3).unwrap(),
        ..BoardConfig::default()
    };
    let mut board = BoardController::from_grid(config, Grid::parse("12\n00").unwrap()).unwrap();
    let mut encoder = MessageEncoder::new();

    let Some(Command::Click { x, y }) = parse_command("click 0 1").unwrap() else {
        panic!("expected a click command");
    };
    let outcome = board.on_cell_clicked(x, y).unwrap();
    board.resolve();

    let mut lines = vec![to_line(&encoder.click(x, y, outcome)).unwrap()];
    for event in board.take_events() {
        lines.push(to_line(&encoder.event(event)).unwrap());
    }
    lines.push(to_line(&encoder.observation(&board.snapshot())).unwrap());

    let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first["type"], "click");
    assert_eq!(first["size"], 2);

    let events: Vec<EventMessage> = lines[1..lines.len() - 1]
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events.iter().any(|m| m.body == EventBody::ScoreDelta { amount: 2 }));
    assert_eq!(
        events
            .iter()
            .filter(|m| matches!(m.body, EventBody::TileRemoved { .. }))
            .count(),
        2
    );

    // seq strictly increases across message kinds
    let seqs: Vec<u64> = lines
        .iter()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["seq"].as_u64().unwrap())
        .collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(encoder.seq(), *seqs.last().unwrap());

    let last: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
    assert_eq!(last["type"], "observation");
    assert_eq!(last["score"]["points"], 200);
    assert_eq!(last["phase"], "idle");
}
