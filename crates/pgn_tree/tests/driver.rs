use pgn_tree::{parse, Game, Node};

fn expected<T: std::str::FromStr>(game: &Game, key: &str) -> Option<T>
where
    T::Err: std::fmt::Debug,
{
    game.tag(key).map(|value| {
        value
            .parse()
            .unwrap_or_else(|err| panic!("invalid value for {key}: {value:?} ({err:?})"))
    })
}

#[test]
fn tester() -> std::io::Result<()> {
    for entry in std::fs::read_dir("./tests/cases/")? {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let content = std::fs::read_to_string(entry.path())?;
        let games = parse(&content).unwrap();
        assert!(!games.is_empty(), "{:?} holds no game", entry.path());

        for game in &games {
            let event = game.tag("Event").unwrap_or("?");

            if let Some(fen) = expected::<String>(game, "ExpectedFen") {
                let last = game.mainline().last().unwrap();
                assert_eq!(last.position_after, fen, "last position of {event}");

                // the position text of every node is a valid board
                for node in game.mainline() {
                    node.position_after
                        .parse::<pgn_tree::Board>()
                        .unwrap_or_else(|err| panic!("{event}, {}: {err}", node.san));
                }
            }
            if let Some(lines) = expected::<usize>(game, "ExpectedRootLines") {
                assert_eq!(game.nodes.len(), lines, "root lines of {event}");
            }
            if let Some(size) = expected::<usize>(game, "ExpectedNodes") {
                assert_eq!(
                    game.nodes.iter().map(Node::size).sum::<usize>(),
                    size,
                    "nodes of {event}"
                );
            }
        }

        // parsing again gives the same trees
        assert_eq!(parse(&content).unwrap(), games);
    }

    Ok(())
}
