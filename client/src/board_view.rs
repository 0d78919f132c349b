use common::proto;

fn symbol(mark: proto::Mark) -> char {
    match mark {
        proto::Mark::Cross => 'X',
        proto::Mark::Nought => 'O',
        proto::Mark::None => '.',
    }
}

pub fn render(game: &proto::Game) -> String {
    let mut cells = ['.'; 9];
    for mv in &game.moves {
        let index = usize::try_from(mv.cell).ok().and_then(|cell| cell.checked_sub(1));
        if let Some(slot) = index.and_then(|i| cells.get_mut(i)) {
            *slot = symbol(mv.mark());
        }
    }

    let mut lines: Vec<String> = cells
        .chunks(3)
        .map(|row| row.iter().map(char::to_string).collect::<Vec<_>>().join(" "))
        .collect();

    let status = if !game.is_finished {
        format!("{} to move", symbol(game.turn()))
    } else if game.winner() == proto::Mark::None {
        "Draw".to_string()
    } else {
        format!("{} wins", symbol(game.winner()))
    };
    lines.push(status);
    lines.join("\n")
}
