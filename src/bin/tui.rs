use clap::Parser;
use cursive::traits::*;
use cursive::view::Margins;
use cursive::views::*;
use cursive::{Cursive, CursiveExt};
use minesweeper::*;
use std::io;
use std::num::NonZeroUsize;
use tracing_subscriber::EnvFilter;

/// Play Minesweeper in a terminal UI.
#[derive(Parser, Debug)]
#[command(name = "tui", version)]
struct Args {
    /// Number of finished games to remember
    #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY)]
    history: NonZeroUsize,
    /// Seed for mine placement and hints
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging would draw over the screen, so it stays off unless asked for
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(io::stderr)
        .init();

    let mut siv = Cursive::new();
    siv.set_user_data(Session::new(args.history, args.seed));

    // Add global callbacks
    siv.add_global_callback('q', |s| s.quit());
    // Create the main menu dialog
    menu(&mut siv);

    // Start the event loop
    siv.run();
    Ok(())
}

fn menu(siv: &mut Cursive) {
    siv.add_layer(
        Dialog::new()
            .title("Minesweeper")
            .padding(Margins::lrtb(2, 2, 1, 1))
            .content(
                LinearLayout::vertical()
                    .child(Button::new("Start", difficulty))
                    .child(Button::new("Last games", history))
                    .child(Button::new("Quit", Cursive::quit)),
            ),
    );
}

fn difficulty(siv: &mut Cursive) {
    let mut select = SelectView::<Difficulty>::new().on_submit(|s, difficulty: &Difficulty| {
        s.pop_layer();
        nickname(s, *difficulty);
    });
    for difficulty in Difficulty::ALL {
        let (rows, cols, mines) = difficulty.dimensions();
        select.add_item(format!("{difficulty} ({rows}x{cols}, {mines} mines)"), difficulty);
    }

    siv.add_layer(
        Dialog::new()
            .title("Difficulty")
            .content(select)
            .button("Back", |s| {
                s.pop_layer();
            }),
    );
}

fn nickname(siv: &mut Cursive, difficulty: Difficulty) {
    siv.add_layer(
        Dialog::new()
            .title("Nickname")
            .content(
                EditView::new()
                    .on_submit(move |s, name| start(s, difficulty, name))
                    .with_name("nickname")
                    .fixed_width(24),
            )
            .button("Play", move |s| {
                let name = s
                    .call_on_name("nickname", |view: &mut EditView| view.get_content())
                    .unwrap_or_default();
                start(s, difficulty, &name);
            }),
    );
}

fn start(siv: &mut Cursive, difficulty: Difficulty, name: &str) {
    siv.pop_layer();
    let Some(board) = siv.with_user_data(|session: &mut Session| {
        session.start(difficulty, name).board().to_string()
    }) else {
        return;
    };

    siv.add_layer(
        Dialog::new()
            .title(format!("Minesweeper: {difficulty}"))
            .content(
                LinearLayout::vertical()
                    .child(TextView::new(screen(&board)).with_name("board"))
                    .child(TextView::new("Type /help to see the commands").with_name("status"))
                    .child(EditView::new().on_submit(submit).with_name("command")),
            )
            .button("Menu", |s| {
                s.pop_layer();
            }),
    );
}

fn submit(siv: &mut Cursive, line: &str) {
    match line.parse::<Command>() {
        Ok(Command::Quit) => siv.add_layer(
            Dialog::text("Are you sure you want to quit?")
                .button("Yes", |s| {
                    s.pop_layer();
                    play(s, Command::Quit);
                })
                .button("No", |s| {
                    s.pop_layer();
                }),
        ),
        Ok(command) => play(siv, command),
        Err(err) => status(siv, err.to_string()),
    }
    siv.call_on_name("command", |view: &mut EditView| view.set_content(""));
}

fn play(siv: &mut Cursive, command: Command) {
    let Some((result, board)) = siv.with_user_data(|session: &mut Session| {
        let result = session.execute(command);
        let board = session.game().map(|game| game.board().to_string());
        (result, board)
    }) else {
        return;
    };

    let turn = match result {
        Ok(turn) => turn,
        Err(err) => return status(siv, err.to_string()),
    };

    if turn.reply == Reply::Quit {
        siv.pop_layer();
        return;
    }

    if let Some(board) = board {
        siv.call_on_name("board", |view: &mut TextView| view.set_content(screen(&board)));
    }
    let mut message = turn.reply.to_string();
    match turn.status {
        GameStatus::Won => message.push_str("\nCongratulations, you won! Game saved."),
        GameStatus::Lost => message.push_str("\nGame lost. Game saved."),
        GameStatus::Playing => {}
    }
    status(siv, message);

    if turn.game_over() {
        siv.call_on_name("command", |view: &mut EditView| view.disable());
    }
}

fn status(siv: &mut Cursive, message: String) {
    siv.call_on_name("status", |view: &mut TextView| view.set_content(message));
}

fn history(siv: &mut Cursive) {
    let Some(text) = siv.with_user_data(|session: &mut Session| {
        let history = session.history();
        if history.is_empty() {
            return String::from("No games recorded yet.");
        }
        history
            .iter()
            .map(|record| screen(&record.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }) else {
        return;
    };

    siv.add_layer(
        Dialog::around(TextView::new(text).scrollable())
            .title("Last games")
            .button("Back", |s| {
                s.pop_layer();
            }),
    );
}

/// Tabs don't render in a text view, so expand them.
fn screen(text: &str) -> String {
    text.replace('\t', "    ")
}
