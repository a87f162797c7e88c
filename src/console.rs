//! Line-oriented front-end: menus, prompts and the in-game command loop.

use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::command::Command;
use crate::config::Difficulty;
use crate::session::{GameStatus, Session, Turn};

/// Drives a [`Session`] from lines of text.
pub struct Console<R, W> {
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Console<R, W> {
        Console {
            session,
            input,
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Give back the output, e.g. to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the player quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "#### MENU ####")?;
            writeln!(self.output, "1. Start game")?;
            writeln!(
                self.output,
                "2. Show last {} games",
                self.session.history().capacity()
            )?;
            writeln!(self.output, "3. Quit")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            match choice.trim() {
                "1" => {
                    if !self.new_game()? {
                        return Ok(());
                    }
                }
                "2" => self.show_history()?,
                "3" => {
                    writeln!(self.output, "Thanks for playing Minesweeper!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    /// Choose a difficulty and nickname, then play.
    ///
    /// Returns `false` if input ended.
    fn new_game(&mut self) -> io::Result<bool> {
        let difficulty = loop {
            writeln!(self.output, "\n=== Choose a difficulty ===")?;
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, difficulty)?;
            }
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(false);
            };
            match choice.trim().parse().ok().and_then(Difficulty::from_choice) {
                Some(difficulty) => break difficulty,
                None => writeln!(
                    self.output,
                    "Invalid difficulty. Please choose a valid one."
                )?,
            }
        };

        let Some(nickname) = self.prompt("Enter a nickname: ")? else {
            return Ok(false);
        };
        let game = self.session.start(difficulty, &nickname);
        writeln!(self.output, "{}", game.board())?;

        self.play()
    }

    /// Read and run commands until the game ends.
    ///
    /// Returns `false` if input ended.
    fn play(&mut self) -> io::Result<bool> {
        loop {
            writeln!(self.output, "[Type /help to see the commands]")?;
            let Some(line) = self.prompt("Command > ")? else {
                return Ok(false);
            };
            writeln!(self.output)?;

            let command = match line.parse::<Command>() {
                Ok(Command::Quit) => {
                    let Some(answer) = self.prompt("Are you sure you want to quit? (y/n): ")?
                    else {
                        return Ok(false);
                    };
                    if !answer.trim().to_ascii_lowercase().starts_with('y') {
                        continue;
                    }
                    Command::Quit
                }
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };

            match self.session.execute(command) {
                Ok(turn) => {
                    self.show_turn(&turn)?;
                    if turn.game_over() {
                        return Ok(true);
                    }
                }
                Err(err) => {
                    debug!(%err, "command failed");
                    writeln!(self.output, "{err}")?;
                }
            }
        }
    }

    fn show_turn(&mut self, turn: &Turn) -> io::Result<()> {
        writeln!(self.output, "{}", turn.reply)?;
        if let Some(game) = self.session.game() {
            writeln!(self.output, "{}", game.board())?;
        }
        if turn.saved.is_some() {
            writeln!(self.output, "Game saved!")?;
        }
        match turn.status {
            GameStatus::Won => {
                writeln!(self.output, "Congratulations, you won!")?;
                writeln!(self.output, "Back to the main menu...")?;
            }
            GameStatus::Lost => writeln!(self.output, "Game lost. Back to the main menu...")?,
            GameStatus::Playing => {}
        }
        Ok(())
    }

    fn show_history(&mut self) -> io::Result<()> {
        let history = self.session.history();
        if history.is_empty() {
            writeln!(self.output, "No games recorded yet.")?;
            return Ok(());
        }

        writeln!(self.output, "=== LAST {} GAMES ===", history.capacity())?;
        for record in history.iter() {
            writeln!(self.output, "==========================================")?;
            writeln!(self.output, "{record}")?;
        }
        Ok(())
    }

    /// Print a prompt and read a line, or `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
