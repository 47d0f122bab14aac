use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyModifiers},
    execute, queue, terminal,
};
use std::io::{self, Write};
use torlife::{Board, BoardWindow, Pos2};

pub enum ConsoleCommand {
    Exit,
    Handled,
}

pub struct ConsoleRender {
    origin: Pos2,
    report: String,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;
        Ok(Self {
            origin: Pos2::default(),
            report: String::new(),
        })
    }

    pub fn render(&self, board: &Board) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        // last row is kept for the report
        let height = rows.saturating_sub(1);
        let window = BoardWindow::new(board, self.origin, cols as usize, height as usize);

        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        for cell in window.iter() {
            queue!(stdout, cursor::MoveTo(cell.x as u16, cell.y as u16))?;
            stdout.write_all("█".as_bytes())?;
        }

        queue!(stdout, cursor::MoveTo(0, height))?;
        stdout.write_all(self.report.as_bytes())?;
        stdout.flush()
    }

    pub fn poll_events(&mut self) -> io::Result<Option<ConsoleCommand>> {
        if !event::poll(std::time::Duration::from_secs(0))? {
            return Ok(None);
        }

        let command = match event::read()? {
            // CTRL+C
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => ConsoleCommand::Exit,
            // arrows scroll the view, wrapping around the torus
            event::Event::Key(KeyEvent { code, .. }) => {
                match code {
                    KeyCode::Up => self.origin.y -= 1,
                    KeyCode::Down => self.origin.y += 1,
                    KeyCode::Left => self.origin.x -= 1,
                    KeyCode::Right => self.origin.x += 1,
                    _ => {}
                }
                ConsoleCommand::Handled
            }
            _ => ConsoleCommand::Handled,
        };
        Ok(Some(command))
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show);
    }
}
