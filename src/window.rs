use crate::{Board, Pos2};

/// A `width` x `height` view of a board starting at `origin`, wrapping around its edges
pub struct BoardWindow<'a> {
    board: &'a Board,
    origin: Pos2,
    width: usize,
    height: usize,
}
impl<'a> BoardWindow<'a> {
    pub fn new(board: &'a Board, origin: Pos2, width: usize, height: usize) -> Self {
        Self {
            board,
            origin,
            width,
            height,
        }
    }

    /// Positions of alive cells inside the window, relative to its top-left
    pub fn iter(&self) -> impl Iterator<Item = Pos2> {
        let (nrows, ncols) = (self.board.nrows(), self.board.ncols());
        let (width, height) = (self.width as i32, self.height as i32);
        let height = if nrows > 0 && ncols > 0 { height } else { 0 };
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| Pos2 { x, y }))
            .filter(move |&screen| {
                let (row, col) = (self.origin + screen).wrap(nrows, ncols);
                self.board.get(row, col)
            })
    }
}

impl std::fmt::Display for BoardWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last = Pos2 { x: -1, y: 0 };
        for alive in self.iter() {
            // newlines to reach the row, then padding to reach the column
            let lines = alive.y - last.y;
            let padding = match lines {
                0 => alive.x - last.x - 1,
                _ => alive.x,
            };
            write!(
                f,
                "{0:\n<1$}{0: <2$}█",
                "", lines as usize, padding as usize
            )?;
            last = alive;
        }
        Ok(())
    }
}
