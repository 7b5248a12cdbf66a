use ratatui::layout::Rect;

const MAX_CELL_WIDTH: u16 = 7;
const MAX_CELL_HEIGHT: u16 = 3;

/// Cell placement of an n×n board centred inside `area`. Shared by the
/// renderer and mouse hit-testing so both agree on where a cell is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    origin_x: u16,
    origin_y: u16,
    cell_width: u16,
    cell_height: u16,
    n: u16,
}

impl GridGeometry {
    pub fn new(area: Rect, grid_size: u32) -> Self {
        let n = u16::try_from(grid_size).unwrap_or(u16::MAX);
        if n == 0 {
            return Self {
                origin_x: area.x,
                origin_y: area.y,
                cell_width: 0,
                cell_height: 0,
                n,
            };
        }

        let cell_width = (area.width / n).min(MAX_CELL_WIDTH);
        let cell_height = (area.height / n).min(MAX_CELL_HEIGHT);
        let board_width = cell_width * n;
        let board_height = cell_height * n;

        Self {
            origin_x: area.x + (area.width - board_width) / 2,
            origin_y: area.y + (area.height - board_height) / 2,
            cell_width,
            cell_height,
            n,
        }
    }

    /// False when the area is too small to show a cell
    pub fn fits(&self) -> bool {
        self.cell_width > 0 && self.cell_height > 0
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u16 {
        self.cell_height
    }

    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        let n = self.n as usize;
        if !self.fits() || index >= n * n {
            return None;
        }
        let (row, col) = ((index / n) as u16, (index % n) as u16);
        Some(Rect::new(
            self.origin_x + col * self.cell_width,
            self.origin_y + row * self.cell_height,
            self.cell_width,
            self.cell_height,
        ))
    }

    /// The cell index under a terminal position, if any
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.fits() || column < self.origin_x || row < self.origin_y {
            return None;
        }
        let col = (column - self.origin_x) / self.cell_width;
        let r = (row - self.origin_y) / self.cell_height;
        if col >= self.n || r >= self.n {
            return None;
        }
        Some(r as usize * self.n as usize + col as usize)
    }
}
