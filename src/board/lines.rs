use smallvec::SmallVec;

use crate::types::Position;

/// The four winning axes; the opposite directions are scanned by negating.
pub(crate) const AXES: [(i16, i16); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Grid dimensions plus the run length that completes a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Geometry {
    pub cols: u8,
    pub rows: u8,
    pub win_len: u8,
}

impl Geometry {
    #[inline]
    pub(crate) fn in_bounds(self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && x < self.cols as i16 && y < self.rows as i16
    }

    /// Visits every in-bounds window of `win_len` consecutive cells that
    /// contains `pos`.
    pub(crate) fn windows_through(self, pos: Position, mut f: impl FnMut(&[Position])) {
        let len = self.win_len as i16;
        let mut window: SmallVec<[Position; 12]> = SmallVec::new();
        for (dx, dy) in AXES {
            for shift in (1 - len)..=0 {
                window.clear();
                for i in 0..len {
                    let x = pos.x as i16 + (shift + i) * dx;
                    let y = pos.y as i16 + (shift + i) * dy;
                    if !self.in_bounds(x, y) {
                        break;
                    }
                    window.push(Position::new(x as u8, y as u8));
                }
                if window.len() == len as usize {
                    f(&window);
                }
            }
        }
    }

    /// Visits every in-bounds window on the board exactly once.
    pub(crate) fn each_window(self, mut f: impl FnMut(&[Position])) {
        let len = self.win_len as i16;
        let mut window: SmallVec<[Position; 12]> = SmallVec::new();
        for y in 0..self.rows as i16 {
            for x in 0..self.cols as i16 {
                for (dx, dy) in AXES {
                    if !self.in_bounds(x + (len - 1) * dx, y + (len - 1) * dy) {
                        continue;
                    }
                    window.clear();
                    for i in 0..len {
                        window.push(Position::new((x + i * dx) as u8, (y + i * dy) as u8));
                    }
                    f(&window);
                }
            }
        }
    }

    /// The placed cell plus every cell sharing at least one window with it,
    /// in row-major order. These are exactly the cells whose heuristic
    /// score a move at `pos` can change.
    pub(crate) fn affected(self, pos: Position) -> SmallVec<[Position; 24]> {
        let mut out: SmallVec<[Position; 24]> = SmallVec::new();
        out.push(pos);
        self.windows_through(pos, |w| out.extend_from_slice(w));
        out.sort_unstable_by_key(|p| (p.y, p.x));
        out.dedup();
        out
    }
}
