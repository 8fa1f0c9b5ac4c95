//! Level layouts and loaders
//!
//! Level text: a `COLSxROWS` header line, then one line per grid row with one
//! char per cell. `1`-`9` is a block of that durability; space, `.` and `0`
//! are empty cells. Cells are sized to tile the whole arena.

use std::future::{self, Future};
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use glam::Vec2;

use crate::error::LoadError;
use crate::sim::Level;

/// Pending level load; dropping it cancels the load
pub type LevelFuture = Pin<Box<dyn Future<Output = Result<Level, LoadError>>>>;

/// Produces levels by index
pub trait LevelLoader {
    fn load(&mut self, index: usize) -> LevelFuture;
}

/// Parse level text into a level sized to `arena_size`
pub fn parse_level(text: &str, arena_size: Vec2) -> Result<Level, LoadError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| LoadError::Malformed {
        line: 1,
        reason: "empty level".into(),
    })?;
    let (cols, rows) = parse_header(header)?;

    let cell = Vec2::new(arena_size.x / cols as f32, arena_size.y / rows as f32);
    let mut level = Level::new(arena_size);

    for (y, row) in lines.enumerate() {
        let line = y + 2;
        for (x, ch) in row.chars().enumerate() {
            let durability = match ch {
                ' ' | '.' | '0' => continue,
                '1'..='9' => ch as i32 - '0' as i32,
                other => {
                    return Err(LoadError::Malformed {
                        line,
                        reason: format!("unexpected cell {other:?}"),
                    });
                }
            };
            if x >= cols || y >= rows {
                return Err(LoadError::Malformed {
                    line,
                    reason: format!("block at ({x}, {y}) is outside the {cols}x{rows} grid"),
                });
            }
            let pos = Vec2::new(cell.x * x as f32, cell.y * y as f32);
            level.add_block(pos, cell, durability);
        }
    }

    Ok(level)
}

fn parse_header(header: &str) -> Result<(usize, usize), LoadError> {
    let malformed = || LoadError::Malformed {
        line: 1,
        reason: format!("expected COLSxROWS header, got {header:?}"),
    };
    let (cols, rows) = header.trim().split_once('x').ok_or_else(malformed)?;
    let cols: usize = cols.trim().parse().map_err(|_| malformed())?;
    let rows: usize = rows.trim().parse().map_err(|_| malformed())?;
    if cols == 0 || rows == 0 {
        return Err(malformed());
    }
    Ok((cols, rows))
}

const BUILTIN: [&str; 3] = [
    include_str!("../levels/level1.txt"),
    include_str!("../levels/level2.txt"),
    include_str!("../levels/level3.txt"),
];

/// The levels bundled with the crate
#[derive(Debug, Clone)]
pub struct BuiltinLevels {
    arena_size: Vec2,
}

impl BuiltinLevels {
    pub fn new(arena_size: Vec2) -> Self {
        Self { arena_size }
    }

    pub fn count(&self) -> usize {
        BUILTIN.len()
    }
}

impl LevelLoader for BuiltinLevels {
    fn load(&mut self, index: usize) -> LevelFuture {
        let result = BUILTIN
            .get(index)
            .ok_or(LoadError::NotFound(index))
            .and_then(|text| parse_level(text, self.arena_size));
        Box::pin(future::ready(result))
    }
}

/// Levels read from `level{N}.txt` files in a directory, `N` counting from 1
#[derive(Debug, Clone)]
pub struct DirectoryLevels {
    dir: PathBuf,
    arena_size: Vec2,
}

impl DirectoryLevels {
    pub fn new(dir: impl Into<PathBuf>, arena_size: Vec2) -> Self {
        Self {
            dir: dir.into(),
            arena_size,
        }
    }
}

impl LevelLoader for DirectoryLevels {
    fn load(&mut self, index: usize) -> LevelFuture {
        let path = self.dir.join(format!("level{}.txt", index + 1));
        let result = match std::fs::read_to_string(&path) {
            Ok(text) => parse_level(&text, self.arena_size),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound(index)),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            log::warn!("Loading {}: {}", path.display(), e);
        }
        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use std::task::{Context, Poll, Waker};

    use super::*;
    use crate::sim::Bounds;

    const ARENA: Vec2 = Vec2::new(256.0, 240.0);

    fn block_on_ready(mut fut: LevelFuture) -> Result<Level, LoadError> {
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("builtin loads complete immediately"),
        }
    }

    #[test]
    fn test_parse_places_blocks_on_grid() {
        let level = parse_level("4x2\n1.2\n..3.", ARENA).unwrap();
        assert_eq!(level.blocks.len(), 3);

        let b = &level.blocks[1];
        assert_eq!(b.durability, 2);
        assert_eq!(b.left(), 128.0);
        assert_eq!(b.top(), 0.0);
        assert_eq!(b.shape.size(), Vec2::new(64.0, 120.0));

        let c = &level.blocks[2];
        assert_eq!(c.durability, 3);
        assert_eq!(c.top(), 120.0);
        assert_eq!(level.arena.size(), ARENA);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let level = parse_level("2x2\r\n11\r\n", ARENA).unwrap();
        assert_eq!(level.blocks.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert!(matches!(
            parse_level("sixteen\n111", ARENA),
            Err(LoadError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_level("0x4\n", ARENA),
            Err(LoadError::Malformed { line: 1, .. })
        ));
        assert!(matches!(parse_level("", ARENA), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_parse_rejects_unknown_cells() {
        assert!(matches!(
            parse_level("4x2\n1#11", ARENA),
            Err(LoadError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_blocks_outside_grid() {
        assert!(matches!(
            parse_level("2x1\n111", ARENA),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(
            parse_level("2x1\n11\n11", ARENA),
            Err(LoadError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    fn test_builtin_levels_load() {
        let mut loader = BuiltinLevels::new(ARENA);
        for index in 0..loader.count() {
            let level = block_on_ready(loader.load(index)).unwrap();
            assert!(!level.is_cleared(), "level {index} has blocks");
            for block in &level.blocks {
                assert!(block.right() <= ARENA.x && block.bottom() <= ARENA.y);
            }
        }
        assert!(matches!(
            block_on_ready(loader.load(3)),
            Err(LoadError::NotFound(3))
        ));
    }

    #[test]
    fn test_directory_missing_level_is_not_found() {
        let mut loader = DirectoryLevels::new("/nonexistent/levels", ARENA);
        assert!(matches!(
            block_on_ready(loader.load(0)),
            Err(LoadError::NotFound(0))
        ));
    }

    #[test]
    fn test_directory_reads_bundled_files() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/levels");
        let mut loader = DirectoryLevels::new(dir, ARENA);
        let level = block_on_ready(loader.load(0)).unwrap();
        assert_eq!(level.blocks.len(), 14 * 4);
    }
}
