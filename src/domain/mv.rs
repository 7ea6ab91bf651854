use serde::Serialize;
use std::fmt;

/// One relocation: block of priority `pri` moves from `src` to `dst`.
///
/// Grounded on `original_source/main/move.c` (`move_t`) / `src/relocation.c`
/// (`relocation_t`), which are the same triple under different names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub pri: i32,
    pub src: usize,
    pub dst: usize,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {} -> {})", self.pri, self.src, self.dst)
    }
}

/// Renders a solution path as `[(p: s -> d), ...]`, or `?` when `path` is
/// `None` (no solution found within budget), matching `print_moves`/
/// `print_path` in the original sources.
pub fn format_path(path: Option<&[Move]>) -> String {
    match path {
        None => "?".to_string(),
        Some(moves) => {
            let mut s = String::from("[");
            for (i, mv) in moves.iter().enumerate() {
                if i > 0 {
                    s.push_str(", ");
                }
                s.push_str(&mv.to_string());
            }
            s.push(']');
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_empty_path() {
        assert_eq!(format_path(Some(&[])), "[]");
    }

    #[test]
    fn formats_missing_path() {
        assert_eq!(format_path(None), "?");
    }

    #[test]
    fn formats_moves() {
        let path = vec![
            Move {
                pri: 2,
                src: 0,
                dst: 1,
            },
            Move {
                pri: 4,
                src: 1,
                dst: 2,
            },
        ];
        assert_eq!(format_path(Some(&path)), "[(2: 0 -> 1), (4: 1 -> 2)]");
    }
}
