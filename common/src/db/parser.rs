use crate::db::core::{Netlist, Wire};
use crate::geom::coord::GridCoord;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    #[error("wire {index}: endpoint ({x}, {y}) lies outside the {dim_x}x{dim_y} grid")]
    OutOfBounds {
        index: usize,
        x: i64,
        y: i64,
        dim_x: u32,
        dim_y: u32,
    },
}

/// Reads a routing problem file.
///
/// Format: a `dim_y dim_x` header (height first), a wire count, then one
/// `startx starty endx endy` quadruple per wire. Blank lines and `#`
/// comments are skipped.
pub fn parse(path: &Path) -> Result<Netlist, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text)
}

pub fn parse_str(text: &str) -> Result<Netlist, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (line, header) = lines.next().ok_or(ParseError::Syntax {
        line: 1,
        reason: "missing 'dim_y dim_x' header".to_string(),
    })?;
    let dims = fields(line, header, 2)?;
    let dim_y = dimension(line, dims[0])?;
    let dim_x = dimension(line, dims[1])?;

    let (line, count_line) = lines.next().ok_or(ParseError::Syntax {
        line,
        reason: "missing wire count".to_string(),
    })?;
    let num_wires: usize = count_line.parse().map_err(|_| ParseError::Syntax {
        line,
        reason: format!("invalid wire count '{count_line}'"),
    })?;

    let mut wires = Vec::with_capacity(num_wires);
    let mut last_line = line;
    for (line, text) in lines {
        last_line = line;
        if wires.len() == num_wires {
            return Err(ParseError::Syntax {
                line,
                reason: format!("more than the declared {num_wires} wires"),
            });
        }
        let parts = fields(line, text, 4)?;
        let index = wires.len();
        let start = endpoint(index, parts[0], parts[1], dim_x, dim_y, line)?;
        let end = endpoint(index, parts[2], parts[3], dim_x, dim_y, line)?;
        wires.push(Wire::new(start, end));
    }

    if wires.len() != num_wires {
        return Err(ParseError::Syntax {
            line: last_line,
            reason: format!("expected {} wires, found {}", num_wires, wires.len()),
        });
    }

    Ok(Netlist {
        dim_x,
        dim_y,
        wires,
    })
}

fn fields<'a>(line: usize, text: &'a str, expected: usize) -> Result<Vec<&'a str>, ParseError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != expected {
        return Err(ParseError::Syntax {
            line,
            reason: format!("expected {} fields, found {}", expected, parts.len()),
        });
    }
    Ok(parts)
}

fn dimension(line: usize, text: &str) -> Result<u32, ParseError> {
    let dim: u32 = text.parse().map_err(|_| ParseError::Syntax {
        line,
        reason: format!("invalid dimension '{text}'"),
    })?;
    if dim == 0 {
        return Err(ParseError::Syntax {
            line,
            reason: "grid dimensions must be positive".to_string(),
        });
    }
    Ok(dim)
}

fn endpoint(
    index: usize,
    x_text: &str,
    y_text: &str,
    dim_x: u32,
    dim_y: u32,
    line: usize,
) -> Result<GridCoord, ParseError> {
    let x: i64 = x_text.parse().map_err(|_| ParseError::Syntax {
        line,
        reason: format!("invalid coordinate '{x_text}'"),
    })?;
    let y: i64 = y_text.parse().map_err(|_| ParseError::Syntax {
        line,
        reason: format!("invalid coordinate '{y_text}'"),
    })?;
    if x < 0 || y < 0 || x >= dim_x as i64 || y >= dim_y as i64 {
        return Err(ParseError::OutOfBounds {
            index,
            x,
            y,
            dim_x,
            dim_y,
        });
    }
    Ok(GridCoord::new(x as u32, y as u32))
}
