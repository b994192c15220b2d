//! Path-data tokenizer and normalization to absolute commands.

use crate::error::PathError;

use super::command::PathCommand;

/// A command as written in path data: original letter case, raw parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub letter: char,
    pub params: Vec<f64>,
}

impl RawCommand {
    pub fn new(letter: char, params: Vec<f64>) -> Self {
        Self { letter, params }
    }

    fn is_relative(&self) -> bool {
        self.letter.is_ascii_lowercase()
    }
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_number(&self) -> bool {
        matches!(self.peek(), Some(b) if b.is_ascii_digit() || b == b'-' || b == b'+' || b == b'.')
    }

    fn error(&self) -> PathError {
        let found = std::str::from_utf8(&self.bytes[self.pos..])
            .ok()
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\u{fffd}');
        PathError::UnexpectedChar {
            found,
            offset: self.pos,
        }
    }

    /// Arc flags may be packed without separators (`a1 1 0 01 5 5`).
    fn flag(&mut self) -> Result<f64, PathError> {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(0.0)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(1.0)
            }
            _ => Err(self.error()),
        }
    }

    fn number(&mut self) -> Result<f64, PathError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut seen_digit = false;
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                seen_digit = true;
                self.pos += 1;
            } else if b == b'.' && !seen_dot {
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        if seen_digit && matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                self.pos = mark;
            }
        }
        if !seen_digit {
            self.pos = start;
            return Err(self.error());
        }
        let bytes = self.bytes;
        match std::str::from_utf8(&bytes[start..self.pos])
            .ok()
            .and_then(|text| text.parse().ok())
        {
            Some(value) => Ok(value),
            None => {
                self.pos = start;
                Err(self.error())
            }
        }
    }
}

/// Splits path data into commands, expanding implicit repetitions.
///
/// Extra coordinate pairs after a moveto become linetos of the same case.
pub fn parse_path(data: &str) -> Result<Vec<RawCommand>, PathError> {
    let mut scanner = Scanner::new(data);
    let mut commands = Vec::new();

    loop {
        scanner.skip_separators();
        let Some(byte) = scanner.peek() else { break };
        let letter = byte as char;
        let Some(arity) = PathCommand::arity(letter).filter(|_| letter.is_ascii_alphabetic()) else {
            return Err(scanner.error());
        };
        scanner.pos += 1;

        if arity == 0 {
            commands.push(RawCommand::new(letter, Vec::new()));
            continue;
        }

        let mut current = letter;
        let mut first = true;
        loop {
            scanner.skip_separators();
            if !first && !scanner.at_number() {
                break;
            }
            let mut params = Vec::with_capacity(arity);
            for index in 0..arity {
                scanner.skip_separators();
                let is_flag = current.eq_ignore_ascii_case(&'a') && (index == 3 || index == 4);
                let value = if is_flag {
                    scanner.flag()
                } else if scanner.at_number() {
                    scanner.number()
                } else {
                    Err(PathError::MissingParams {
                        command: current,
                        expected: arity,
                        found: index,
                    })
                };
                params.push(value?);
            }
            commands.push(RawCommand::new(current, params));
            if current == 'M' {
                current = 'L';
            } else if current == 'm' {
                current = 'l';
            }
            first = false;
        }
    }

    if let Some(first) = commands.first() {
        if !first.letter.eq_ignore_ascii_case(&'m') {
            return Err(PathError::MissingMoveTo);
        }
    }
    Ok(commands)
}

/// Converts raw commands to absolute coordinates.
///
/// Shorthand commands (H, V, S, T) keep their letter; only coordinates are
/// resolved against the current point and subpath start.
pub fn to_absolute(commands: &[RawCommand]) -> Result<Vec<PathCommand>, PathError> {
    let mut out = Vec::with_capacity(commands.len());
    let (mut cx, mut cy) = (0.0, 0.0);
    let (mut sx, mut sy) = (0.0, 0.0);

    for (index, raw) in commands.iter().enumerate() {
        let upper = raw.letter.to_ascii_uppercase();
        if index == 0 && upper != 'M' {
            return Err(PathError::MissingMoveTo);
        }
        let expected = PathCommand::arity(upper).ok_or(PathError::UnexpectedChar {
            found: raw.letter,
            offset: index,
        })?;
        if raw.params.len() < expected {
            return Err(PathError::MissingParams {
                command: raw.letter,
                expected,
                found: raw.params.len(),
            });
        }

        let mut params = raw.params[..expected].to_vec();
        // The first moveto is always absolute.
        if raw.is_relative() && index > 0 {
            match upper {
                'H' => params[0] += cx,
                'V' => params[0] += cy,
                'A' => {
                    params[5] += cx;
                    params[6] += cy;
                }
                _ => {
                    for pair in params.chunks_mut(2) {
                        pair[0] += cx;
                        if pair.len() > 1 {
                            pair[1] += cy;
                        }
                    }
                }
            }
        }

        let Some(command) = PathCommand::from_parts(upper, &params) else {
            continue;
        };
        match command {
            PathCommand::Close => {
                cx = sx;
                cy = sy;
            }
            PathCommand::HorizontalTo { x } => cx = x,
            PathCommand::VerticalTo { y } => cy = y,
            PathCommand::MoveTo { x, y } => {
                cx = x;
                cy = y;
                sx = x;
                sy = y;
            }
            other => {
                if let Some((x, y)) = other.end_point() {
                    cx = x;
                    cy = y;
                }
            }
        }
        out.push(command);
    }
    Ok(out)
}

/// Parses path data straight into absolute commands.
pub fn parse_absolute(data: &str) -> Result<Vec<PathCommand>, PathError> {
    to_absolute(&parse_path(data)?)
}
