use crate::{config::MAX_DIMENSION, pos::Pos2};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid run length {0:?}")]
    RunLength(String),
    #[error("invalid header {0:?}")]
    Header(String),
}

/// A decoded pattern, with alive positions relative to its top-left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub width: usize,
    pub height: usize,
    pub alive: Vec<Pos2>,
}

impl Pattern {
    /// Builds a pattern from sorted positions, normalizing it to its bounding box
    pub fn from_alive(alive: &[Pos2]) -> Self {
        let Some(first) = alive.first() else {
            return Self {
                width: 0,
                height: 0,
                alive: Vec::new(),
            };
        };
        let min_x = alive.iter().map(|p| p.x).min().unwrap_or_default();
        let max_x = alive.iter().map(|p| p.x).max().unwrap_or_default();
        // sorted, so the first and last positions hold the extreme rows
        let min_y = first.y;
        let max_y = alive.last().map(|p| p.y).unwrap_or_default();

        let tl = Pos2 { x: min_x, y: min_y };
        Self {
            width: (max_x - min_x + 1) as usize,
            height: (max_y - min_y + 1) as usize,
            alive: alive.iter().map(|&p| p - tl).collect(),
        }
    }
}

pub trait PositionEncoder {
    fn encode(self, positions: &[Pos2]) -> String;
    fn decode(self, value: &str) -> Result<Pattern, DecodeError>;
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, tag: char) {
        let token = match run {
            0 => return,
            1 => tag.to_string(),
            n => format!("{n}{tag}"),
        };
        if self.line_len + token.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += token.len();
        self.sequence.push_str(&token);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

fn body_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d*)([bo$!])").expect("valid body regex"))
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid header regex"))
}

/// Reader and writer for the RLE pattern format
pub struct RunLengthEncoded {
    name: Option<String>,
    header: bool,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    fn encode_header(&self, pattern: &Pattern) -> String {
        let mut header = String::new();
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {name}\n"));
        }
        header.push_str(&format!(
            "x = {}, y = {}, rule = B3/S23\n",
            pattern.width, pattern.height
        ));
        header
    }

    fn encode_cells(alive: &[Pos2]) -> String {
        let mut last = Pos2 { x: -1, y: 0 };
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for &pos in alive {
            if last.y == pos.y && last.x + 1 == pos.x {
                alive_run += 1;
                last = pos;
                continue;
            }

            let lines_run = pos.y - last.y;
            let dead_run = match lines_run {
                0 => pos.x - last.x - 1,
                _ => pos.x,
            };
            // a run of alive cells ends before the line break, dead cells follow it
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }

    fn decode_header(line: &str) -> Result<(usize, usize), DecodeError> {
        let captures = header_regex()
            .captures(line)
            .ok_or_else(|| DecodeError::Header(line.to_owned()))?;
        let parse = |i: usize| {
            captures[i]
                .parse::<usize>()
                .map_err(|_| DecodeError::Header(line.to_owned()))
        };
        Ok((parse(1)?, parse(2)?))
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self {
            name: None,
            header: true,
        }
    }
}

impl PositionEncoder for RunLengthEncoded {
    fn encode(self, positions: &[Pos2]) -> String {
        let pattern = Pattern::from_alive(positions);
        let body = Self::encode_cells(&pattern.alive);
        if self.header {
            format!("{}{body}\n", self.encode_header(&pattern))
        } else {
            format!("{body}\n")
        }
    }

    fn decode(self, value: &str) -> Result<Pattern, DecodeError> {
        let mut size = None;
        let mut alive = Vec::new();
        let mut cursor = Pos2::zero();
        'lines: for line in value.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            if line.starts_with('x') {
                size = Some(Self::decode_header(line)?);
                continue;
            }

            for (_, [run_str, tag]) in body_regex().captures_iter(line).map(|c| c.extract()) {
                let run = match run_str {
                    "" => 1,
                    digits => digits
                        .parse::<i32>()
                        .ok()
                        .filter(|&run| run as usize <= MAX_DIMENSION)
                        .ok_or_else(|| DecodeError::RunLength(digits.to_owned()))?,
                };
                match tag {
                    "!" => break 'lines,
                    "o" => {
                        for _ in 0..run {
                            alive.push(cursor);
                            cursor.x += 1;
                        }
                    }
                    "b" => cursor.x += run,
                    "$" => {
                        cursor.x = 0;
                        cursor.y += run;
                    }
                    _ => unreachable!("regex only captures b, o, $ and !"),
                }
            }
        }

        let bounds = Pattern::from_alive(&alive);
        let (width, height) = size.unwrap_or((bounds.width, bounds.height));
        Ok(Pattern {
            width,
            height,
            alive,
        })
    }
}
