use super::ledger::Ledger;
use crate::error::{Result, TshError};
use crate::model::SlotKey;
use nom::{character, combinator::all_consuming, IResult, Parser};
use regex::Regex;

lazy_static::lazy_static! {
    // name, number, opponents; scores; ... board <boards>; ... p12 <starts>;
    static ref REPORT_LINE: Regex = Regex::new(
        r"^([A-Za-z,_\-\{\}'\(\) ]+)(\d+) ([0-9 ]+); ([0-9 \-]+);.*board ([0-9 ]+);.*p12 ([0-9 ]+);"
    )
    .unwrap();
}

const BOARD_MARKER: &str = "board ";
const START_MARKER: &str = "p12 ";

/// One decoded player line of a tsh report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Normalized "First Last" name
    pub name: String,
    /// The number printed right after the name. Pairing uses the line position instead.
    pub number: u32,
    pub opponents: Vec<String>,
    pub scores: Vec<i32>,
    pub boards: Vec<u32>,
    pub starts: Vec<u32>,
}

impl ReportLine {
    /// Merge this line's per-round values into the ledger as player `player`.
    ///
    /// Each list is written independently; a round missing from one list keeps
    /// that field at its default.
    pub fn apply(&self, player: u32, ledger: &mut Ledger) {
        for (round, opponent) in rounds_of(&self.opponents) {
            ledger.slot_mut(SlotKey::new(round, player), &self.name).opponent = opponent.clone();
        }
        for (round, score) in rounds_of(&self.scores) {
            ledger.slot_mut(SlotKey::new(round, player), &self.name).score = *score;
        }
        for (round, board) in rounds_of(&self.boards) {
            ledger.slot_mut(SlotKey::new(round, player), &self.name).board = *board;
        }
        for (round, start) in rounds_of(&self.starts) {
            ledger.slot_mut(SlotKey::new(round, player), &self.name).start = *start;
        }
    }
}

fn rounds_of<T>(values: &[T]) -> impl Iterator<Item = (u32, &T)> {
    values.iter().enumerate().map(|(i, v)| (i as u32 + 1, v))
}

/// Parse a single report line.
///
/// Returns `Ok(None)` for blank or noise lines. A line carrying both the
/// `board` and `p12` markers that does not fit the grammar is an error.
pub fn parse_line(line_no: u32, text: &str) -> Result<Option<ReportLine>> {
    let malformed = || TshError::MalformedLine {
        line: line_no,
        text: text.to_string(),
    };

    let caps = match REPORT_LINE.captures(text) {
        Some(caps) => caps,
        None if is_anchored(text) => return Err(malformed()),
        None => return Ok(None),
    };

    let group = |i: usize| caps.get(i).map(|m| m.as_str()).ok_or_else(malformed);

    let name = normalize_name(group(1)?.trim_end_matches(' '))?;
    let number = group(2)?.parse::<u32>().map_err(|_| malformed())?;

    Ok(Some(ReportLine {
        name,
        number,
        opponents: group(3)?.split_whitespace().map(String::from).collect(),
        scores: group(4)?.split_whitespace().map(decode_signed).collect(),
        boards: group(5)?.split_whitespace().map(decode_unsigned).collect(),
        starts: group(6)?.split_whitespace().map(decode_unsigned).collect(),
    }))
}

/// Parse a line and merge it into the ledger under `player`
pub fn read_line(player: u32, text: &str, ledger: &mut Ledger) -> Result<bool> {
    match parse_line(player, text)? {
        Some(line) => {
            line.apply(player, ledger);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn is_anchored(text: &str) -> bool {
    text.contains(BOARD_MARKER) && text.contains(START_MARKER)
}

/// Reorder "Last, First" to "First Last".
///
/// Names without a comma pass through unchanged; more than one comma is rejected.
pub fn normalize_name(name: &str) -> Result<String> {
    let parts: Vec<&str> = name.split(',').collect();
    match parts.as_slice() {
        [whole] => Ok(whole.to_string()),
        [last, first] => Ok(format!("{} {}", first, last).trim_start().to_string()),
        _ => Err(TshError::InvalidName(name.to_string())),
    }
}

fn signed_token(input: &str) -> IResult<&str, i32> {
    all_consuming(character::complete::i32).parse(input)
}

fn unsigned_token(input: &str) -> IResult<&str, u32> {
    all_consuming(character::complete::u32).parse(input)
}

/// Undecodable tokens (e.g. a lone `-`) count as 0
fn decode_signed(token: &str) -> i32 {
    signed_token(token).map(|(_, v)| v).unwrap_or(0)
}

fn decode_unsigned(token: &str) -> u32 {
    unsigned_token(token).map(|(_, v)| v).unwrap_or(0)
}
