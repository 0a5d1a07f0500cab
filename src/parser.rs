//! The assembly parser: turns program text into a `Vec<Instruction>`.
//!
//! The grammar is line-oriented — one instruction per line, up to three
//! space-separated operands — so it is parsed a line at a time.
//! Each line's *operand* grammar (immediates, addresses, registers) is
//! self-delimiting (a number ends at the first non-digit, a register name
//! at 1..3 alnum characters, an address at its closing `]`), which is
//! exactly what makes per-operand `nom` combinators compose cleanly
//! without backtracking past a newline, as required.
//!
//! Built on `nom`'s modern function-combinator style, better suited to a
//! grammar with several distinct operand shapes than the legacy
//! `named!`/`chain!` macros.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit0, digit1, satisfy};
use nom::combinator::{map, map_res, opt, recognize};
use nom::sequence::{pair, preceded};
use nom::IResult;

use crate::error::ParseError;
use crate::instruction::{Instruction, Opcode, Operand};
use crate::register;
use crate::word::Word;

/// Parse a whole program's source text into decoded instructions.
///
/// `max_instructions` enforces the fixed program-array capacity: a
/// program with more non-empty lines than this is a parse error naming
/// the line where the limit was crossed.
pub fn parse_program(source: &str, max_instructions: usize) -> Result<Vec<Instruction>, ParseError> {
    let mut instructions = Vec::new();

    // Split on '\n' only (not str::lines, which also swallows a '\r'
    // immediately before it): CR is treated as part of the preceding
    // token, not as part of the line terminator.
    let mut raw_lines: Vec<&str> = source.split('\n').collect();
    // A source ending in a final '\n' produces one trailing empty
    // "line" from the split; that's the normal EOF, not an instruction.
    if raw_lines.last() == Some(&"") {
        raw_lines.pop();
    }

    for (i, line) in raw_lines.into_iter().enumerate() {
        let line_no = i + 1;
        if instructions.len() >= max_instructions {
            return Err(ParseError::new(
                line_no,
                format!("program exceeds the {}-instruction capacity", max_instructions),
            ));
        }
        instructions.push(parse_line(line, line_no)?);
    }

    Ok(instructions)
}

fn parse_line(line: &str, line_no: usize) -> Result<Instruction, ParseError> {
    let (rest, mnemonic) =
        opcode(line).map_err(|_| ParseError::new(line_no, "expected an opcode mnemonic"))?;

    let mut operands = [Operand::Empty, Operand::Empty, Operand::Empty];
    let mut rest = rest;
    for slot in operands.iter_mut() {
        if rest.is_empty() {
            break;
        }
        let (after_sep, _) = char::<_, nom::error::Error<&str>>(' ')(rest)
            .map_err(|_| ParseError::new(line_no, "expected a single space before an operand"))?;
        let (after_operand, op) = operand(after_sep)
            .map_err(|e| ParseError::new(line_no, describe_operand_error(e)))?;
        *slot = op;
        rest = after_operand;
    }

    if !rest.is_empty() {
        return Err(ParseError::new(
            line_no,
            format!("unexpected trailing characters: {:?}", rest),
        ));
    }

    let instruction = Instruction::new(mnemonic.to_string(), operands);
    if let Some(opcode) = instruction.opcode {
        check_arity(&instruction, opcode, line_no)?;
    }
    Ok(instruction)
}

/// A recognized opcode's declared [`Opcode::arity`] must match exactly:
/// every slot below it filled, every slot at or past it `Empty`. An
/// unrecognized mnemonic has no declared arity and is left unchecked —
/// that becomes a dispatch error at execution time instead.
fn check_arity(instr: &Instruction, opcode: Opcode, line_no: usize) -> Result<(), ParseError> {
    let arity = opcode.arity();
    for (i, op) in instr.operands.iter().enumerate() {
        let filled = !matches!(op, Operand::Empty);
        if filled != (i < arity) {
            return Err(ParseError::new(
                line_no,
                format!("{} expects {} operand(s)", instr.mnemonic, arity),
            ));
        }
    }
    Ok(())
}

fn describe_operand_error(_e: nom::Err<nom::error::Error<&str>>) -> String {
    "malformed operand".to_string()
}

fn opcode(input: &str) -> IResult<&str, &str> {
    nom::bytes::complete::take_while_m_n(1, 9, |c: char| c.is_ascii_uppercase())(input)
}

fn operand(input: &str) -> IResult<&str, Operand> {
    alt((immediate, address, register_operand))(input)
}

fn immediate(input: &str) -> IResult<&str, Operand> {
    let (input, _) = char('<')(input)?;
    let (input, ty) = alt((tag("int"), tag("float"), tag("logic"), tag("char")))(input)?;
    let (input, _) = char('>')(input)?;
    let (input, word) = match ty {
        "int" => map(int_number, Word::Int)(input)?,
        "float" => map(float_number, Word::Float)(input)?,
        "logic" => map(int_number, |n| Word::Logic(n != 0))(input)?,
        "char" => map(int_number, Word::Char)(input)?,
        _ => unreachable!(),
    };
    Ok((input, Operand::Immediate(word)))
}

fn address(input: &str) -> IResult<&str, Operand> {
    let (input, _) = tag("M[")(input)?;
    let (input, op) = alt((relative_address, absolute_address))(input)?;
    let (input, _) = tag("]")(input)?;
    Ok((input, op))
}

fn relative_address(input: &str) -> IResult<&str, Operand> {
    let (input, name) = register_name(input)?;
    let index = register::index_of(&name).expect("index_of is total");
    let (input, displacement) = opt(displacement)(input)?;
    Ok((input, Operand::RelativeAddress(index, displacement.unwrap_or(0))))
}

fn displacement(input: &str) -> IResult<&str, i32> {
    let (input, _) = char(' ')(input)?;
    let (input, sign) = alt((char('+'), char('-')))(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, digits) = digit1(input)?;
    let magnitude: i32 = digits.parse().unwrap_or(0);
    Ok((input, if sign == '-' { -magnitude } else { magnitude }))
}

fn absolute_address(input: &str) -> IResult<&str, Operand> {
    map(int_number, Operand::AbsoluteAddress)(input)
}

fn register_operand(input: &str) -> IResult<&str, Operand> {
    map(register_name, |name| {
        Operand::Register(register::index_of(&name).expect("index_of is total"))
    })(input)
}

/// A register mnemonic: first character uppercase, 1..3 total characters
/// drawn from uppercase letters and digits.
fn register_name(input: &str) -> IResult<&str, String> {
    let (input, first) = satisfy(|c: char| c.is_ascii_uppercase())(input)?;
    let (input, rest) =
        nom::bytes::complete::take_while_m_n(0, 2, |c: char| c.is_ascii_uppercase() || c.is_ascii_digit())(
            input,
        )?;
    let mut name = String::with_capacity(1 + rest.len());
    name.push(first);
    name.push_str(rest);
    Ok((input, name))
}

fn int_number(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i32>()
    })(input)
}

/// A float literal: `['-'] digits ['.' digits*]`. A missing fractional
/// part (`.`) is fraction 0; a missing `.` entirely leaves the value an
/// integer-valued float.
fn float_number(input: &str) -> IResult<&str, f32> {
    let (input, sign) = opt(char('-'))(input)?;
    let (input, int_part) = digit1(input)?;
    let (input, frac_part) = opt(preceded(char('.'), digit0))(input)?;

    let mut text = String::new();
    if sign.is_some() {
        text.push('-');
    }
    text.push_str(int_part);
    text.push('.');
    match frac_part {
        Some(digits) if !digits.is_empty() => text.push_str(digits),
        _ => text.push('0'),
    }

    let value: f32 = text.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((input, value))
}
