//! The pretty print implementation of the [`chipset`](super::ChipSet) state.
//! This implementation was split up into this file for smaller file sizes and higher
//! cohesion.

use super::ChipSet;
use crate::definitions::{cpu, memory};
use std::fmt::{self, Write};

/// The amount of entries printed per row has to be bigger then 1
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

/// The width of a single formatted integer `0x0000`.
const INTEGER_LEN: usize = 6;

/// Will add an indent
fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

fn integer_formatter<T: fmt::UpperHex>(line: &mut String, data: T) -> fmt::Result {
    write!(line, "{:#06X}", data)
}

fn pointer_formatter(line: &mut String, from: usize, to: usize) -> fmt::Result {
    integer_formatter(line, from)?;
    line.push_str(" - ");
    integer_formatter(line, to)?;
    line.push_str(" :");
    Ok(())
}

/// Will print a single value on its own indented line.
fn single_printer<T: fmt::UpperHex>(data: T, indent: usize) -> Result<String, fmt::Error> {
    let mut line = String::with_capacity(indent + INTEGER_LEN);
    indent_helper(&mut line, indent);
    integer_formatter(&mut line, data)?;
    Ok(line)
}

/// Will print the values in rows of [`HEX_PRINT_STEP`] prefixed with their
/// offset range.
fn rows_printer<T, F>(data: &[T], indent: usize, mut entry: F) -> Result<String, fmt::Error>
where
    F: FnMut(&mut String, &T) -> fmt::Result,
{
    let mut res = String::new();
    for from in (0..data.len()).step_by(HEX_PRINT_STEP) {
        let to = (from + HEX_PRINT_STEP - 1).min(data.len() - 1);

        indent_helper(&mut res, indent);
        pointer_formatter(&mut res, from, to)?;

        for value in &data[from..=to] {
            res.push(' ');
            entry(&mut res, value)?;
        }
        let trimmed = res.trim_end().len();
        res.truncate(trimmed);
        res.push(END_OF_LINE);
    }
    // Remove unneeded new line
    if res.ends_with(END_OF_LINE) {
        res.pop();
    }
    Ok(res)
}

fn integer_printer<T: fmt::UpperHex>(data: &[T], indent: usize) -> Result<String, fmt::Error> {
    rows_printer(data, indent, |line, value| integer_formatter(line, value))
}

fn bool_printer(data: &[bool], indent: usize) -> Result<String, fmt::Error> {
    rows_printer(data, indent, |line, value| {
        write!(line, "{:<width$}", value, width = INTEGER_LEN)
    })
}

/// Handles all the opcode prints
mod opcode_print {
    use super::{
        indent_helper, integer_formatter, memory, pointer_formatter, END_OF_LINE, HEX_PRINT_STEP,
    };
    use crate::opcode::Opcode;
    use std::fmt;

    /// The amount of bytes shown per row, an opcode is two bytes long.
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE as usize;
    /// The values that are used when a row only contains zeros.
    const FILLER_BASE: &str = "...";

    /// Prepares the line that will be used, in the case that the row only has zeros.
    fn zero_filler() -> String {
        let zero = "0x0000";
        let length =
            zero.len() * (HEX_PRINT_STEP - 2) + (HEX_PRINT_STEP - 1) - FILLER_BASE.len();
        let filler = " ".repeat(length / 2);
        format!("{}{}{}{}{}", zero, filler, FILLER_BASE, filler, zero)
    }

    /// this struct will simulate a single row of opcodes (only in this context)
    struct Row {
        from: usize,
        to: usize,
        data: [Opcode; HEX_PRINT_STEP],
        only_null: bool,
    }

    impl Row {
        fn format(&self, line: &mut String, filler: &str) -> fmt::Result {
            pointer_formatter(line, self.from, self.to)?;
            line.push(' ');
            if self.only_null {
                line.push_str(filler);
                return Ok(());
            }
            for (i, entry) in self.data.iter().enumerate() {
                if i > 0 {
                    line.push(' ');
                }
                integer_formatter(line, *entry)?;
            }
            Ok(())
        }
    }

    /// will pretty print the content of the raw memory, consecutive rows
    /// of zeros are folded into a single row.
    pub(super) fn printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
        let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / POINTER_INCREMENT);

        for (chunk_index, chunk) in memory.chunks(POINTER_INCREMENT).enumerate() {
            let from = chunk_index * POINTER_INCREMENT;
            let to = from + chunk.len() - 1;

            let mut data = [0; HEX_PRINT_STEP];
            for (opcode, bytes) in data.iter_mut().zip(chunk.chunks(2)) {
                let high = bytes[0];
                let low = bytes.get(1).copied().unwrap_or(0);
                *opcode = Opcode::from_be_bytes([high, low]);
            }
            let only_null = data.iter().all(|opcode| *opcode == 0);

            let mut row = Row {
                from,
                to,
                data,
                only_null,
            };

            if only_null {
                if let Some(last_row) = rows.last() {
                    if last_row.only_null {
                        row.from = last_row.from;
                        rows.pop();
                    }
                }
            }
            rows.push(row)
        }

        let filler = zero_filler();
        let mut string = String::new();
        for row in rows {
            indent_helper(&mut string, indent);
            row.format(&mut string, &filler)?;
            string.push(END_OF_LINE);
        }
        if string.ends_with(END_OF_LINE) {
            string.pop();
        }
        Ok(string)
    }
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let opc = single_printer(self.opcode, INDENT_SIZE)?;
        let prc = single_printer(self.registers.pc, INDENT_SIZE)?;
        let idx = single_printer(self.registers.index, INDENT_SIZE)?;
        let tim = integer_printer(
            &[
                self.registers.delay.get_value(),
                self.registers.sound.get_value(),
            ],
            INDENT_SIZE,
        )?;
        let mem = opcode_print::printer(self.memory.as_slice(), INDENT_SIZE)?;
        let key = bool_printer(self.keyboard.get_keys(), INDENT_SIZE)?;

        // handle stack specially as it needes to be filled up if empty
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..self.stack.len()].copy_from_slice(self.stack.as_slice());
        let sta = integer_printer(&stack, INDENT_SIZE)?;

        let reg = integer_printer(&self.registers.v, INDENT_SIZE)?;

        write!(
            f,
            "Chipset {{\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex Register :\n{}\n\
                \tTimers :\n{}\n\
                \tMemory :\n{}\n\
                \tKeybord :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                }}",
            opc, prc, idx, tim, mem, key, sta, reg
        )
    }
}
