//! Parser for textual process listings.
//!
//! A listing holds one process per line:
//!
//! ```text
//! pid ppid cpu mem name [ignored...]
//! ```
//!
//! which is the output of `ps -e -o pid,ppid,pcpu,rss,comm --no-headers`.
//! Fields are separated by spaces or tabs. Only the first word of the name is
//! kept and everything after it is ignored. Blank lines are skipped.

use log::{debug, warn};
use winnow::{
    Parser as _,
    ascii::{dec_int, dec_uint, float, space0, space1},
    combinator::{opt, preceded},
    error::{ContextError, ErrMode},
    token::take_till,
};

use pscircle_core::real::Real;

use crate::{
    error::StreamError,
    process::{MemoryUnit, Process},
};

/// Most nodes in a process tree, counting the reserved root slot.
pub const MAX_PROCESSES: usize = 32768;

/// Most records read from one listing. One slot goes to the reserved root.
pub const MAX_RECORDS: usize = MAX_PROCESSES - 1;

type IResult<O> = Result<O, ErrMode<ContextError>>;

/// Fields of one listing line before unit conversion.
#[derive(Debug, PartialEq)]
struct Record<'src> {
    pid: i32,
    ppid: i32,
    cpu: Real,
    mem: u64,
    name: &'src str,
}

fn name<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_till(1.., |c: char| c.is_whitespace()).parse_next(input)
}

fn record<'src>(input: &mut &'src str) -> IResult<Record<'src>> {
    space0.parse_next(input)?;
    let pid = dec_int.parse_next(input)?;
    space1.parse_next(input)?;
    let ppid = dec_int.parse_next(input)?;
    space1.parse_next(input)?;
    let cpu = float.parse_next(input)?;
    space1.parse_next(input)?;
    let mem = dec_uint.parse_next(input)?;
    let name = opt(preceded(space1, name)).parse_next(input)?;

    Ok(Record {
        pid,
        ppid,
        cpu,
        mem,
        name: name.unwrap_or_default(),
    })
}

/// Reads every process of a listing.
///
/// The memory column is converted to bytes with `unit`. At most
/// [`MAX_RECORDS`] records are read; the rest of the listing is skipped.
///
/// # Errors
///
/// Returns [`StreamError::InvalidLine`] for the first non-blank line that does
/// not start with `pid ppid cpu mem`.
///
/// # Examples
///
/// ```
/// # use pscircle_procs::{process::MemoryUnit, stream::parse_stream};
/// let processes = parse_stream("1 0 0.5 2 init\n", MemoryUnit::K).unwrap();
/// assert_eq!(processes[0].mem, 2048);
/// assert_eq!(processes[0].name, "init");
/// ```
pub fn parse_stream(source: &str, unit: MemoryUnit) -> Result<Vec<Process>, StreamError> {
    let multiplier = unit.multiplier();
    let mut processes = Vec::new();

    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if processes.len() == MAX_RECORDS {
            warn!(max = MAX_RECORDS, line = index + 1; "Maximum number of processes reached, skipping the rest");
            break;
        }

        let mut input = line;
        let record = record
            .parse_next(&mut input)
            .map_err(|_| StreamError::InvalidLine {
                line: index + 1,
                content: line.to_string(),
            })?;

        processes.push(Process::new(
            record.pid,
            record.ppid,
            record.cpu,
            record.mem.saturating_mul(multiplier),
            record.name,
        ));
    }

    debug!(count = processes.len(); "Process listing read");

    Ok(processes)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_record_fields() {
        let mut input = "  42\t1 12.5 300 sshd: user@pts/0";
        let parsed = record(&mut input).unwrap();

        assert_eq!(
            parsed,
            Record {
                pid: 42,
                ppid: 1,
                cpu: 12.5,
                mem: 300,
                name: "sshd:",
            }
        );
        assert_eq!(input, " user@pts/0");
    }

    #[test]
    fn test_record_without_name() {
        let mut input = "5 1 0 10";
        let parsed = record(&mut input).unwrap();
        assert_eq!(parsed.name, "");
    }

    #[test]
    fn test_record_negative_pid() {
        let mut input = "-1 -1 0.0 0 root";
        let parsed = record(&mut input).unwrap();
        assert_eq!(parsed.pid, -1);
        assert_eq!(parsed.ppid, -1);
    }

    #[test]
    fn test_parse_stream_applies_unit() {
        let source = "1 0 0.0 3 init\n2 1 1.0 1 kthreadd\n";

        let kib = parse_stream(source, MemoryUnit::K).unwrap();
        assert_eq!(kib[0].mem, 3 * 1024);

        let bytes = parse_stream(source, MemoryUnit::B).unwrap();
        assert_eq!(bytes[1].mem, 1);

        let mib = parse_stream(source, MemoryUnit::M).unwrap();
        assert_eq!(mib[1].mem, 1024 * 1024);
    }

    #[test]
    fn test_parse_stream_skips_blank_lines() {
        let source = "\n1 0 0.0 1 init\n   \n2 1 0.0 1 bash\n\n";
        let processes = parse_stream(source, MemoryUnit::B).unwrap();

        assert_eq!(processes.len(), 2);
        assert_eq!(processes[1].name, "bash");
        assert_approx_eq!(Real, processes[1].cpu, 0.0);
    }

    #[test]
    fn test_parse_stream_truncates_names() {
        let processes =
            parse_stream("9 1 0.0 1 a-very-long-process-name\n", MemoryUnit::B).unwrap();
        assert_eq!(processes[0].name, "a-very-long-pro");
    }

    #[test]
    fn test_parse_stream_invalid_line() {
        let source = "1 0 0.0 1 init\nPID PPID %CPU RSS COMMAND\n";
        let err = parse_stream(source, MemoryUnit::K).unwrap_err();

        match err {
            StreamError::InvalidLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "PID PPID %CPU RSS COMMAND");
            }
        }
    }

    #[test]
    fn test_parse_stream_stops_at_limit() {
        let source: String = (0..MAX_PROCESSES + 3)
            .map(|i| format!("{} 0 0.0 1 p\n", i + 1))
            .collect();

        let processes = parse_stream(&source, MemoryUnit::B).unwrap();
        assert_eq!(processes.len(), MAX_RECORDS);
        assert_eq!(processes[MAX_RECORDS - 1].pid, MAX_RECORDS as i32);
    }
}
