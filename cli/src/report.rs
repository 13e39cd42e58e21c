use std::collections::BTreeMap;

use pneumatic_core::{Label, Mismatch, Pressure, PuzzleSession, Signal};
use serde::Serialize;

pub(crate) fn pressure_glyph(pressure: Pressure) -> char {
    match pressure.signum() {
        1 => '+',
        -1 => '-',
        _ => '0',
    }
}

/// Formats observed pressures the way signals are written in puzzle files.
pub(crate) fn waveform(samples: &[Pressure]) -> String {
    samples.iter().copied().map(pressure_glyph).collect()
}

pub(crate) fn expected_waveform(required: &[Signal]) -> String {
    required
        .iter()
        .map(|signal| signal.map_or(' ', pressure_glyph))
        .collect()
}

/// The pressure field drawn over the board: one character per cell, blank where nothing conducts.
pub(crate) fn pressure_map(session: &PuzzleSession) -> String {
    let (width, height) = session.grid().bounds();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            let glyph = session.pressure().value((x, y)).map_or(' ', pressure_glyph);
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

pub(crate) fn board(session: &PuzzleSession) -> String {
    let board = session.grid().to_string();
    let pressure = pressure_map(session);
    board
        .lines()
        .zip(pressure.lines())
        .map(|(cells, field)| format!("|{cells}|  |{field}|\n"))
        .collect()
}

/// Machine readable result of `run --json`.
#[derive(Debug, Serialize)]
pub(crate) struct Summary<'a> {
    pub puzzle: &'a str,
    pub ticks: usize,
    pub correct: bool,
    pub outputs: BTreeMap<Label, String>,
    pub mismatches: &'a [Mismatch],
}

impl<'a> Summary<'a> {
    pub fn new(session: &'a PuzzleSession) -> Self {
        let run = session.run();
        Self {
            puzzle: session.name(),
            ticks: run.time_index(),
            correct: run.correct(),
            outputs: run
                .recorded_outputs()
                .iter()
                .map(|(&label, samples)| (label, waveform(samples)))
                .collect(),
            mismatches: run.mismatches(),
        }
    }
}

pub(crate) fn print_summary(session: &PuzzleSession) {
    let run = session.run();
    for output in session.outputs() {
        let observed = run.recorded(output.label).unwrap_or_default();
        println!(
            "{}: expected [{}]  observed [{}]",
            output.label,
            expected_waveform(&output.required),
            waveform(observed),
        );
    }
    for mismatch in run.mismatches() {
        println!(
            "  tick {}: {} expected {} but saw {}",
            mismatch.tick,
            mismatch.label,
            pressure_glyph(mismatch.expected),
            pressure_glyph(mismatch.observed),
        );
    }
    let verdict = if run.correct() { "PASS" } else { "FAIL" };
    println!("{}: {verdict} after {} tick(s)", session.name(), run.time_index());
}
