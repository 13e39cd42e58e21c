use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    Running,
    Finished,
}

impl RunPhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl Default for RunPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// One graded disagreement between an output port and its expected waveform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub label: Label,
    pub tick: usize,
    pub expected: Pressure,
    pub observed: Pressure,
}

/// Progress and grading of the current run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRun {
    time_index: usize,
    phase: RunPhase,
    correct: bool,
    recorded_outputs: BTreeMap<Label, Vec<Pressure>>,
    mismatches: Vec<Mismatch>,
    initial_snapshot: Option<Grid>,
}

impl Default for PuzzleRun {
    fn default() -> Self {
        Self {
            time_index: 0,
            phase: RunPhase::Idle,
            correct: true,
            recorded_outputs: BTreeMap::new(),
            mismatches: Vec::new(),
            initial_snapshot: None,
        }
    }
}

impl PuzzleRun {
    /// Number of completed ticks.
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Whether every graded sample so far matched. Final once the phase is [`RunPhase::Finished`].
    pub fn correct(&self) -> bool {
        self.correct
    }

    /// The verdict, available only once the run is over.
    pub fn verdict(&self) -> Option<bool> {
        self.phase.is_finished().then_some(self.correct)
    }

    pub fn recorded_outputs(&self) -> &BTreeMap<Label, Vec<Pressure>> {
        &self.recorded_outputs
    }

    pub fn recorded(&self, label: Label) -> Option<&[Pressure]> {
        self.recorded_outputs.get(&label).map(Vec::as_slice)
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// The board as it was when the run started.
    pub fn initial_snapshot(&self) -> Option<&Grid> {
        self.initial_snapshot.as_ref()
    }
}

/// A loaded puzzle being played: the board, its ports and the run driving them.
///
/// All operations are synchronous and complete before returning. Stepping on a timer is up to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSession {
    name: String,
    store: GridStore,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    rules: StepRules,
    pressure: PressureField,
    run: PuzzleRun,
}

impl PuzzleSession {
    pub fn new(puzzle: LoadedPuzzle, rules: StepRules) -> Self {
        let (name, store, ports) = puzzle.into_parts();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for port in ports {
            match port {
                Port::Input(input) => inputs.push(input),
                Port::Output(output) => outputs.push(output),
            }
        }

        let pressure = compute(store.grid());
        Self {
            name,
            store,
            inputs,
            outputs,
            rules,
            pressure,
            run: PuzzleRun::default(),
        }
    }

    /// Validates a puzzle definition and starts a session on it.
    pub fn load(definition: &PuzzleDefinition, rules: StepRules) -> Result<Self> {
        Ok(Self::new(load_puzzle(definition)?, rules))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid_store(&self) -> &GridStore {
        &self.store
    }

    pub fn grid(&self) -> &Grid {
        self.store.grid()
    }

    pub fn pressure(&self) -> &PressureField {
        &self.pressure
    }

    pub fn run(&self) -> &PuzzleRun {
        &self.run
    }

    pub fn rules(&self) -> &StepRules {
        &self.rules
    }

    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    /// Ticks in a full run: the longest input script or expected output.
    pub fn run_length(&self) -> usize {
        let inputs = self.inputs.iter().map(|input| input.signal.len());
        let outputs = self.outputs.iter().map(|output| output.required.len());
        inputs.chain(outputs).max().unwrap_or(0)
    }

    /// Places a cell on the board. Only allowed before the run starts, and never on protected cells.
    pub fn paint(&mut self, coords: Coord2, cell: CellType) -> EditOutcome {
        self.paint_all([(coords, cell)])
    }

    /// Paints several cells and refreshes the pressure field once at the end.
    pub fn paint_all(&mut self, cells: impl IntoIterator<Item = (Coord2, CellType)>) -> EditOutcome {
        if !self.run.phase.is_idle() {
            log::debug!("paint ignored, run in progress");
            return EditOutcome::NoChange;
        }

        let mut outcome = EditOutcome::NoChange;
        for (coords, cell) in cells {
            if self.store.set(coords, cell).has_update() {
                outcome = EditOutcome::Changed;
            }
        }
        if outcome.has_update() {
            self.pressure = compute(self.store.grid());
        }
        outcome
    }

    /// Advances the run by one tick, starting it first if needed.
    pub fn step(&mut self) -> StepOutcome {
        match self.run.phase {
            RunPhase::Finished => return StepOutcome::NoChange,
            RunPhase::Idle => {
                self.start();
                if self.run.time_index >= self.run_length() {
                    return self.finish();
                }
            }
            RunPhase::Running => {}
        }

        let tick = self.run.time_index;
        for input in &self.inputs {
            self.store
                .force(input.position, CellType::from_pressure(input.value_at(tick)));
        }

        let pinned: BTreeSet<Coord2> = self.inputs.iter().map(|input| input.position).collect();
        let next = advance_pinned(self.store.grid(), &self.rules, &pinned);
        self.store.replace(next);
        self.pressure = compute(self.store.grid());

        for output in &self.outputs {
            let observed = self.pressure.get(output.position);
            self.run
                .recorded_outputs
                .entry(output.label)
                .or_default()
                .push(observed);

            if let Some(expected) = output.expected_at(tick)
                && expected.signum() != observed.signum()
            {
                log::trace!(
                    "tick {tick}: port {:?} expected {expected}, observed {observed}",
                    output.label
                );
                self.run.correct = false;
                self.run.mismatches.push(Mismatch {
                    label: output.label,
                    tick,
                    expected,
                    observed,
                });
            }
        }

        self.run.time_index += 1;
        if self.run.time_index >= self.run_length() {
            self.finish()
        } else {
            StepOutcome::Ticked
        }
    }

    /// Steps until the run is over and returns the verdict.
    pub fn run_to_end(&mut self) -> bool {
        while !self.run.phase.is_finished() {
            self.step();
        }
        self.run.correct
    }

    /// Puts the board back the way it was before the run. Does nothing before a run has started.
    pub fn reset(&mut self) -> EditOutcome {
        if self.run.phase.is_idle() {
            return EditOutcome::NoChange;
        }

        if let Some(snapshot) = self.run.initial_snapshot.take() {
            self.store.replace(snapshot);
        }
        self.pressure = compute(self.store.grid());
        self.run = PuzzleRun::default();
        log::debug!("{}: reset", self.name);
        EditOutcome::Changed
    }

    fn start(&mut self) {
        self.run.initial_snapshot = Some(self.store.grid().clone());
        self.run.phase = RunPhase::Running;
        for output in &self.outputs {
            self.run.recorded_outputs.insert(output.label, Vec::new());
        }
        log::debug!("{}: run started, {} tick(s)", self.name, self.run_length());
    }

    fn finish(&mut self) -> StepOutcome {
        self.run.phase = RunPhase::Finished;
        log::debug!(
            "{}: finished after {} tick(s), {}",
            self.name,
            self.run.time_index,
            if self.run.correct { "passed" } else { "failed" }
        );
        if self.run.correct {
            StepOutcome::Passed
        } else {
            StepOutcome::Failed
        }
    }
}
