//! Calculation dependency graph
//!
//! Calculations are ordered once, at construction, so that every
//! calculation runs after the calculations producing its inputs. A changed
//! field then only re-runs what lies downstream of it.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{debug, trace};

use crate::error::GraphError;
use crate::field::Field;
use crate::formulas::{Calculation, standard_calculations};
use crate::measurements::{Measurements, round_to};

/// Calculations in dependency order
#[derive(Debug, Clone)]
pub struct CalculationGraph {
    ordered: Vec<Calculation>,
}

impl CalculationGraph {
    /// Validate and order `calculations`.
    ///
    /// Fails if two calculations produce the same field or if the
    /// calculations depend on each other in a cycle.
    pub fn new(calculations: Vec<Calculation>) -> Result<Self, GraphError> {
        let mut producers: HashMap<Field, usize> = HashMap::new();
        for (i, calc) in calculations.iter().enumerate() {
            if let Some(&prev) = producers.get(&calc.output) {
                return Err(GraphError::DuplicateOutput {
                    field: calc.output,
                    first: calculations[prev].name,
                    second: calc.name,
                });
            }
            producers.insert(calc.output, i);
        }

        // Edges run from the producer of an input to its consumer
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); calculations.len()];
        let mut in_degree = vec![0usize; calculations.len()];
        for (i, calc) in calculations.iter().enumerate() {
            for input in &calc.inputs {
                if let Some(&producer) = producers.get(input) {
                    dependents[producer].push(i);
                    in_degree[i] += 1;
                }
            }
        }

        let mut ready: VecDeque<usize> = (0..calculations.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(calculations.len());
        while let Some(i) = ready.pop_front() {
            order.push(i);
            for &next in &dependents[i] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() != calculations.len() {
            let stuck = (0..calculations.len())
                .filter(|i| in_degree[*i] > 0)
                .map(|i| calculations[i].name)
                .collect();
            return Err(GraphError::Cycle(stuck));
        }

        let mut slots: Vec<Option<Calculation>> = calculations.into_iter().map(Some).collect();
        let ordered = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(Self { ordered })
    }

    /// The report's standard derived parameters
    pub fn standard() -> Self {
        Self::new(standard_calculations()).expect("standard calculation table is acyclic")
    }

    /// Calculations in evaluation order
    pub fn calculations(&self) -> &[Calculation] {
        &self.ordered
    }

    /// Run every calculation. Returns the outputs that were written.
    pub fn evaluate_all(&self, values: &mut Measurements) -> Vec<(Field, f64)> {
        let updated: Vec<_> = self
            .ordered
            .iter()
            .filter_map(|calc| evaluate(calc, values))
            .collect();
        debug!("evaluate_all: {} output(s) updated", updated.len());
        updated
    }

    /// Run only the calculations downstream of `changed`, in order.
    /// Returns the outputs that were written.
    pub fn recompute(&self, values: &mut Measurements, changed: &[Field]) -> Vec<(Field, f64)> {
        let mut dirty: BTreeSet<Field> = changed.iter().copied().collect();
        let mut updated = Vec::new();

        for calc in &self.ordered {
            if !calc.inputs.iter().any(|input| dirty.contains(input)) {
                continue;
            }
            if let Some(result) = evaluate(calc, values) {
                dirty.insert(calc.output);
                updated.push(result);
            }
        }

        debug!(
            "recompute {:?}: {} output(s) updated",
            changed,
            updated.len()
        );
        updated
    }
}

impl Default for CalculationGraph {
    fn default() -> Self {
        Self::standard()
    }
}

/// Evaluate one calculation and store its rounded output. Calculations
/// with a missing, zero or non-finite input are skipped and leave the
/// output untouched.
fn evaluate(calc: &Calculation, values: &mut Measurements) -> Option<(Field, f64)> {
    let inputs: Option<Vec<f64>> = calc.inputs.iter().map(|f| values.usable(*f)).collect();
    let Some(inputs) = inputs else {
        trace!("{}: inputs incomplete, skipped", calc.name);
        return None;
    };
    let Some(raw) = calc.apply(&inputs) else {
        trace!("{}: no result for {:?}", calc.name, inputs);
        return None;
    };

    let value = round_to(raw, calc.decimals);
    values.set(calc.output, value);
    trace!("{} = {}", calc.output, value);
    Some((calc.output, value))
}
